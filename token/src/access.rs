//! Owner-only access control.

use tally_types::Address;

use crate::error::TokenError;

/// The single privileged identity, fixed when the ledger is created.
///
/// There is no way to change it afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ownership {
    owner: Address,
}

impl Ownership {
    pub(crate) fn new(owner: Address) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn is_owner(&self, caller: &Address) -> bool {
        self.owner == *caller
    }

    /// Reject `caller` unless it is the owner.
    pub fn ensure_owner(&self, caller: &Address) -> Result<(), TokenError> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            tracing::warn!(caller = %caller, "owner-only operation rejected");
            Err(TokenError::Unauthorized { caller: *caller })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_passes() {
        let owner = Address::from_seed(1);
        assert!(Ownership::new(owner).ensure_owner(&owner).is_ok());
    }

    #[test]
    fn stranger_is_unauthorized() {
        let access = Ownership::new(Address::from_seed(1));
        let stranger = Address::from_seed(2);
        assert_eq!(
            access.ensure_owner(&stranger),
            Err(TokenError::Unauthorized { caller: stranger })
        );
    }

    #[test]
    fn zero_caller_is_never_owner() {
        let access = Ownership::new(Address::from_seed(1));
        assert!(!access.is_owner(&Address::ZERO));
    }
}
