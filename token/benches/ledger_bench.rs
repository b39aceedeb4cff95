use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tally_token::TokenLedger;
use tally_types::{Address, TokenMetadata, UNLIMITED_ALLOWANCE};

fn ledger_with_holders(n: u64) -> (TokenLedger, Address, Vec<Address>) {
    let owner = Address::from_seed(0);
    let mut ledger = TokenLedger::new(TokenMetadata::default(), owner, u64::MAX as u128).unwrap();
    let holders: Vec<Address> = (1..=n).map(Address::from_seed).collect();
    for holder in &holders {
        ledger.transfer(owner, *holder, 1_000).unwrap();
    }
    ledger.drain_events();
    ledger.set_event_log(false);
    (ledger, owner, holders)
}

fn bench_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer");

    for holder_count in [10u64, 1_000, 100_000] {
        let (mut ledger, owner, holders) = ledger_with_holders(holder_count);
        let mut i = 0usize;
        group.bench_with_input(
            BenchmarkId::new("owner_to_holder", holder_count),
            &holder_count,
            |b, _| {
                b.iter(|| {
                    let to = holders[i % holders.len()];
                    i += 1;
                    ledger.transfer(black_box(owner), black_box(to), black_box(1)).unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_transfer_from(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer_from");
    let (mut ledger, owner, holders) = ledger_with_holders(1_000);
    let spender = holders[0];

    ledger.approve(owner, spender, UNLIMITED_ALLOWANCE).unwrap();
    group.bench_function("unlimited", |b| {
        b.iter(|| {
            ledger
                .transfer_from(black_box(spender), black_box(owner), black_box(holders[1]), 1)
                .unwrap();
        });
    });

    ledger.approve(owner, spender, u64::MAX as u128).unwrap();
    group.bench_function("finite", |b| {
        b.iter(|| {
            ledger
                .transfer_from(black_box(spender), black_box(owner), black_box(holders[1]), 1)
                .unwrap();
        });
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let (ledger, _, _) = ledger_with_holders(10_000);
    c.bench_function("snapshot_10k_holders", |b| {
        b.iter(|| black_box(ledger.snapshot()));
    });
}

criterion_group!(benches, bench_transfer, bench_transfer_from, bench_snapshot);
criterion_main!(benches);
