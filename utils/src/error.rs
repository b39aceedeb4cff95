use thiserror::Error;

#[derive(Debug, Error)]
pub enum UtilsError {
    #[error("failed to initialise logging: {0}")]
    LoggingInit(String),

    #[error("unknown log format: {0} (expected \"human\" or \"json\")")]
    UnknownLogFormat(String),
}
