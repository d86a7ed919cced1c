use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Error taxonomy for one submission attempt.
///
/// Local precondition failures (`SourceFileMissing`, `ProblemNotFound`,
/// `NoExamples`, `EmptyCheckpoints`, `InvalidConfig`) are surfaced before any
/// network I/O. Connectivity failures (`Connect`, `ReadTimeout`,
/// `BadMessageLength`, `Io`) are fatal for the current submission and are
/// never retried here. Per-message decode failures are not errors at all;
/// the decoder logs and skips them.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("source file not found: {}", .0.display())]
    SourceFileMissing(PathBuf),

    #[error("problem bank not found: {}", .0.display())]
    BankMissing(PathBuf),

    #[error("problem {0} not found")]
    ProblemNotFound(u32),

    #[error("problem {0} has no examples")]
    NoExamples(u32),

    #[error("problem metadata has no numeric time limit")]
    MissingTimeLimit,

    #[error("config document has no checkpoints")]
    EmptyCheckpoints,

    #[error("invalid config document: {0}")]
    InvalidConfig(String),

    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("read timed out after {0:?}")]
    ReadTimeout(Duration),

    #[error("server declared invalid message length {0}")]
    BadMessageLength(i32),

    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
