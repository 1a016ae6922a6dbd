//! Shared error type across jobprom crates.

use thiserror::Error;

/// Stable error kinds (used in logs and assertions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Lifecycle hooks were not paired by the host.
    Pairing,
    /// Instrument used with the wrong number of label values.
    LabelMismatch,
    /// Invalid configuration.
    Config,
    /// Unsupported configuration version.
    UnsupportedVersion,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Pairing => "PAIRING",
            ErrorKind::LabelMismatch => "LABEL_MISMATCH",
            ErrorKind::Config => "CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, JobPromError>;

/// Unified error type used by core and filter.
#[derive(Debug, Error)]
pub enum JobPromError {
    /// `on_performed` ran without a timer stored by `on_performing`.
    #[error("invariant violated: no duration timer in perform context (job {job_id})")]
    TimerMissing { job_id: String },
    #[error("invariant violated: duration timer already started (job {job_id})")]
    TimerAlreadyStarted { job_id: String },
    #[error("metric {metric}: expected {expected} label values, got {got}")]
    LabelMismatch {
        metric: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl JobPromError {
    /// Map an error to its stable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            JobPromError::TimerMissing { .. } | JobPromError::TimerAlreadyStarted { .. } => {
                ErrorKind::Pairing
            }
            JobPromError::LabelMismatch { .. } => ErrorKind::LabelMismatch,
            JobPromError::Config(_) => ErrorKind::Config,
            JobPromError::UnsupportedVersion => ErrorKind::UnsupportedVersion,
            JobPromError::Internal(_) => ErrorKind::Internal,
        }
    }
}
