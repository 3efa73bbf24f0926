use std::fmt;

use monitor_core::ProgressSnapshot;

use crate::StartReply;

/// Identifies one polling session; increases with every `start()`.
pub type SessionId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// `/start` answered or failed.
    StartFinished(Result<StartReply, ApiError>),
    /// One of the three per-tick requests completed.
    Sampled {
        session: SessionId,
        tick: u64,
        sample: Sample,
    },
    /// The one-shot `/result` request completed.
    ResultFetched(Result<String, ApiError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sample {
    Progress(Result<ProgressSnapshot, ApiError>),
    Logs(Result<Vec<String>, ApiError>),
    Completion(Result<ProgressSnapshot, ApiError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}
