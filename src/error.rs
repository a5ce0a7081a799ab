use thiserror::Error;

/// A push payload that could not be read as a metric sample.
#[derive(Error, Debug)]
#[error("malformed metric payload: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// A poll or kill round trip that did not succeed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },
    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("could not decode {endpoint} response: {message}")]
    Body { endpoint: String, message: String },
    #[error("kill rejected for PID {pid}: {message}")]
    Rejected { pid: u32, message: String },
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("fetch #{seq} completed after fetch #{applied} was applied")]
    Stale { seq: u64, applied: u64 },
}

impl EngineError {
    pub fn is_stale(&self) -> bool {
        matches!(self, EngineError::Stale { .. })
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
