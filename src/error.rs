use thiserror::Error;

/// Reading a persisted mapping failed. Always recovered by falling back to
/// the built-in defaults.
#[derive(Error, Debug)]
pub enum MappingLoadError {
    #[error("could not read mapping file: {0}")]
    Read(#[from] std::io::Error),
    #[error("mapping file is not a valid word map: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persisting a mapping failed. Logged; the in-memory map stays usable.
#[derive(Error, Debug)]
pub enum MappingSaveError {
    #[error("could not encode mapping: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("could not write mapping file: {0}")]
    Write(#[source] std::io::Error),
}

/// The generation backend could not produce a response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("generation timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend answered with http status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl GenerationError {
    /// Timeouts and transport hiccups may clear up on a second attempt;
    /// a bad status or an unreadable body will not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::Timeout | GenerationError::Transport(_))
    }
}

/// The engine thread has exited and will not answer again.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("substitution worker is gone")]
pub struct WorkerGone;
