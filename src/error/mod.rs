//! Error types for stepdigest.

use std::fmt;

/// Errors that can occur during a digest session.
#[derive(Debug)]
pub enum DigestError {
    /// The byte source could not be opened.
    SourceUnavailable(std::io::Error),

    /// An I/O error occurred while reading from an open source.
    Io(std::io::Error),

    /// The digest state was used after it had been finalized.
    InvalidState {
        /// Description of the misuse.
        message: &'static str,
    },

    /// Invalid configuration parameter.
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// The session was cancelled at a suspension point.
    Cancelled,

    /// The offload worker went away before returning a step result.
    WorkerLost,
}

impl fmt::Display for DigestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestError::SourceUnavailable(e) => write!(f, "source unavailable: {}", e),
            DigestError::Io(e) => write!(f, "io error: {}", e),
            DigestError::InvalidState { message } => write!(f, "invalid state: {}", message),
            DigestError::InvalidConfig { message } => write!(f, "invalid config: {}", message),
            DigestError::Cancelled => write!(f, "digest session cancelled"),
            DigestError::WorkerLost => write!(f, "offload worker lost before the step completed"),
        }
    }
}

impl std::error::Error for DigestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DigestError::SourceUnavailable(e) | DigestError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DigestError {
    fn from(e: std::io::Error) -> Self {
        DigestError::Io(e)
    }
}
