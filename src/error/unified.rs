//! Broad error classification.

/// Broad error category for routing error handling in callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Client,
    Server,
    Network,
    Configuration,
    Serialization,
    Storage,
    Unknown,
}

impl ErrorCategory {
    /// Category for a non-2xx HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Authentication,
            400..=499 => Self::Client,
            500..=599 => Self::Server,
            _ => Self::Unknown,
        }
    }
}
