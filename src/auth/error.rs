use thiserror::Error;

use crate::error::UrutiError;

/// Session and credential errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Unsupported session file version {0}")]
    UnsupportedVersion(u32),
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<toml::de::Error> for AuthError {
    fn from(error: toml::de::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<toml::ser::Error> for AuthError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<AuthError> for UrutiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Io(_) | AuthError::Serialization(_) | AuthError::UnsupportedVersion(_) => {
                UrutiError::Storage(error.to_string())
            }
            other => UrutiError::Authentication(other.to_string()),
        }
    }
}
