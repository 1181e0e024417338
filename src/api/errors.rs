use serde_json::Value;
use thiserror::Error;

/// Failures surfaced by the API client. Every request failure reaches the
/// calling action as one of these, with the backend payload attached when the
/// backend sent one.
#[derive(Clone, Debug, Error)]
pub enum ApiError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http {
        status: u16,
        payload: Option<Value>,
        message: String,
    },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status of a backend rejection.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// JSON error body returned by the backend, if it was JSON.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Http { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
