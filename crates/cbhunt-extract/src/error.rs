use cbhunt_core::MissionConfigError;
use thiserror::Error;

/// A candidate value did not conform to its declared shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}")]
pub struct ValidationError {
    /// JSON path of the offending value, e.g. `$[2].rights`.
    pub path: String,
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid mission configuration: {0}")]
    Config(#[from] MissionConfigError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("unreadable service response: {0}")]
    Transport(String),

    #[error("model output is not usable JSON: {reason}")]
    MalformedOutput { reason: String },

    #[error("model output failed validation: {0}")]
    Validation(#[from] ValidationError),
}
