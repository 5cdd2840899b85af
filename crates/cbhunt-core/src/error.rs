use thiserror::Error;

use crate::mission::MissionKind;

/// Errors raised while loading application configuration or the quick-pick
/// catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read quick picks file {path}: {source}")]
    QuickPicksIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse quick picks file: {0}")]
    QuickPicksParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// A mission was started with incomplete input. Raised before anything is
/// sent to the generative service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissionConfigError {
    #[error("{kind} mission requires a non-empty {field}")]
    MissingField {
        kind: MissionKind,
        field: &'static str,
    },

    #[error("trend limit must be between 1 and {max}, got {limit}")]
    InvalidLimit { limit: u32, max: u32 },
}
