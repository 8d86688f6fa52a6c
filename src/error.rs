use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatrolError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("GraphQL errors: {}", messages.join(", "))]
    GraphQL { messages: Vec<String> },

    #[error("Empty response from API")]
    EmptyResponse,

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Missing setting `{key}`. Set {env} or add {key} to the config file")]
    MissingSetting { key: &'static str, env: &'static str },

    #[error("Invalid time window '{0}' (expected e.g. 5d, 12h, 1w)")]
    InvalidWindow(String),

    #[error("[{key}] Missing issue id")]
    MissingIssueId { key: String },

    #[error("[{key}] Target state '{state}' not found")]
    TransitionNotFound { key: String, state: String },

    #[error("One or more checks failed: {}", .0.join(", "))]
    ChecksFailed(Vec<String>),
}

pub type Result<T> = std::result::Result<T, PatrolError>;

impl PatrolError {
    /// Short variant name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            PatrolError::Http(_) => "HttpError",
            PatrolError::ApiError { .. } => "ApiError",
            PatrolError::GraphQL { .. } => "GraphQLError",
            PatrolError::EmptyResponse => "EmptyResponse",
            PatrolError::ConfigRead { .. } | PatrolError::ConfigParse { .. } => "ConfigError",
            PatrolError::NoConfigDir | PatrolError::MissingSetting { .. } => "ConfigError",
            PatrolError::InvalidWindow(_) => "ConfigError",
            PatrolError::MissingIssueId { .. } => "MissingIssueId",
            PatrolError::TransitionNotFound { .. } => "TransitionNotFound",
            PatrolError::ChecksFailed(_) => "ChecksFailed",
        }
    }
}
