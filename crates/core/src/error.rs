use hostbound_api::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostboundError {
    #[error("Not found: {name}")]
    NotFound { name: String },
    #[error("Invalid rule: {0}")]
    InvalidRule(String),
    #[error("Invalid exclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Unsupported authentication scheme: {0}")]
    UnsupportedScheme(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Collaborator error: {0}")]
    Api(#[from] ApiError),
}

impl HostboundError {
    pub fn not_found(name: impl Into<String>) -> Self {
        HostboundError::NotFound { name: name.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, HostboundError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, HostboundError>;
