#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
