use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttemptError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Attempt closed: {0}")]
    AttemptClosed(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AttemptError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AttemptError::NotFound(_) => "NOT_FOUND",
            AttemptError::ValidationError(_) => "VALIDATION_ERROR",
            AttemptError::Unauthorized(_) => "UNAUTHORIZED",
            AttemptError::NetworkError(_) => "NETWORK_ERROR",
            AttemptError::ServerError(_) => "SERVER_ERROR",
            AttemptError::AttemptClosed(_) => "ATTEMPT_CLOSED",
            AttemptError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether a manual retry of the same request can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AttemptError::NetworkError(_) | AttemptError::ServerError(_)
        )
    }
}

impl From<reqwest::Error> for AttemptError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AttemptError::InternalError(format!("Response decoding error: {}", err))
        } else if err.is_builder() {
            AttemptError::ValidationError(format!("Invalid request: {}", err))
        } else {
            AttemptError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AttemptError {
    fn from(err: serde_json::Error) -> Self {
        AttemptError::InternalError(format!("JSON serialization error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AttemptError {
    fn from(err: validator::ValidationErrors) -> Self {
        AttemptError::ValidationError(err.to_string())
    }
}

pub type AttemptResult<T> = Result<T, AttemptError>;
