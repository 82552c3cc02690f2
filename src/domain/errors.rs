use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("operation canceled: {0}")]
    Canceled(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// HTTP status class this error maps to at the presentation boundary.
    pub fn status(&self) -> u16 {
        match self {
            DomainError::NotFound(_) => 404,
            DomainError::BadRequest(_) => 400,
            DomainError::Conflict(_) => 409,
            DomainError::Canceled(_) => 504,
            DomainError::Internal(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound(_))
    }
}
