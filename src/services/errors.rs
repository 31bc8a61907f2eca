use thiserror::Error;

use crate::repository::RepositoryError;

/// Error type returned by every store operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required input was absent or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// Input was present but malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("user already exists")]
    DuplicateUser,
    #[error("category already exists")]
    DuplicateCategory,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    #[error("scene index {0} is out of range")]
    IndexOutOfRange(usize),
    /// Attempt to mutate a record owned by somebody else.
    #[error("owner mismatch")]
    OwnerMismatch,
    #[error("the last remaining category cannot be removed")]
    LastCategory,
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Persistence failed; the error is passed through from the backend.
    #[error("storage failure: {0}")]
    Io(#[from] RepositoryError),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
