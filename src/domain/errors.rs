use thiserror::Error;

/// Violations of aggregate rules raised by domain mutations.
///
/// These map one-to-one onto the caller-facing service errors; the conversion
/// lives in `error_conversions` so the domain stays independent of services.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("category '{0}' already exists")]
    DuplicateCategory(String),
    #[error("'{0}' is reserved and cannot be used as a category name")]
    ReservedCategory(String),
    #[error("category '{0}' not found")]
    CategoryNotFound(String),
    #[error("the last remaining category cannot be removed")]
    LastCategory,
    #[error("user '{0}' already exists")]
    DuplicateUser(String),
    #[error("scene index {index} is out of range for {len} scenes")]
    SceneIndexOutOfRange { index: usize, len: usize },
    #[error("record belongs to another owner")]
    OwnerMismatch,
}
