use thiserror::Error;

/// Failures raised by snapshot storage backends.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed snapshot document: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
