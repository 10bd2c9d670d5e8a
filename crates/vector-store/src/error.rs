use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorError>;

#[derive(Error, Debug)]
pub enum VectorError {
    #[error("Vector backend error: {0}")]
    Backend(String),

    #[error("Vector query timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Other(String),
}
