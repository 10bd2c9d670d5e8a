use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    /// Storage is mandatory infrastructure; its failures always propagate.
    #[error("Storage error: {0}")]
    Storage(#[from] recall_storage::StorageError),

    /// Only escapes when a caller uses the semantic strategy directly; the
    /// orchestrated paths catch vector failures and fall back.
    #[error("Vector store error: {0}")]
    Vector(#[from] recall_vector_store::VectorError),

    #[error("{0}")]
    Other(String),
}
