use thiserror::Error;

/// Errors from entry store operations.
///
/// Absence is not an error: `fetch` returns `Ok(None)` and `delete` returns
/// `Ok(false)` for missing rows. These variants cover real backend failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend rejected or failed the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from content cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache backend rejected or failed the operation.
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
