use thiserror::Error;

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Request-level failures.
///
/// These precede any row processing and fail the whole call. Per-field
/// failures inside an accepted batch never surface here; they are recorded
/// in the batch's update log instead.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("page id must not be empty")]
    EmptyPageId,

    #[error(transparent)]
    InvalidLanguage(#[from] trama_types::TypeError),

    #[error(transparent)]
    InvalidKey(#[from] trama_path::PathError),

    #[error("newText value for {code} must be a string (got {found})")]
    InvalidText { code: String, found: &'static str },

    #[error("too many edits in one call: {count} (max {max})")]
    TooManyEdits { count: usize, max: usize },

    #[error("too many deletions in one call: {count} (max {max})")]
    TooManyDeletes { count: usize, max: usize },

    #[error("store error: {0}")]
    Store(#[from] trama_store::StoreError),
}

impl ServiceError {
    /// Whether the failure was caused by the request rather than a backend.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ServiceError::Store(_))
    }
}
