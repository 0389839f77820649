use thiserror::Error;

/// Result alias for type-level operations.
pub type Result<T> = std::result::Result<T, TypeError>;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown language code: {code} (valid: {valid})")]
    UnknownLanguage { code: String, valid: String },

    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("serialization error: {0}")]
    Serialization(String),
}
