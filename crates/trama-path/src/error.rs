use thiserror::Error;

/// Result alias for path operations.
pub type Result<T> = std::result::Result<T, PathError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("json key is empty")]
    EmptyKey,

    #[error("json key too long: {length} characters (max {max})")]
    KeyTooLong { length: usize, max: usize },

    #[error("array index {index} exceeds limit {max}")]
    IndexTooLarge { index: usize, max: usize },
}
