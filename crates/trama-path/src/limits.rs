use crate::error::{PathError, Result};
use crate::path::{KeyPath, PathSegment};

/// Longest accepted json key, in bytes.
pub const MAX_KEY_LENGTH: usize = 512;

/// Largest accepted array index. Sparse-filling in the tree builder allocates
/// up to the index, so unbounded indices would let one row allocate
/// arbitrarily.
pub const MAX_ARRAY_INDEX: usize = 1024;

/// Boundary validation for an incoming json key: length ceiling, parse, and
/// index ceiling. Returns the typed path so callers parse exactly once.
///
/// This runs at the edit/delete boundary. Already-stored rows skip it and are
/// rebuilt as-is, except that reconstruction re-checks the index ceiling
/// before sparse-filling arrays and skips offending rows.
pub fn validate_json_key(key: &str) -> Result<KeyPath> {
    if key.len() > MAX_KEY_LENGTH {
        return Err(PathError::KeyTooLong { length: key.len(), max: MAX_KEY_LENGTH });
    }
    let path = KeyPath::parse(key)?;
    for segment in path.segments() {
        if let PathSegment::Index(index) = segment {
            if *index > MAX_ARRAY_INDEX {
                return Err(PathError::IndexTooLarge { index: *index, max: MAX_ARRAY_INDEX });
            }
        }
    }
    Ok(path)
}
