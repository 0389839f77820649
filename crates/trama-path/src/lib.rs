//! Typed key paths for trama.
//!
//! Json keys arrive as dotted/bracketed strings (`"fases.items[2].title"`).
//! [`KeyPath::parse`] converts them into a sequence of [`PathSegment`]s once,
//! at the boundary; everything downstream walks segments instead of
//! re-splitting strings. [`limits::validate_json_key`] adds the boundary
//! ceilings (key length, array index) for keys arriving on the write path.

pub mod error;
pub mod limits;
pub mod path;

pub use error::{PathError, Result};
pub use limits::{validate_json_key, MAX_ARRAY_INDEX, MAX_KEY_LENGTH};
pub use path::{KeyPath, PathSegment};
