use std::fmt;

use crate::error::{PathError, Result};

/// One step of a key path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Descend into an object member.
    Member(String),
    /// Descend into an array element.
    Index(usize),
}

/// A parsed json key: the typed form of `"fases.items[2].title"`.
///
/// Keys stay strings on the wire and in storage; they are parsed into a
/// `KeyPath` at the boundary so the rest of the pipeline never pattern-matches
/// raw strings. Parsing is total except for the empty key: every non-empty
/// string is a valid path, with unrecognized bracket syntax falling back to a
/// plain member name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<PathSegment>,
}

impl KeyPath {
    /// Parse a dotted/bracketed key.
    ///
    /// Splits on `.`; a segment of the form `name[digits]` yields the member
    /// and the index as two steps. A segment with malformed brackets
    /// (`a[x]`, `[3]`, `a[1]b`) stays a single member named by the whole
    /// segment, matching how such keys were stored historically.
    pub fn parse(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Err(PathError::EmptyKey);
        }

        let mut segments = Vec::new();
        for part in key.split('.') {
            match split_indexed(part) {
                Some((name, index)) => {
                    segments.push(PathSegment::Member(name.to_string()));
                    segments.push(PathSegment::Index(index));
                }
                None => segments.push(PathSegment::Member(part.to_string())),
            }
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The largest array index anywhere in the path, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                PathSegment::Index(i) => Some(*i),
                PathSegment::Member(_) => None,
            })
            .max()
    }
}

/// Split `name[digits]` into its parts, or `None` if the segment is not of
/// that exact shape. The name is greedy: `a[1][2]` splits as `("a[1]", 2)`.
fn split_indexed(segment: &str) -> Option<(&str, usize)> {
    let inner = segment.strip_suffix(']')?;
    let open = inner.rfind('[')?;
    if open == 0 {
        return None;
    }
    let digits = &inner[open + 1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index = digits.parse().ok()?;
    Some((&inner[..open], index))
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Member(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{name}")?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
