use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;
use crate::map::LanguageMap;

/// Domain separation tag for content hashing.
const CONTENT_DOMAIN: &str = "trama-content-v1";

/// BLAKE3 digest of a canonically serialized language map.
///
/// Because [`LanguageMap`] serializes with sorted keys, two maps holding the
/// same languages and values always hash identically regardless of how they
/// were assembled. The merge engine compares hashes before and after a merge
/// to skip persistence when nothing changed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Size of the digest in bytes.
    pub const SIZE: usize = 32;

    /// Construct from raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash a language map in its canonical serialization.
    pub fn of_map(map: &LanguageMap) -> Result<Self, TypeError> {
        let canonical =
            serde_json::to_vec(map).map_err(|e| TypeError::Serialization(e.to_string()))?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(CONTENT_DOMAIN.as_bytes());
        hasher.update(b":");
        hasher.update(&canonical);
        Ok(Self(*hasher.finalize().as_bytes()))
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full lowercase hex encoding (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 hex characters, for log lines.
    pub fn short_hex(&self) -> String {
        self.to_hex()[..8].to_string()
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|_| TypeError::InvalidHex(s.to_string()))?;
        let array: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| TypeError::InvalidLength {
            expected: Self::SIZE,
            actual: b.len(),
        })?;
        Ok(Self(array))
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short_hex())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
