use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::language::Language;

/// Per-entry mapping from language code to stored value.
///
/// Keys are kept as raw strings rather than [`Language`] so that data written
/// before the language set was enforced (stray codes, non-string values)
/// survives read/merge round-trips unchanged; the integrity validator reports
/// on the required set and leaves the rest alone. The map is ordered
/// (`BTreeMap`), which makes its JSON serialization canonical and therefore
/// its content hash independent of insertion order.
///
/// Invariant: an absent key and an empty string are different states. Absent
/// means the language was never written; `""` means it was explicitly
/// cleared.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageMap(BTreeMap<String, Value>);

impl LanguageMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build from a raw JSON object.
    pub fn from_object(object: serde_json::Map<String, Value>) -> Self {
        Self(object.into_iter().collect())
    }

    /// The string value for a required language, if present and a string.
    pub fn text(&self, language: Language) -> Option<&str> {
        self.0.get(language.code()).and_then(Value::as_str)
    }

    /// The raw stored value under a language code.
    pub fn raw(&self, code: &str) -> Option<&Value> {
        self.0.get(code)
    }

    /// Set a required language to a string value.
    pub fn set_text(&mut self, language: Language, text: impl Into<String>) {
        self.0
            .insert(language.code().to_string(), Value::String(text.into()));
    }

    /// Insert a raw value under an arbitrary code (legacy enrichment path).
    pub fn insert_raw(&mut self, code: impl Into<String>, value: Value) {
        self.0.insert(code.into(), value);
    }

    /// Whether the map has a key for this language (any value, even null).
    pub fn contains(&self, language: Language) -> bool {
        self.0.contains_key(language.code())
    }

    /// Whether the map has a key for this raw code.
    pub fn contains_code(&self, code: &str) -> bool {
        self.0.contains_key(code)
    }

    /// All language codes present, in canonical (sorted) order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over `(code, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys present.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no language has ever been written.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The map as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl FromIterator<(String, Value)> for LanguageMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
