use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::map::LanguageMap;

/// Human-readable JSON type name, for diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Classified content of a stored entry.
///
/// Rows are classified once, at the storage boundary, so the rest of the
/// pipeline matches on variants instead of re-inspecting JSON shapes:
///
/// - [`Content::Localized`] is the canonical form, a per-language map.
/// - [`Content::Legacy`] is a bare string written before localization;
///   the reconciler upgrades these on the next write to the same key.
/// - [`Content::Malformed`] is anything else (arrays, numbers, null).
///   Malformed rows are reported and carried, never silently dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Content {
    Localized(LanguageMap),
    Legacy(String),
    Malformed(Value),
}

impl Content {
    /// Classify a raw stored value.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(object) => Content::Localized(LanguageMap::from_object(object)),
            Value::String(text) => Content::Legacy(text),
            other => Content::Malformed(other),
        }
    }

    /// The language map, if this is canonical content.
    pub fn as_localized(&self) -> Option<&LanguageMap> {
        match self {
            Content::Localized(map) => Some(map),
            _ => None,
        }
    }

    /// Whether this is canonical per-language content.
    pub fn is_localized(&self) -> bool {
        matches!(self, Content::Localized(_))
    }

    /// The content as it is stored on disk.
    pub fn to_value(&self) -> Value {
        match self {
            Content::Localized(map) => map.to_value(),
            Content::Legacy(text) => Value::String(text.clone()),
            Content::Malformed(value) => value.clone(),
        }
    }

    /// JSON type name of the underlying stored value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Content::Localized(_) => "object",
            Content::Legacy(_) => "string",
            Content::Malformed(value) => json_type_name(value),
        }
    }
}

impl From<Value> for Content {
    fn from(value: Value) -> Self {
        Content::from_value(value)
    }
}

impl From<Content> for Value {
    fn from(content: Content) -> Self {
        content.to_value()
    }
}
