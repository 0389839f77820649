use std::fmt;

use serde_json::Value;

use crate::content::{json_type_name, Content};
use crate::language::Language;

/// A single finding from the integrity validator.
///
/// Hard issues make a key invalid. Advisory issues ([`Self::is_advisory`])
/// flag suspicious but usable content and do not affect validity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// Content is not an object at all (legacy string, array, number, ...).
    NotLanguageMap { found: &'static str },
    /// A required language has no key in the map.
    Missing(Language),
    /// A required language is present but null.
    NullValue(Language),
    /// A required language holds a non-string value.
    NotAString { language: Language, found: &'static str },
    /// A required language holds an empty (or whitespace-only) string.
    Empty(Language),
    /// Every required language carries the same text; likely an untranslated
    /// copy pasted across languages.
    SuspectedContamination,
}

impl IntegrityIssue {
    /// Advisory issues are reported but never fail validation.
    pub fn is_advisory(&self) -> bool {
        matches!(self, IntegrityIssue::SuspectedContamination)
    }
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::NotLanguageMap { found } => {
                write!(f, "content is not a language map (type: {found})")
            }
            IntegrityIssue::Missing(language) => write!(f, "{language} FALTANDO (missing)"),
            IntegrityIssue::NullValue(language) => write!(f, "{language} is null/undefined"),
            IntegrityIssue::NotAString { language, found } => {
                write!(f, "{language} is not a string (type: {found})")
            }
            IntegrityIssue::Empty(language) => write!(f, "{language} is empty"),
            IntegrityIssue::SuspectedContamination => {
                write!(f, "suspected cross-language contamination")
            }
        }
    }
}

/// How many required languages hold usable text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completeness {
    pub available: usize,
    pub required: usize,
}

impl Completeness {
    pub fn is_complete(&self) -> bool {
        self.available == self.required
    }
}

impl fmt::Display for Completeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.available, self.required)
    }
}

/// Outcome of validating one key's content against the required language set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Required languages holding usable (non-empty string) text, in
    /// declaration order.
    pub available: Vec<Language>,
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    /// Whether the given language holds usable text.
    pub fn is_available(&self, language: Language) -> bool {
        self.available.contains(&language)
    }

    pub fn completeness(&self) -> Completeness {
        Completeness {
            available: self.available.len(),
            required: Language::REQUIRED.len(),
        }
    }

    /// Valid means every required language holds non-empty text and no hard
    /// issue was found. Advisory issues do not count against validity.
    pub fn is_valid(&self) -> bool {
        self.completeness().is_complete() && self.issues.iter().all(IntegrityIssue::is_advisory)
    }

    /// Issues rendered for wire payloads and diagnostics.
    pub fn issue_strings(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Validate one key's content against the required language set.
///
/// `label` identifies the key in log output (typically `page:json_key`).
/// Validation never fails; every anomaly becomes an issue in the report.
/// The check is pure: identical content always produces an identical report.
pub fn validate(content: &Content, label: &str) -> IntegrityReport {
    let map = match content.as_localized() {
        Some(map) => map,
        None => {
            let report = IntegrityReport {
                available: Vec::new(),
                issues: vec![IntegrityIssue::NotLanguageMap {
                    found: content.type_name(),
                }],
            };
            tracing::debug!(key = label, issue = %report.issues[0], "integrity check failed");
            return report;
        }
    };

    let mut available = Vec::new();
    let mut issues = Vec::new();
    let mut texts = Vec::with_capacity(Language::REQUIRED.len());

    for language in Language::REQUIRED {
        match map.raw(language.code()) {
            None => issues.push(IntegrityIssue::Missing(language)),
            Some(Value::Null) => issues.push(IntegrityIssue::NullValue(language)),
            Some(Value::String(text)) if text.trim().is_empty() => {
                issues.push(IntegrityIssue::Empty(language))
            }
            Some(Value::String(text)) => {
                available.push(language);
                texts.push(text.as_str());
            }
            Some(other) => issues.push(IntegrityIssue::NotAString {
                language,
                found: json_type_name(other),
            }),
        }
    }

    // Identical text across the full required set suggests a copy-paste
    // instead of a translation. Single-language sets cannot contaminate.
    let required = Language::REQUIRED.len();
    if required > 1 && texts.len() == required && texts.windows(2).all(|w| w[0] == w[1]) {
        issues.push(IntegrityIssue::SuspectedContamination);
    }

    let report = IntegrityReport { available, issues };
    if !report.is_valid() {
        tracing::debug!(
            key = label,
            completeness = %report.completeness(),
            issues = report.issues.len(),
            "integrity check failed"
        );
    }
    report
}
