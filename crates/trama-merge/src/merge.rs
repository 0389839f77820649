use std::collections::BTreeMap;

use trama_types::{Content, ContentHash, Language, LanguageMap, TypeError};

/// Validated per-language values of one incoming edit. Keys were checked
/// against the required language set at the boundary.
pub type EditValues = BTreeMap<Language, String>;

/// Result of merging one edit onto one field's existing content.
///
/// The merge itself is pure; persistence happens in [`crate::batch`].
#[derive(Clone, Debug, PartialEq)]
pub struct MergedField {
    pub merged: LanguageMap,
    pub old_hash: ContentHash,
    pub new_hash: ContentHash,
    /// No row existed for the field before this write.
    pub is_new_record: bool,
    /// Required languages present in the edit, in declaration order.
    pub sent_languages: Vec<Language>,
    /// Required languages kept from the existing map because the edit
    /// omitted them.
    pub preserved_languages: Vec<Language>,
    /// Sent languages whose value was the empty string: an explicit clear.
    pub intentionally_cleared: Vec<Language>,
}

impl MergedField {
    /// The write changed nothing; skip persistence.
    pub fn is_noop(&self) -> bool {
        self.old_hash == self.new_hash
    }
}

/// Merge an edit onto a field's existing content.
///
/// The rules, per required language:
///
/// - Sent languages overwrite unconditionally, including to `""` -- an
///   explicit clear is a first-class outcome, distinct from omission.
/// - Omitted languages keep their existing value untouched
///   (preserve-by-omission). On a brand-new record they are materialized as
///   `""` so the stored map names every required language from the start;
///   on an existing record an absent language stays absent.
///
/// Language codes outside the required set that already live in the existing
/// map are carried over untouched. Existing content that is not a language
/// map (a legacy string, junk) restarts the merge from an empty map;
/// `is_new_record` still reports that a row existed.
pub fn merge_languages(
    existing: Option<&Content>,
    incoming: &EditValues,
) -> Result<MergedField, TypeError> {
    let is_new_record = existing.is_none();
    let start = match existing.and_then(Content::as_localized) {
        Some(map) => map.clone(),
        None => LanguageMap::new(),
    };
    let old_hash = ContentHash::of_map(&start)?;

    let mut merged = start.clone();
    let mut sent_languages = Vec::new();
    let mut preserved_languages = Vec::new();
    let mut intentionally_cleared = Vec::new();

    for language in Language::REQUIRED {
        match incoming.get(&language) {
            Some(text) => {
                sent_languages.push(language);
                if text.is_empty() {
                    intentionally_cleared.push(language);
                }
                merged.set_text(language, text.clone());
            }
            None => {
                if merged.contains(language) {
                    preserved_languages.push(language);
                } else if is_new_record {
                    merged.set_text(language, "");
                }
                // Absent from an existing record: stays absent. This is what
                // lets the legacy reconciler find languages only the legacy
                // row still carries.
            }
        }
    }

    let new_hash = ContentHash::of_map(&merged)?;
    Ok(MergedField {
        merged,
        old_hash,
        new_hash,
        is_new_record,
        sent_languages,
        preserved_languages,
        intentionally_cleared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn localized(value: serde_json::Value) -> Content {
        Content::from_value(value)
    }

    fn edit(pairs: &[(Language, &str)]) -> EditValues {
        pairs.iter().map(|(l, t)| (*l, t.to_string())).collect()
    }

    #[test]
    fn preserve_by_omission() {
        let existing = localized(json!({"pt-BR": "old", "en-US": "kept"}));
        let field = merge_languages(
            Some(&existing),
            &edit(&[(Language::PtBr, "new")]),
        )
        .unwrap();

        assert_eq!(field.merged.text(Language::PtBr), Some("new"));
        assert_eq!(field.merged.text(Language::EnUs), Some("kept"));
        assert_eq!(field.sent_languages, vec![Language::PtBr]);
        assert_eq!(field.preserved_languages, vec![Language::EnUs]);
        assert!(field.intentionally_cleared.is_empty());
        assert!(!field.is_new_record);
        assert!(!field.is_noop());
    }

    #[test]
    fn explicit_clear_differs_from_omission() {
        let existing = localized(json!({"pt-BR": "old", "en-US": "kept"}));
        let cleared = merge_languages(
            Some(&existing),
            &edit(&[(Language::PtBr, "")]),
        )
        .unwrap();

        assert_eq!(cleared.merged.text(Language::PtBr), Some(""));
        assert_eq!(cleared.merged.text(Language::EnUs), Some("kept"));
        assert_eq!(cleared.intentionally_cleared, vec![Language::PtBr]);

        let omitted = merge_languages(Some(&existing), &edit(&[])).unwrap();
        assert_eq!(omitted.merged.text(Language::PtBr), Some("old"));
        assert!(omitted.is_noop());
    }

    #[test]
    fn new_record_materializes_not_sent_as_empty() {
        let field = merge_languages(None, &edit(&[(Language::PtBr, "ola")])).unwrap();

        assert!(field.is_new_record);
        assert_eq!(field.merged.text(Language::PtBr), Some("ola"));
        assert_eq!(field.merged.text(Language::EnUs), Some(""));
        assert!(field.preserved_languages.is_empty());
        assert!(!field.is_noop());
    }

    #[test]
    fn existing_record_keeps_absent_languages_absent() {
        let existing = localized(json!({"pt-BR": "old"}));
        let field = merge_languages(
            Some(&existing),
            &edit(&[(Language::PtBr, "new")]),
        )
        .unwrap();

        assert!(!field.merged.contains(Language::EnUs));
        assert!(field.preserved_languages.is_empty());
    }

    #[test]
    fn identical_content_is_a_noop() {
        let existing = localized(json!({"pt-BR": "x", "en-US": "y"}));
        let field = merge_languages(
            Some(&existing),
            &edit(&[(Language::PtBr, "x"), (Language::EnUs, "y")]),
        )
        .unwrap();

        assert!(field.is_noop());
        assert_eq!(field.old_hash, field.new_hash);
    }

    #[test]
    fn stray_codes_survive_the_merge() {
        let existing = localized(json!({"pt-BR": "x", "fr-FR": "gardé"}));
        let field = merge_languages(
            Some(&existing),
            &edit(&[(Language::PtBr, "y")]),
        )
        .unwrap();

        assert_eq!(field.merged.raw("fr-FR"), Some(&json!("gardé")));
    }

    #[test]
    fn legacy_string_restarts_from_empty() {
        let existing = Content::from_value(json!("bare legacy"));
        let field = merge_languages(
            Some(&existing),
            &edit(&[(Language::PtBr, "new")]),
        )
        .unwrap();

        assert!(!field.is_new_record);
        assert_eq!(field.merged.text(Language::PtBr), Some("new"));
        // No materialization: the row already existed.
        assert!(!field.merged.contains(Language::EnUs));
    }

    #[test]
    fn zero_language_edit_on_new_record_is_all_empty() {
        let field = merge_languages(None, &edit(&[])).unwrap();
        assert_eq!(field.merged.text(Language::PtBr), Some(""));
        assert_eq!(field.merged.text(Language::EnUs), Some(""));
        assert!(!field.is_noop());
    }
}
