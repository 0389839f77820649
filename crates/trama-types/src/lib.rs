//! Core types for Trama's multilingual content pipeline.
//!
//! Everything downstream builds on four ideas:
//!
//! - [`Language`] is the fixed set of languages every entry must carry.
//! - [`Content`] classifies a stored value once ([`Content::Localized`],
//!   [`Content::Legacy`], [`Content::Malformed`]) so the pipeline matches on
//!   variants instead of sniffing JSON shapes at every step.
//! - [`LanguageMap`] is the canonical per-language value map, ordered so its
//!   serialization (and therefore its [`ContentHash`]) is deterministic.
//! - [`integrity::validate`] turns one key's content into an
//!   [`IntegrityReport`] without ever failing; anomalies become issues.

pub mod content;
pub mod entry;
pub mod error;
pub mod hash;
pub mod integrity;
pub mod language;
pub mod map;

pub use content::{json_type_name, Content};
pub use entry::TextEntry;
pub use error::{Result, TypeError};
pub use hash::ContentHash;
pub use integrity::{Completeness, IntegrityIssue, IntegrityReport};
pub use language::Language;
pub use map::LanguageMap;
