//! High-level SDK for the Trama content service.
//!
//! Wires the row store, the cache, and the merge engine into one
//! [`ContentService`] with validated entry points. This is the main entry
//! point for applications embedding Trama.

pub mod config;
pub mod error;
pub mod invalidate;
pub mod service;

pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use invalidate::{cache_key, page_cache_keys, CacheInvalidator};
pub use service::{
    parse_edit_values, ContentService, DeleteLogEntry, DeleteOutcome, DeleteStatus, KeyIntegrity,
    PageIntegrity,
};

// Re-export key types
pub use trama_merge::{BatchOutcome, FieldEdit, UpdateLogEntry, UpdateStatus};
pub use trama_store::{ContentCache, EntryStore, PageSummary};
pub use trama_types::{Content, ContentHash, Language, LanguageMap, TextEntry};
pub use trama_weave::{KeyMetadata, PageContent};
