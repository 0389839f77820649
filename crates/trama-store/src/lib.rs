//! Storage boundary for trama.
//!
//! Two collaborators live behind traits here:
//!
//! - [`EntryStore`] -- the flat row store keyed by `(page_id, json_key)`.
//!   Reconstruction reads whole pages from it; the merge engine upserts one
//!   row per field write.
//! - [`ContentCache`] -- a key-to-blob cache for reconstructed pages, with
//!   tombstoned invalidation: [`CacheSlot::invalidated_at`] non-null means
//!   miss, even while the blob is physically present.
//!
//! # Backends
//!
//! - [`InMemoryEntryStore`] -- `BTreeMap`-based store for tests and
//!   embedding, with single-shot fault injection for exercising
//!   partial-failure paths.
//! - [`InMemoryContentCache`] -- `HashMap`-based cache for tests and
//!   embedding, with the same fault injection for cache-degradation paths.
//!
//! # Design Rules
//!
//! 1. Absence is not an error: fetch of a missing row is `Ok(None)`.
//! 2. Each upsert/delete is its own atomic unit; nothing spans rows.
//! 3. Backend failures are propagated, never silently ignored.

pub mod cache;
pub mod error;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use cache::{CacheSlot, InMemoryContentCache};
pub use error::{CacheError, CacheResult, StoreError, StoreResult};
pub use memory::InMemoryEntryStore;
pub use traits::{ContentCache, EntryStore, PageSummary};
