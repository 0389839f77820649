//! Read-side reconstruction for trama.
//!
//! Turns a page's flat rows back into its nested document:
//!
//! 1. [`dedup::dedupe`] collapses duplicate-prefixed variants of the same
//!    logical key, preferring the clean form.
//! 2. [`tree::assign`] places each value at its parsed path, creating
//!    intermediate objects and sparse-filled arrays on demand.
//! 3. [`rebuild::reconstruct`] orchestrates both plus the integrity
//!    validator, producing a [`PageContent`] in either all-languages or
//!    single-language mode.
//!
//! Reconstruction is total: malformed rows are logged and skipped, never
//! fatal. It holds no shared state and is safe to run concurrently across
//! pages.

pub mod dedup;
pub mod rebuild;
pub mod tree;

pub use dedup::{dedupe, strip_page_prefix, ResolvedEntry};
pub use rebuild::{reconstruct, KeyMetadata, PageContent, SHARED_PAGE_ID};
pub use tree::assign;
