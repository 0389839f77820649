//! Write-side engine for trama.
//!
//! One field write runs through a small state machine: fetch the existing
//! row (absence is the expected `NEW` case), merge the incoming languages
//! ([`merge::merge_languages`]), short-circuit when the content hash did not
//! move, persist, then reconcile the field's duplicate-prefixed legacy
//! sibling ([`legacy::reconcile_legacy`]). [`batch::apply_edits`] folds that
//! over an edit list strictly sequentially, recording one
//! [`UpdateLogEntry`] per field; a field's failure never aborts the rest of
//! the batch.
//!
//! The engine holds no cache handle. Everything it changes is announced
//! through [`WriteObserver`], which is where cache invalidation plugs in.

pub mod batch;
pub mod legacy;
pub mod merge;
pub mod observer;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{apply_edits, BatchOutcome, FieldEdit, UpdateLogEntry, UpdateStatus};
pub use legacy::{reconcile_legacy, LegacyOutcome};
pub use merge::{merge_languages, EditValues, MergedField};
pub use observer::{NoOpObserver, WriteObserver};
