//! Document token vector lookup
//!
//! The rescorer never owns document vectors; it asks a [`VectorLookup`] for
//! the vectors stored under `(doc_id, field)` one candidate at a time. A miss
//! is reported as `VectorLookupMiss` and leaves that candidate's score as-is.
//! Any other error returned by a lookup aborts the rescoring call.

use std::collections::HashMap;
use strata_core::{DocId, RescoreError, RescoreResult, VectorSet};

/// Source of per-document token vectors.
///
/// Implementations must be safe to query from several shards at once.
/// The trait is object-safe for use as `&dyn VectorLookup`.
pub trait VectorLookup: Send + Sync {
    /// Fetch the token vectors of `doc_id` stored in `field`.
    ///
    /// Returns `VectorLookupMiss` when the document has no vectors for the
    /// field. A present but empty set is returned as-is and fails later with
    /// `EmptyCandidateVectors`.
    fn lookup(&self, doc_id: DocId, field: &str) -> RescoreResult<VectorSet>;
}

impl<L: VectorLookup + ?Sized> VectorLookup for &L {
    fn lookup(&self, doc_id: DocId, field: &str) -> RescoreResult<VectorSet> {
        (**self).lookup(doc_id, field)
    }
}

impl<L: VectorLookup + ?Sized> VectorLookup for Box<L> {
    fn lookup(&self, doc_id: DocId, field: &str) -> RescoreResult<VectorSet> {
        (**self).lookup(doc_id, field)
    }
}

impl<L: VectorLookup + ?Sized> VectorLookup for std::sync::Arc<L> {
    fn lookup(&self, doc_id: DocId, field: &str) -> RescoreResult<VectorSet> {
        (**self).lookup(doc_id, field)
    }
}

// ============================================================================
// Closure adapter
// ============================================================================

/// Lookup backed by a closure returning `None` on a miss
#[derive(Clone)]
pub struct FnLookup<F> {
    f: F,
}

/// Wrap a closure as a [`VectorLookup`]
///
/// ```ignore
/// let lookup = lookup_fn(|doc, field| index.token_vectors(doc, field));
/// ```
pub fn lookup_fn<F>(f: F) -> FnLookup<F>
where
    F: Fn(DocId, &str) -> Option<VectorSet> + Send + Sync,
{
    FnLookup { f }
}

impl<F> VectorLookup for FnLookup<F>
where
    F: Fn(DocId, &str) -> Option<VectorSet> + Send + Sync,
{
    fn lookup(&self, doc_id: DocId, field: &str) -> RescoreResult<VectorSet> {
        (self.f)(doc_id, field).ok_or_else(|| RescoreError::VectorLookupMiss {
            doc_id,
            field: field.to_string(),
        })
    }
}

impl<F> std::fmt::Debug for FnLookup<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnLookup").finish_non_exhaustive()
    }
}

// ============================================================================
// InMemoryVectorStore
// ============================================================================

/// Token vectors held in memory, keyed by field then document.
///
/// Useful for tests and for hosts that keep late-interaction vectors
/// alongside their postings.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorStore {
    fields: HashMap<String, HashMap<DocId, VectorSet>>,
}

impl InMemoryVectorStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the vectors of `doc_id` under `field`, returning the previous set
    pub fn insert(
        &mut self,
        doc_id: DocId,
        field: impl Into<String>,
        vectors: VectorSet,
    ) -> Option<VectorSet> {
        self.fields
            .entry(field.into())
            .or_default()
            .insert(doc_id, vectors)
    }

    /// Remove the vectors of `doc_id` under `field`
    pub fn remove(&mut self, doc_id: DocId, field: &str) -> Option<VectorSet> {
        let docs = self.fields.get_mut(field)?;
        let removed = docs.remove(&doc_id);
        if docs.is_empty() {
            self.fields.remove(field);
        }
        removed
    }

    /// Borrow the vectors of `doc_id` under `field`
    pub fn get(&self, doc_id: DocId, field: &str) -> Option<&VectorSet> {
        self.fields.get(field)?.get(&doc_id)
    }

    /// Number of stored (document, field) entries
    pub fn len(&self) -> usize {
        self.fields.values().map(HashMap::len).sum()
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl VectorLookup for InMemoryVectorStore {
    fn lookup(&self, doc_id: DocId, field: &str) -> RescoreResult<VectorSet> {
        self.get(doc_id, field)
            .cloned()
            .ok_or_else(|| RescoreError::VectorLookupMiss {
                doc_id,
                field: field.to_string(),
            })
    }
}
