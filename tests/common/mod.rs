//! Shared test utilities for the rescoring suites.
//!
//! Import via `mod common;` from a test's main.rs.

#![allow(dead_code)]

use std::sync::Once;
pub use strata_maxsim::{
    Candidate, DocId, InMemoryVectorStore, RescoreConfig, ScoreDoc, SimilarityKind, TopDocs,
    VectorSet,
};

pub const FIELD: &str = "token_vectors";

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route kernel logs to the test harness output.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Fixtures
// ============================================================================

/// Query with two orthogonal unit tokens.
pub fn identity_query() -> VectorSet {
    VectorSet::new(vec![vec![1.0, 0.0], vec![0.0, 1.0]])
}

/// Document whose tokens are `scale` times the identity tokens.
pub fn scaled_doc(scale: f32) -> VectorSet {
    VectorSet::new(vec![vec![scale, 0.0], vec![0.0, scale]])
}

/// Store where document `i` has `scaled_doc(scales[i])`.
pub fn scaled_store(scales: &[f32]) -> InMemoryVectorStore {
    let mut store = InMemoryVectorStore::new();
    for (i, scale) in scales.iter().enumerate() {
        store.insert(DocId::new(i as u64), FIELD, scaled_doc(*scale));
    }
    store
}

/// Ranked host response with descending scores starting at `top`.
pub fn top_docs(count: u64, top: f32) -> TopDocs {
    TopDocs::new(
        (0..count)
            .map(|i| ScoreDoc::new(i, top - i as f32))
            .collect(),
    )
}

/// Ranked candidates with descending scores starting at `top`.
pub fn ranked(count: u64, top: f32) -> Vec<Candidate> {
    (0..count)
        .map(|i| Candidate::new(DocId::new(i), top - i as f32))
        .collect()
}
