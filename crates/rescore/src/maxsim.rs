//! MaxSim late-interaction aggregation
//!
//! ```text
//! MaxSim(Q, D) = Σᵢ maxⱼ sim(Qᵢ, Dⱼ)
//! ```
//!
//! Each query token selects its best-matching document token; the maxima are
//! summed. Token order on either side does not affect the score. The first
//! argument is always the query: `MaxSim(Q, D) != MaxSim(D, Q)` in general.
//!
//! Cost is O(|Q| × |D| × dim) per document, which is why rescoring runs only
//! over a bounded window of candidates.

use crate::distance::compute_similarity;
use strata_core::{RescoreError, RescoreResult, SimilarityKind, VectorSet};

/// Best document token for one query token
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenMatch {
    /// Position of the query token
    pub query_index: usize,
    /// Position of the document token that produced the maximum
    pub doc_index: usize,
    /// The maximum similarity
    pub similarity: f32,
}

/// Sum over query tokens of the best similarity against any document token
///
/// An empty query yields `0.0` for any document. A non-empty query against an
/// empty document fails with `EmptyCandidateVectors`: the maximum is undefined
/// and the missing vectors point at a data problem, not a zero similarity.
pub fn max_sim(
    query_vectors: &VectorSet,
    doc_vectors: &VectorSet,
    kind: SimilarityKind,
) -> RescoreResult<f32> {
    if query_vectors.is_empty() {
        return Ok(0.0);
    }
    if doc_vectors.is_empty() {
        return Err(RescoreError::EmptyCandidateVectors);
    }

    let mut total = 0.0f32;
    for query in query_vectors {
        let (_, best) = best_match(query, doc_vectors, kind)?;
        total += best;
    }
    Ok(total)
}

/// Per-query-token maxima, in query order
///
/// Same preconditions as [`max_sim`]. [`total`] over the result is bit-for-bit
/// equal to `max_sim` for the same inputs.
pub fn max_sim_detailed(
    query_vectors: &VectorSet,
    doc_vectors: &VectorSet,
    kind: SimilarityKind,
) -> RescoreResult<Vec<TokenMatch>> {
    if query_vectors.is_empty() {
        return Ok(Vec::new());
    }
    if doc_vectors.is_empty() {
        return Err(RescoreError::EmptyCandidateVectors);
    }

    query_vectors
        .iter()
        .enumerate()
        .map(|(query_index, query)| {
            let (doc_index, similarity) = best_match(query, doc_vectors, kind)?;
            Ok(TokenMatch {
                query_index,
                doc_index,
                similarity,
            })
        })
        .collect()
}

/// Sum of token-match similarities, accumulated in query order
pub fn total(matches: &[TokenMatch]) -> f32 {
    let mut total = 0.0f32;
    for m in matches {
        total += m.similarity;
    }
    total
}

/// Best (index, similarity) of one query token over a non-empty document.
///
/// NaN wins and sticks, so NaN inputs propagate to the final score.
fn best_match(
    query: &[f32],
    doc_vectors: &VectorSet,
    kind: SimilarityKind,
) -> RescoreResult<(usize, f32)> {
    let mut best_index = 0;
    let mut best = f32::NEG_INFINITY;
    for (i, doc) in doc_vectors.iter().enumerate() {
        let sim = compute_similarity(query, doc, kind)?;
        if sim > best || (sim.is_nan() && !best.is_nan()) {
            best = sim;
            best_index = i;
        }
    }
    Ok((best_index, best))
}
