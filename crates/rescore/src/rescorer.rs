//! Windowed rescoring
//!
//! Applies MaxSim to the top `window_size` entries of a ranked candidate list
//! and blends the result with each entry's upstream score:
//!
//! ```text
//! new_score = (1 - weight) * original_score + weight * maxsim
//! ```
//!
//! Only score fields change. Length, order and identifiers are preserved and
//! the list is never re-sorted; re-sorting is the caller's decision.
//!
//! A call is all-or-nothing. Scores are computed into a scratch buffer and
//! committed only once every windowed candidate has succeeded or been skipped
//! on a lookup miss, so an error leaves the candidate list exactly as it was.

use crate::adapter::{candidates_from_top_docs, top_docs_from_candidates};
use crate::config::{RescoreConfig, RESCORER_NAME};
use crate::explain::{explain_with_lookup, Explanation};
use crate::lookup::VectorLookup;
use crate::maxsim::max_sim;
use rayon::prelude::*;
use strata_core::{Candidate, RescoreError, RescoreResult, TopDocs};

/// Counters for one rescoring call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RescoreStats {
    /// Effective window: `min(window_size, candidates.len())`
    pub window: usize,
    /// Windowed candidates whose score was recomputed
    pub rescored: usize,
    /// Windowed candidates skipped because their vectors were missing
    pub skipped: usize,
}

/// Affine blend of the upstream score and the late-interaction score
///
/// `weight = 1.0` replaces the original score; `weight = 0.0` keeps it.
/// Both boundaries are exact even when the discarded term is infinite.
#[inline]
pub fn blend(original: f32, similarity: f32, weight: f32) -> f32 {
    if weight == 0.0 {
        original
    } else if weight == 1.0 {
        similarity
    } else {
        (1.0 - weight) * original + weight * similarity
    }
}

/// Rescore the windowed prefix of `candidates` in place
///
/// Positions at or beyond the window, and windowed candidates whose vectors
/// are missing, end with `new_score == original_score`.
///
/// # Errors
///
/// Any non-miss error (dimension mismatch, empty document vectors, a failing
/// lookup) aborts the call, wrapped in `RescoreError::Candidate` with the
/// offending document and field. The list is left unchanged.
pub fn rescore<L: VectorLookup + ?Sized>(
    candidates: &mut [Candidate],
    config: &RescoreConfig,
    lookup: &L,
) -> RescoreResult<RescoreStats> {
    let window = config.window_size().min(candidates.len());
    let mut stats = RescoreStats {
        window,
        ..RescoreStats::default()
    };

    let mut scores: Vec<Option<f32>> = Vec::with_capacity(window);
    for candidate in &candidates[..window] {
        let score = score_candidate(candidate, config, lookup)?;
        match score {
            Some(_) => stats.rescored += 1,
            None => stats.skipped += 1,
        }
        scores.push(score);
    }

    for (candidate, score) in candidates[..window].iter_mut().zip(scores) {
        candidate.new_score = score.unwrap_or(candidate.original_score);
    }
    for candidate in &mut candidates[window..] {
        candidate.reset();
    }

    tracing::debug!(
        target: "strata::rescore",
        field = config.field(),
        window = stats.window,
        rescored = stats.rescored,
        skipped = stats.skipped,
        "Rescored candidate window"
    );
    Ok(stats)
}

/// Blended score for one candidate, or `None` on a lookup miss.
fn score_candidate<L: VectorLookup + ?Sized>(
    candidate: &Candidate,
    config: &RescoreConfig,
    lookup: &L,
) -> RescoreResult<Option<f32>> {
    let doc_vectors = match lookup.lookup(candidate.doc_id, config.field()) {
        Ok(vectors) => vectors,
        Err(e) if e.is_recoverable() => {
            tracing::debug!(
                target: "strata::rescore",
                doc_id = candidate.doc_id.as_u64(),
                field = config.field(),
                "No token vectors; keeping original score"
            );
            return Ok(None);
        }
        Err(e) => return Err(abort(candidate, config, e)),
    };

    let similarity = max_sim(config.query_vectors(), &doc_vectors, config.similarity())
        .map_err(|e| abort(candidate, config, e))?;
    Ok(Some(blend(
        candidate.original_score,
        similarity,
        config.weight(),
    )))
}

fn abort(candidate: &Candidate, config: &RescoreConfig, error: RescoreError) -> RescoreError {
    tracing::warn!(
        target: "strata::rescore",
        doc_id = candidate.doc_id.as_u64(),
        field = config.field(),
        error = %error,
        "Rescoring aborted"
    );
    error.for_candidate(candidate.doc_id, config.field())
}

// ============================================================================
// Rescorer trait
// ============================================================================

/// A second-stage scorer over a ranked candidate window.
///
/// Object-safe so hosts can register rescorers by name as
/// `Box<dyn Rescorer>`.
pub trait Rescorer: Send + Sync {
    /// Name the rescorer is registered under
    fn name(&self) -> &'static str;

    /// Rescore the windowed prefix of `candidates` in place
    fn rescore(
        &self,
        candidates: &mut [Candidate],
        config: &RescoreConfig,
        lookup: &dyn VectorLookup,
    ) -> RescoreResult<RescoreStats>;

    /// Explain the score `rescore` assigns to one candidate
    fn explain(
        &self,
        candidate: &Candidate,
        config: &RescoreConfig,
        lookup: &dyn VectorLookup,
    ) -> RescoreResult<Explanation>;
}

/// MaxSim late-interaction rescorer
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxSimRescorer;

impl MaxSimRescorer {
    /// Rescore several disjoint candidate lists in parallel
    ///
    /// Each shard is an independent call with its own result; a failure in
    /// one shard leaves that shard untouched and does not affect the others.
    pub fn rescore_shards<L: VectorLookup + ?Sized>(
        &self,
        shards: &mut [Vec<Candidate>],
        config: &RescoreConfig,
        lookup: &L,
    ) -> Vec<RescoreResult<RescoreStats>> {
        shards
            .par_iter_mut()
            .map(|shard| rescore(shard, config, lookup))
            .collect()
    }

    /// Rescore a host `TopDocs` response in place
    ///
    /// Documents keep their order and shard index; `total_hits` is preserved.
    pub fn rescore_top_docs<L: VectorLookup + ?Sized>(
        &self,
        top_docs: &mut TopDocs,
        config: &RescoreConfig,
        lookup: &L,
    ) -> RescoreResult<RescoreStats> {
        let mut candidates = candidates_from_top_docs(top_docs);
        let stats = rescore(&mut candidates, config, lookup)?;
        *top_docs = top_docs_from_candidates(&candidates, top_docs.total_hits);
        Ok(stats)
    }
}

impl Rescorer for MaxSimRescorer {
    fn name(&self) -> &'static str {
        RESCORER_NAME
    }

    fn rescore(
        &self,
        candidates: &mut [Candidate],
        config: &RescoreConfig,
        lookup: &dyn VectorLookup,
    ) -> RescoreResult<RescoreStats> {
        rescore(candidates, config, lookup)
    }

    fn explain(
        &self,
        candidate: &Candidate,
        config: &RescoreConfig,
        lookup: &dyn VectorLookup,
    ) -> RescoreResult<Explanation> {
        explain_with_lookup(candidate, config, lookup)
    }
}
