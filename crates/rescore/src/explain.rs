//! Per-candidate score explanations
//!
//! An [`Explanation`] justifies the score [`rescore`](crate::rescorer::rescore)
//! gives one candidate. Both paths share the MaxSim accumulation and the blend,
//! so `final_score` is bit-for-bit the `new_score` rescoring produces for the
//! same candidate, config and vectors.
//!
//! ```text
//! 2.00 MaxSim rescoring: (original=5.00 * (1-weight=1.00)) + (maxsim=2.00 * weight=1.00)
//!   5.00 original score
//!   2.00 MaxSim score using dot_product similarity
//!     1.00 query token 0 -> document token 0
//!     1.00 query token 1 -> document token 1
//! ```

use crate::config::RescoreConfig;
use crate::lookup::VectorLookup;
use crate::maxsim::{max_sim_detailed, total, TokenMatch};
use crate::rescorer::blend;
use std::fmt;
use strata_core::{Candidate, RescoreResult, SimilarityKind, VectorSet};

/// Why a candidate has the score it has
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    /// False when the candidate's vectors could not be resolved
    pub matched: bool,
    /// Score after rescoring
    pub final_score: f32,
    /// Upstream score
    pub original_score: f32,
    /// MaxSim score, absent on a lookup miss
    pub similarity_score: Option<f32>,
    /// Blend weight
    pub weight: f32,
    /// Similarity function used
    pub similarity: SimilarityKind,
    /// Best document token for every query token, in query order
    pub token_matches: Vec<TokenMatch>,
    /// One-line summary of the computation
    pub breakdown: String,
}

impl Explanation {
    fn no_match(candidate: &Candidate, config: &RescoreConfig) -> Self {
        Explanation {
            matched: false,
            final_score: candidate.original_score,
            original_score: candidate.original_score,
            similarity_score: None,
            weight: config.weight(),
            similarity: config.similarity(),
            token_matches: Vec::new(),
            breakdown: format!(
                "No token vectors for {} in field '{}'; original score kept",
                candidate.doc_id,
                config.field()
            ),
        }
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:.2} {}", self.final_score, self.breakdown)?;
        writeln!(f, "  {:.2} original score", self.original_score)?;
        if let Some(score) = self.similarity_score {
            writeln!(
                f,
                "  {:.2} MaxSim score using {} similarity",
                score, self.similarity
            )?;
            for m in &self.token_matches {
                writeln!(
                    f,
                    "    {:.2} query token {} -> document token {}",
                    m.similarity, m.query_index, m.doc_index
                )?;
            }
        }
        Ok(())
    }
}

/// Explain one candidate given its document vectors
///
/// `None` for `doc_vectors` yields a no-match explanation whose final score
/// is the original score, as rescoring does on a lookup miss.
///
/// # Errors
///
/// Fails exactly where rescoring would abort for this candidate: on a
/// dimension mismatch or an empty document vector set.
pub fn explain(
    candidate: &Candidate,
    config: &RescoreConfig,
    doc_vectors: Option<&VectorSet>,
) -> RescoreResult<Explanation> {
    let doc_vectors = match doc_vectors {
        Some(v) => v,
        None => return Ok(Explanation::no_match(candidate, config)),
    };

    let token_matches = max_sim_detailed(config.query_vectors(), doc_vectors, config.similarity())
        .map_err(|e| e.for_candidate(candidate.doc_id, config.field()))?;
    let similarity_score = total(&token_matches);
    let weight = config.weight();
    let final_score = blend(candidate.original_score, similarity_score, weight);

    Ok(Explanation {
        matched: true,
        final_score,
        original_score: candidate.original_score,
        similarity_score: Some(similarity_score),
        weight,
        similarity: config.similarity(),
        token_matches,
        breakdown: format!(
            "MaxSim rescoring: (original={:.2} * (1-weight={:.2})) + (maxsim={:.2} * weight={:.2})",
            candidate.original_score, weight, similarity_score, weight
        ),
    })
}

/// Explain one candidate, resolving its vectors through `lookup`
pub fn explain_with_lookup<L: VectorLookup + ?Sized>(
    candidate: &Candidate,
    config: &RescoreConfig,
    lookup: &L,
) -> RescoreResult<Explanation> {
    match lookup.lookup(candidate.doc_id, config.field()) {
        Ok(vectors) => explain(candidate, config, Some(&vectors)),
        Err(e) if e.is_recoverable() => explain(candidate, config, None),
        Err(e) => Err(e.for_candidate(candidate.doc_id, config.field())),
    }
}
