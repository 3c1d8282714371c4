//! Ranked result types
//!
//! This module defines the entries that rescoring operates on:
//! - DocId: opaque document identifier supplied by first-stage retrieval
//! - Candidate: one ranked entry with its original and rescored score
//! - ScoreDoc / TopDocs: the host pipeline's ranked response shape
//!
//! A ranked list is ordered by descending score, stable for ties. Rescoring
//! rewrites score fields only; identifiers and positions never change.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// DocId
// ============================================================================

/// Opaque document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub u64);

impl DocId {
    /// Create a new DocId
    pub fn new(id: u64) -> Self {
        DocId(id)
    }

    /// Get the underlying u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocId({})", self.0)
    }
}

// ============================================================================
// Candidate
// ============================================================================

/// One entry of a ranked candidate list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Document this entry refers to
    pub doc_id: DocId,

    /// Score assigned by first-stage retrieval
    pub original_score: f32,

    /// Score after rescoring (equals `original_score` until rescored)
    pub new_score: f32,

    /// Shard the document came from, if the host is distributed
    pub shard_index: Option<u32>,
}

impl Candidate {
    /// Create a candidate whose new score starts equal to its original score
    pub fn new(doc_id: DocId, score: f32) -> Self {
        Candidate {
            doc_id,
            original_score: score,
            new_score: score,
            shard_index: None,
        }
    }

    /// Builder: set shard index
    pub fn with_shard(mut self, shard_index: u32) -> Self {
        self.shard_index = Some(shard_index);
        self
    }

    /// Reset the new score to the original score
    pub fn reset(&mut self) {
        self.new_score = self.original_score;
    }
}

// ============================================================================
// Host result shapes
// ============================================================================

/// A scored document as returned by the host retrieval pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreDoc {
    /// Host document number
    pub doc: u64,

    /// Current score
    pub score: f32,

    /// Shard the document came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard_index: Option<u32>,
}

impl ScoreDoc {
    /// Create a new ScoreDoc without shard information
    pub fn new(doc: u64, score: f32) -> Self {
        ScoreDoc {
            doc,
            score,
            shard_index: None,
        }
    }
}

/// The host pipeline's ranked response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopDocs {
    /// Total matching documents (may exceed `score_docs.len()`)
    pub total_hits: u64,

    /// Ranked documents, highest score first
    pub score_docs: Vec<ScoreDoc>,
}

impl TopDocs {
    /// Create a response whose total equals the number of ranked documents
    pub fn new(score_docs: Vec<ScoreDoc>) -> Self {
        TopDocs {
            total_hits: score_docs.len() as u64,
            score_docs,
        }
    }
}
