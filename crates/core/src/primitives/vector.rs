//! Vector types for late-interaction scoring
//!
//! These types define token-level embeddings and the similarity functions that
//! compare them. Implementation logic (similarity, MaxSim) lives in the
//! rescore crate.

use crate::error::{RescoreError, RescoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One token embedding
///
/// Dimensionality is the length of the sequence.
pub type Vector = Vec<f32>;

/// Similarity function used to compare two token vectors
///
/// Closed set. Unknown names are a configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityKind {
    /// Dot product (raw value)
    /// Range: unbounded, higher = more similar
    #[default]
    DotProduct,

    /// Cosine similarity: dot(a,b) / (||a|| * ||b||)
    /// Range: [-1, 1], higher = more similar. 0.0 when either norm is zero.
    Cosine,
}

impl SimilarityKind {
    /// All supported kinds
    pub const ALL: [SimilarityKind; 2] = [SimilarityKind::DotProduct, SimilarityKind::Cosine];

    /// Canonical name, as written in the text and wire forms
    pub fn name(&self) -> &'static str {
        match self {
            SimilarityKind::DotProduct => "dot_product",
            SimilarityKind::Cosine => "cosine",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dot_product" => Some(SimilarityKind::DotProduct),
            "cosine" => Some(SimilarityKind::Cosine),
            _ => None,
        }
    }
}

impl fmt::Display for SimilarityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimilarityKind {
    type Err = RescoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SimilarityKind::parse(s).ok_or_else(|| RescoreError::UnknownSimilarityKind {
            name: s.to_string(),
        })
    }
}

/// All token vectors for one query or one document
///
/// Order does not affect MaxSim scoring but is preserved for serialization.
/// A `VectorSet` is not required to be rectangular: document vectors come
/// straight from storage, and a dimension mismatch must surface as an error
/// at scoring time rather than being hidden at construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorSet(Vec<Vector>);

impl VectorSet {
    /// Create a vector set from token vectors
    pub fn new(vectors: Vec<Vector>) -> Self {
        VectorSet(vectors)
    }

    /// Create an empty vector set
    pub fn empty() -> Self {
        VectorSet(Vec::new())
    }

    /// Number of token vectors
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no token vectors
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Dimension of the first vector, if any
    pub fn dimension(&self) -> Option<usize> {
        self.0.first().map(Vec::len)
    }

    /// Iterate over token vectors
    pub fn iter(&self) -> std::slice::Iter<'_, Vector> {
        self.0.iter()
    }

    /// Get a token vector by position
    pub fn get(&self, index: usize) -> Option<&[f32]> {
        self.0.get(index).map(Vec::as_slice)
    }

    /// Borrow the token vectors
    pub fn as_slice(&self) -> &[Vector] {
        &self.0
    }

    /// Consume into the underlying vectors
    pub fn into_inner(self) -> Vec<Vector> {
        self.0
    }

    /// Check that every vector is non-empty and all share one dimension
    ///
    /// Returns the shared dimension, or `None` for an empty set.
    pub fn validate_rectangular(&self) -> RescoreResult<Option<usize>> {
        let Some(dim) = self.dimension() else {
            return Ok(None);
        };
        if dim == 0 {
            return Err(RescoreError::invalid_config(
                "query_vectors must not contain empty vectors",
            ));
        }
        for (i, v) in self.0.iter().enumerate() {
            if v.len() != dim {
                return Err(RescoreError::invalid_config(format!(
                    "query_vectors must be rectangular: vector {} has dimension {}, expected {}",
                    i,
                    v.len(),
                    dim
                )));
            }
        }
        Ok(Some(dim))
    }
}

impl From<Vec<Vector>> for VectorSet {
    fn from(vectors: Vec<Vector>) -> Self {
        VectorSet(vectors)
    }
}

impl FromIterator<Vector> for VectorSet {
    fn from_iter<I: IntoIterator<Item = Vector>>(iter: I) -> Self {
        VectorSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a VectorSet {
    type Item = &'a Vector;
    type IntoIter = std::slice::Iter<'a, Vector>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
