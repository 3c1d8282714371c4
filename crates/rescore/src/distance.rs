//! Similarity primitives for token vectors.
//!
//! All scores are "higher = more similar". Vectors are used as-is, with no
//! implicit normalization. NaN and infinite components propagate through the
//! arithmetic unchanged; the only special case is the zero-norm rule for
//! cosine.

use strata_core::{RescoreError, RescoreResult, SimilarityKind};

/// Compute similarity between two vectors using `kind`
///
/// Fails with `DimensionMismatch` if the lengths differ.
pub fn compute_similarity(a: &[f32], b: &[f32], kind: SimilarityKind) -> RescoreResult<f32> {
    match kind {
        SimilarityKind::DotProduct => dot_product(a, b),
        SimilarityKind::Cosine => cosine_similarity(a, b),
    }
}

/// Dot product (inner product)
///
/// Range: unbounded, higher = more similar
pub fn dot_product(a: &[f32], b: &[f32]) -> RescoreResult<f32> {
    check_dimensions(a, b)?;
    Ok(dot(a, b))
}

/// Cosine similarity: dot(a,b) / (||a|| * ||b||)
///
/// Range: [-1, 1], higher = more similar.
/// Returns exactly 0.0 if either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> RescoreResult<f32> {
    check_dimensions(a, b)?;
    let norm_sq_a = dot(a, a);
    let norm_sq_b = dot(b, b);

    if norm_sq_a == 0.0 || norm_sq_b == 0.0 {
        return Ok(0.0);
    }

    // sqrt(|a|^2 * |b|^2) in f64: the product of two f32 values is exact there,
    // so a vector compared with itself divides by exactly its own dot product.
    let denom = ((norm_sq_a as f64) * (norm_sq_b as f64)).sqrt() as f32;
    Ok(dot(a, b) / denom)
}

fn check_dimensions(a: &[f32], b: &[f32]) -> RescoreResult<()> {
    if a.len() != b.len() {
        return Err(RescoreError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    Ok(())
}

#[inline]
fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
