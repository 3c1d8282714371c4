//! Primitive types for late-interaction scoring
//!
//! - **strata-core** defines the canonical vector types (this module)
//! - **strata-rescore** provides the similarity and aggregation logic
//!
//! Both crates share the same type definitions from core.

pub mod vector;

pub use vector::{SimilarityKind, Vector, VectorSet};
