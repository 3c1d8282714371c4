//! Core types for Strata late-interaction rescoring
//!
//! This crate defines the vocabulary shared by the rescoring kernel and its
//! host integrations:
//! - Vector / VectorSet: token-level embeddings for one query or one document
//! - SimilarityKind: closed set of similarity functions (dot_product, cosine)
//! - DocId / Candidate: ranked entries whose scores are rewritten by rescoring
//! - ScoreDoc / TopDocs: host-shaped ranked results
//! - RescoreError: error taxonomy for configuration and scoring
//! - Limits: bounds enforced when decoding configurations from the wire

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod primitives;
pub mod search_types;

pub use error::{RescoreError, RescoreResult};
pub use limits::{LimitError, Limits};
pub use primitives::{SimilarityKind, Vector, VectorSet};
pub use search_types::{Candidate, DocId, ScoreDoc, TopDocs};
