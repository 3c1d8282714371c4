//! Error types for late-interaction rescoring
//!
//! Configuration errors are raised before any candidate is touched.
//! Per-candidate scoring errors abort the whole rescoring call and are wrapped
//! in [`RescoreError::Candidate`] so the caller learns which document and
//! field triggered them. A lookup miss is the only recoverable variant.

use crate::limits::LimitError;
use crate::search_types::DocId;
use std::io;
use thiserror::Error;

/// Errors raised while configuring or running a rescore
#[derive(Debug, Error)]
pub enum RescoreError {
    /// Two compared vectors have different lengths
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Dimension of the left-hand (query) vector
        expected: usize,
        /// Dimension of the right-hand (document) vector
        got: usize,
    },

    /// A document's vector set for the target field is present but empty
    #[error("Empty candidate vectors: document has no token vectors to match against")]
    EmptyCandidateVectors,

    /// Malformed or missing configuration
    #[error("Invalid rescore config: {reason}")]
    InvalidConfig {
        /// What was wrong with the configuration
        reason: String,
    },

    /// Similarity name is not one of the supported kinds
    #[error("Unknown similarity kind: {name}")]
    UnknownSimilarityKind {
        /// The unrecognized name
        name: String,
    },

    /// The lookup collaborator has no vectors for this document and field
    #[error("No vectors for {doc_id} in field '{field}'")]
    VectorLookupMiss {
        /// Document that was looked up
        doc_id: DocId,
        /// Field that was looked up
        field: String,
    },

    /// A scoring error attributed to one candidate
    #[error("Rescoring {doc_id} on field '{field}' failed: {source}")]
    Candidate {
        /// Candidate being scored when the error occurred
        doc_id: DocId,
        /// Field the document vectors were read from
        field: String,
        /// Underlying kernel error
        #[source]
        source: Box<RescoreError>,
    },

    /// Structural parse error in the text configuration form
    #[error("Expected {expected} but got {found}")]
    Parse {
        /// What the parser expected at this position
        expected: String,
        /// Kind of token actually found
        found: String,
    },

    /// Wire, JSON or TOML decoding error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Decoded data exceeds configured limits
    #[error("Limit exceeded: {0}")]
    Limit(#[from] LimitError),

    /// I/O error (settings file access)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RescoreError {
    /// Build an `InvalidConfig` error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        RescoreError::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Build a structural `Parse` error
    pub fn parse(expected: impl Into<String>, found: impl Into<String>) -> Self {
        RescoreError::Parse {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Attribute a kernel error to a candidate
    pub fn for_candidate(self, doc_id: DocId, field: &str) -> Self {
        RescoreError::Candidate {
            doc_id,
            field: field.to_string(),
            source: Box::new(self),
        }
    }

    /// Check if rescoring may continue past this error
    ///
    /// Only a lookup miss is recoverable; the candidate keeps its original score.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RescoreError::VectorLookupMiss { .. })
    }

    /// Check if this error was raised while building a configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            RescoreError::InvalidConfig { .. }
                | RescoreError::UnknownSimilarityKind { .. }
                | RescoreError::Parse { .. }
        )
    }

    /// The innermost error, unwrapping candidate attribution
    pub fn root_cause(&self) -> &RescoreError {
        match self {
            RescoreError::Candidate { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type alias for rescoring operations
pub type RescoreResult<T> = Result<T, RescoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_dimension_mismatch() {
        let err = RescoreError::DimensionMismatch {
            expected: 128,
            got: 96,
        };
        let msg = err.to_string();
        assert!(msg.contains("Dimension mismatch"));
        assert!(msg.contains("128"));
        assert!(msg.contains("96"));
    }

    #[test]
    fn test_error_display_unknown_similarity() {
        let err = RescoreError::UnknownSimilarityKind {
            name: "hamming".to_string(),
        };
        assert!(err.to_string().contains("hamming"));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_error_display_parse() {
        let err = RescoreError::parse("an array of vectors", "string");
        assert_eq!(err.to_string(), "Expected an array of vectors but got string");
    }

    #[test]
    fn test_only_lookup_miss_is_recoverable() {
        let miss = RescoreError::VectorLookupMiss {
            doc_id: DocId::new(7),
            field: "colbert".to_string(),
        };
        assert!(miss.is_recoverable());
        assert!(!RescoreError::EmptyCandidateVectors.is_recoverable());
        assert!(!RescoreError::invalid_config("field").is_recoverable());
    }

    #[test]
    fn test_candidate_attribution() {
        let err = RescoreError::DimensionMismatch {
            expected: 2,
            got: 3,
        }
        .for_candidate(DocId::new(42), "tokens");
        let msg = err.to_string();
        assert!(msg.contains("DocId(42)"));
        assert!(msg.contains("tokens"));
        assert!(msg.contains("expected 2, got 3"));
        assert!(matches!(
            err.root_cause(),
            RescoreError::DimensionMismatch {
                expected: 2,
                got: 3
            }
        ));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: RescoreError = io_err.into();
        assert!(matches!(err, RescoreError::Io(_)));
    }

    #[test]
    fn test_error_from_limit() {
        let err: RescoreError = LimitError::VectorDimExceeded {
            actual: 10_000,
            max: 8192,
        }
        .into();
        assert!(matches!(err, RescoreError::Limit(_)));
        assert!(err.to_string().contains("8192"));
    }
}
