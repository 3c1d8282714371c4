//! Size limits for decoded rescore configurations
//!
//! A configuration arriving over the wire is untrusted: vector counts,
//! dimensions and string lengths are read from the stream before any
//! allocation, and these limits bound them.

use thiserror::Error;

/// Size limits enforced by wire decoding
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum number of query token vectors (default: 4096)
    pub max_query_vectors: usize,

    /// Maximum vector dimensions (default: 8192)
    pub max_vector_dim: usize,

    /// Maximum length of a wire string in bytes (default: 64KB)
    pub max_string_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_query_vectors: 4096,
            max_vector_dim: 8192,
            max_string_bytes: 64 * 1024,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        Limits {
            max_query_vectors: 8,
            max_vector_dim: 16,
            max_string_bytes: 64,
        }
    }

    /// Validate a query vector count
    pub fn validate_vector_count(&self, count: usize) -> Result<(), LimitError> {
        if count > self.max_query_vectors {
            return Err(LimitError::TooManyVectors {
                actual: count,
                max: self.max_query_vectors,
            });
        }
        Ok(())
    }

    /// Validate a vector dimension
    pub fn validate_vector_dim(&self, dim: usize) -> Result<(), LimitError> {
        if dim > self.max_vector_dim {
            return Err(LimitError::VectorDimExceeded {
                actual: dim,
                max: self.max_vector_dim,
            });
        }
        Ok(())
    }

    /// Validate a string length in bytes
    pub fn validate_string_len(&self, len: usize) -> Result<(), LimitError> {
        if len > self.max_string_bytes {
            return Err(LimitError::StringTooLong {
                actual: len,
                max: self.max_string_bytes,
            });
        }
        Ok(())
    }
}

/// Limit validation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LimitError {
    /// Too many query vectors
    #[error("too many vectors: {actual} (max {max})")]
    TooManyVectors {
        /// Actual count
        actual: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Vector dimension exceeds maximum
    #[error("vector dimension {actual} exceeds maximum {max}")]
    VectorDimExceeded {
        /// Actual dimension
        actual: usize,
        /// Maximum allowed
        max: usize,
    },

    /// String exceeds maximum length
    #[error("string length {actual} exceeds maximum {max}")]
    StringTooLong {
        /// Actual length in bytes
        actual: usize,
        /// Maximum allowed
        max: usize,
    },
}
