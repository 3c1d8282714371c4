//! Strata MaxSim - late-interaction rescoring for ranked candidate lists
//!
//! Rescores the top window of a first-stage result list with MaxSim: each
//! query token vector is matched against each document token vector, the
//! best match per query token is kept and the maxima are summed. The sum is
//! blended with the upstream score.
//!
//! # Quick Start
//!
//! ```ignore
//! use strata_maxsim::{rescore, Candidate, DocId, InMemoryVectorStore, RescoreConfig, VectorSet};
//!
//! let mut store = InMemoryVectorStore::new();
//! store.insert(DocId::new(1), "token_vectors", doc_vectors);
//!
//! let config = RescoreConfig::new(query_vectors, "token_vectors")?;
//! let mut candidates = vec![Candidate::new(DocId::new(1), 5.0)];
//! rescore(&mut candidates, &config, &store)?;
//! ```
//!
//! # Architecture
//!
//! Shared types and errors live in `strata-core`; the kernel (similarity,
//! MaxSim, config, lookup, rescorer, explanations, wire form, settings and
//! host adapter) lives in `strata-rescore`. This crate re-exports both.

pub use strata_core::*;
pub use strata_rescore::*;
