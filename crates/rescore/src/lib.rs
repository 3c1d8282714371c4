//! Late-interaction rescoring for Strata
//!
//! Re-ranks a bounded window of first-stage candidates with MaxSim: every
//! query token vector is matched against every document token vector, the
//! best match per query token is kept, and the maxima are summed. The result
//! is blended with the upstream score.
//!
//! This crate provides:
//! - Similarity primitives (dot product, cosine)
//! - MaxSim aggregation
//! - RescoreConfig with validated construction, text form and wire form
//! - VectorLookup collaborator trait and an in-memory implementation
//! - Windowed rescoring and per-candidate explanations
//! - RescoreSettings loaded from `rescore.toml`
//! - Host adapter mapping request/response shapes onto the kernel
//!
//! # Usage
//!
//! ```ignore
//! use strata_rescore::{MaxSimRescorer, RescoreConfig, Rescorer};
//!
//! let config = RescoreConfig::from_json_str(request_body)?;
//! let stats = MaxSimRescorer.rescore(&mut candidates, &config, &store)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod config;
pub mod distance;
pub mod explain;
pub mod lookup;
pub mod maxsim;
pub mod rescorer;
pub mod settings;
pub mod wire;

// Re-export commonly used types
pub use adapter::{
    candidates_from_top_docs, parse_rescore_request, to_rescore_request, top_docs_from_candidates,
};
pub use config::{
    RescoreConfig, RescoreConfigBuilder, DEFAULT_WEIGHT, DEFAULT_WINDOW_SIZE, RESCORER_NAME,
};
pub use distance::{compute_similarity, cosine_similarity, dot_product};
pub use explain::{explain, explain_with_lookup, Explanation};
pub use lookup::{lookup_fn, FnLookup, InMemoryVectorStore, VectorLookup};
pub use maxsim::{max_sim, max_sim_detailed, TokenMatch};
pub use rescorer::{blend, rescore, MaxSimRescorer, RescoreStats, Rescorer};
pub use settings::{RescoreSettings, SETTINGS_FILE_NAME};
pub use wire::{decode_config, decode_config_with_limits, encode_config, read_config, write_config};
