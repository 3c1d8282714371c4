//! Host adapter
//!
//! Maps the host search pipeline's shapes onto the kernel and back. The host
//! nests the rescorer under its registered name next to the window size:
//!
//! ```json
//! {
//!   "window_size": 50,
//!   "maxsim": {
//!     "query_vectors": [[0.1, 0.2], [0.3, 0.4]],
//!     "field": "token_vectors"
//!   }
//! }
//! ```
//!
//! No scoring happens here.

use crate::config::{
    expect_number, token_kind, RescoreConfig, RescoreConfigBuilder, RESCORER_NAME,
};
use crate::settings::RescoreSettings;
use serde_json::{Map, Value};
use strata_core::{Candidate, DocId, RescoreError, RescoreResult, ScoreDoc, TopDocs};

const WINDOW_SIZE_FIELD: &str = "window_size";

/// Parse a host rescore request into a validated config
///
/// A missing `window_size` (or any missing optional key of the rescorer
/// object) takes its value from `settings`.
///
/// # Errors
///
/// - `InvalidConfig` for unknown keys, a missing rescorer object, a window
///   that is not a positive integer, or one above `settings.max_window_size`
/// - any error of [`RescoreConfigBuilder::from_json`] and
///   [`RescoreConfigBuilder::build`]
pub fn parse_rescore_request(
    request: &Value,
    settings: &RescoreSettings,
) -> RescoreResult<RescoreConfig> {
    let obj = request
        .as_object()
        .ok_or_else(|| RescoreError::parse("an object", token_kind(request)))?;

    for key in obj.keys() {
        if key != WINDOW_SIZE_FIELD && key != RESCORER_NAME {
            return Err(RescoreError::invalid_config(format!(
                "unknown field '{}' in rescore request",
                key
            )));
        }
    }

    let body = obj.get(RESCORER_NAME).ok_or_else(|| {
        RescoreError::invalid_config(format!("rescore request requires '{}'", RESCORER_NAME))
    })?;

    let window_size = match obj.get(WINDOW_SIZE_FIELD) {
        Some(v) => parse_window_size(v)?,
        None => settings.window_size,
    };
    if window_size > settings.max_window_size {
        return Err(RescoreError::invalid_config(format!(
            "window_size {} exceeds max_window_size {}",
            window_size, settings.max_window_size
        )));
    }

    RescoreConfigBuilder::from_json(body, settings)?
        .with_window_size(window_size)
        .build()
}

/// Render a config as a host rescore request
///
/// [`parse_rescore_request`] over the output reproduces an equal config as
/// long as the window fits the parsing side's `max_window_size` and the query
/// components are finite. A builder-made config with a larger window renders
/// fine but is rejected on the way back in.
pub fn to_rescore_request(config: &RescoreConfig) -> Value {
    let mut obj = Map::new();
    obj.insert(
        WINDOW_SIZE_FIELD.to_string(),
        Value::from(config.window_size() as u64),
    );
    obj.insert(RESCORER_NAME.to_string(), config.to_json());
    Value::Object(obj)
}

fn parse_window_size(value: &Value) -> RescoreResult<usize> {
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).map_err(|_| {
            RescoreError::invalid_config(format!("window_size {} is too large", n))
        });
    }
    // Reaching here means negative or fractional, or not a number at all
    let n = expect_number(value, WINDOW_SIZE_FIELD)?;
    Err(RescoreError::invalid_config(format!(
        "window_size must be a positive integer, got {}",
        n
    )))
}

/// Convert a host response into candidates, preserving order
///
/// Each candidate starts with `new_score == original_score == score`.
pub fn candidates_from_top_docs(top_docs: &TopDocs) -> Vec<Candidate> {
    top_docs
        .score_docs
        .iter()
        .map(|sd| Candidate {
            doc_id: DocId::new(sd.doc),
            original_score: sd.score,
            new_score: sd.score,
            shard_index: sd.shard_index,
        })
        .collect()
}

/// Convert rescored candidates back into a host response
///
/// Scores are taken from `new_score`; order is kept as-is.
pub fn top_docs_from_candidates(candidates: &[Candidate], total_hits: u64) -> TopDocs {
    TopDocs {
        total_hits,
        score_docs: candidates
            .iter()
            .map(|c| ScoreDoc {
                doc: c.doc_id.as_u64(),
                score: c.new_score,
                shard_index: c.shard_index,
            })
            .collect(),
    }
}
