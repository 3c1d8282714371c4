//! Rescore configuration
//!
//! A [`RescoreConfig`] describes one rescoring request: the query token
//! vectors, the document field holding candidate token vectors, the similarity
//! function, the blend weight and the rescore window. It is validated once at
//! construction and immutable afterwards.
//!
//! ## Text form
//!
//! ```json
//! {
//!   "query_vectors": [[0.1, 0.2], [0.3, 0.4]],
//!   "field": "token_vectors",
//!   "similarity": "dot_product",
//!   "weight": 1.0
//! }
//! ```
//!
//! `query_vectors` and `field` are required; `similarity` and `weight` fall
//! back to the active [`RescoreSettings`]. The window size lives outside this
//! object, in the host request (see the adapter module).

use crate::settings::RescoreSettings;
use serde_json::{Map, Value};
use strata_core::{RescoreError, RescoreResult, SimilarityKind, VectorSet};

/// Name the rescorer is registered under in host requests
pub const RESCORER_NAME: &str = "maxsim";

/// Default number of top candidates to rescore
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Default blend weight (late-interaction score fully replaces the original)
pub const DEFAULT_WEIGHT: f32 = 1.0;

const QUERY_VECTORS_FIELD: &str = "query_vectors";
const FIELD_FIELD: &str = "field";
const SIMILARITY_FIELD: &str = "similarity";
const WEIGHT_FIELD: &str = "weight";

// ============================================================================
// RescoreConfig
// ============================================================================

/// Validated, immutable description of a rescoring request
#[derive(Debug, Clone, PartialEq)]
pub struct RescoreConfig {
    query_vectors: VectorSet,
    field: String,
    similarity: SimilarityKind,
    weight: f32,
    window_size: usize,
}

impl RescoreConfig {
    /// Create a config with default similarity, weight and window size
    pub fn new(query_vectors: VectorSet, field: impl Into<String>) -> RescoreResult<Self> {
        Self::builder(query_vectors, field).build()
    }

    /// Start building a config
    pub fn builder(query_vectors: VectorSet, field: impl Into<String>) -> RescoreConfigBuilder {
        RescoreConfigBuilder::new(query_vectors, field)
    }

    /// Parse the text form using built-in defaults
    pub fn from_json(value: &Value) -> RescoreResult<Self> {
        RescoreConfigBuilder::from_json(value, &RescoreSettings::default())?.build()
    }

    /// Parse the text form from a JSON string
    pub fn from_json_str(s: &str) -> RescoreResult<Self> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| RescoreError::Serialization(e.to_string()))?;
        Self::from_json(&value)
    }

    /// Render the text form
    ///
    /// For finite query components, parsing the output with
    /// [`RescoreConfig::from_json`] reproduces an equal config, except for the
    /// window size which the text form does not carry. JSON has no NaN or
    /// infinity, so non-finite components render as `null`; use the wire form
    /// to move such configs.
    pub fn to_json(&self) -> Value {
        let vectors: Vec<Value> = self
            .query_vectors
            .iter()
            .map(|v| Value::Array(v.iter().map(|x| Value::from(*x)).collect()))
            .collect();

        let mut obj = Map::new();
        obj.insert(QUERY_VECTORS_FIELD.to_string(), Value::Array(vectors));
        obj.insert(FIELD_FIELD.to_string(), Value::from(self.field.clone()));
        obj.insert(
            SIMILARITY_FIELD.to_string(),
            Value::from(self.similarity.name()),
        );
        obj.insert(WEIGHT_FIELD.to_string(), Value::from(self.weight));
        Value::Object(obj)
    }

    /// Query token vectors
    pub fn query_vectors(&self) -> &VectorSet {
        &self.query_vectors
    }

    /// Field holding candidate token vectors
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Similarity function
    pub fn similarity(&self) -> SimilarityKind {
        self.similarity
    }

    /// Blend weight
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Number of top candidates to rescore
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Query vector dimension, if there are any query vectors
    pub fn dimension(&self) -> Option<usize> {
        self.query_vectors.dimension()
    }
}

// ============================================================================
// RescoreConfigBuilder
// ============================================================================

/// Builder for [`RescoreConfig`]
///
/// Nothing is validated until [`RescoreConfigBuilder::build`].
#[derive(Debug, Clone)]
pub struct RescoreConfigBuilder {
    query_vectors: VectorSet,
    field: String,
    similarity: SimilarityKind,
    similarity_name: Option<String>,
    weight: f32,
    window_size: usize,
}

impl RescoreConfigBuilder {
    /// Create a builder with default similarity, weight and window size
    pub fn new(query_vectors: VectorSet, field: impl Into<String>) -> Self {
        RescoreConfigBuilder {
            query_vectors,
            field: field.into(),
            similarity: SimilarityKind::default(),
            similarity_name: None,
            weight: DEFAULT_WEIGHT,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }

    /// Create a builder from the text form
    ///
    /// Keys missing from `value` take their defaults from `settings`.
    pub fn from_json(value: &Value, settings: &RescoreSettings) -> RescoreResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| RescoreError::parse("an object", token_kind(value)))?;

        for key in obj.keys() {
            if ![QUERY_VECTORS_FIELD, FIELD_FIELD, SIMILARITY_FIELD, WEIGHT_FIELD]
                .contains(&key.as_str())
            {
                return Err(RescoreError::invalid_config(format!(
                    "unknown field '{}' in [{}]",
                    key, RESCORER_NAME
                )));
            }
        }

        let query_vectors = match obj.get(QUERY_VECTORS_FIELD) {
            Some(v) => parse_query_vectors(v)?,
            None => return Err(missing_field(QUERY_VECTORS_FIELD)),
        };
        let field = match obj.get(FIELD_FIELD) {
            Some(v) => expect_string(v, FIELD_FIELD)?.to_string(),
            None => return Err(missing_field(FIELD_FIELD)),
        };

        let mut builder = RescoreConfigBuilder::new(query_vectors, field)
            .with_similarity_name(&settings.similarity)
            .with_weight(settings.weight)
            .with_window_size(settings.window_size);

        if let Some(v) = obj.get(SIMILARITY_FIELD) {
            builder = builder.with_similarity_name(expect_string(v, SIMILARITY_FIELD)?);
        }
        if let Some(v) = obj.get(WEIGHT_FIELD) {
            builder = builder.with_weight(expect_number(v, WEIGHT_FIELD)?);
        }
        Ok(builder)
    }

    /// Set the similarity function
    pub fn with_similarity(mut self, similarity: SimilarityKind) -> Self {
        self.similarity = similarity;
        self.similarity_name = None;
        self
    }

    /// Set the similarity function by name, validated at build time
    pub fn with_similarity_name(mut self, name: &str) -> Self {
        self.similarity_name = Some(name.to_string());
        self
    }

    /// Set the blend weight
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Set the rescore window size
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Validate and build the config
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if `field` is empty, the query vectors are ragged or
    ///   contain an empty vector, the weight is not finite, or the window size
    ///   is zero or does not fit the wire form
    /// - `UnknownSimilarityKind` if a similarity name was not recognized
    pub fn build(self) -> RescoreResult<RescoreConfig> {
        if self.field.is_empty() {
            return Err(RescoreError::invalid_config(format!(
                "[{}] requires a non-empty '{}'",
                RESCORER_NAME, FIELD_FIELD
            )));
        }
        self.query_vectors.validate_rectangular()?;

        let similarity = match &self.similarity_name {
            Some(name) => name.parse::<SimilarityKind>()?,
            None => self.similarity,
        };

        if !self.weight.is_finite() {
            return Err(RescoreError::invalid_config(format!(
                "weight must be finite, got {}",
                self.weight
            )));
        }
        if !(0.0..=1.0).contains(&self.weight) {
            tracing::warn!(
                target: "strata::rescore",
                weight = self.weight,
                field = %self.field,
                "Blend weight outside [0, 1]; scores will be extrapolated"
            );
        }

        if self.window_size == 0 {
            return Err(RescoreError::invalid_config(
                "window_size must be a positive integer",
            ));
        }
        if u32::try_from(self.window_size).is_err() {
            return Err(RescoreError::invalid_config(format!(
                "window_size {} exceeds {}",
                self.window_size,
                u32::MAX
            )));
        }

        Ok(RescoreConfig {
            query_vectors: self.query_vectors,
            field: self.field,
            similarity,
            weight: self.weight,
            window_size: self.window_size,
        })
    }
}

// ============================================================================
// Text form parsing
// ============================================================================

/// Name of the JSON token kind, for structural parse errors
pub(crate) fn token_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn missing_field(name: &str) -> RescoreError {
    RescoreError::invalid_config(format!("[{}] requires '{}'", RESCORER_NAME, name))
}

fn expect_string<'a>(value: &'a Value, name: &str) -> RescoreResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| RescoreError::parse(format!("a string for '{}'", name), token_kind(value)))
}

pub(crate) fn expect_number(value: &Value, name: &str) -> RescoreResult<f32> {
    value
        .as_f64()
        .map(|x| x as f32)
        .ok_or_else(|| RescoreError::parse(format!("a number for '{}'", name), token_kind(value)))
}

fn parse_query_vectors(value: &Value) -> RescoreResult<VectorSet> {
    let arr = value
        .as_array()
        .ok_or_else(|| RescoreError::parse("an array of vectors", token_kind(value)))?;
    arr.iter().map(parse_vector).collect()
}

fn parse_vector(value: &Value) -> RescoreResult<Vec<f32>> {
    let arr = value
        .as_array()
        .ok_or_else(|| RescoreError::parse("an array for vector", token_kind(value)))?;
    arr.iter()
        .map(|x| {
            x.as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| RescoreError::parse("a number in vector", token_kind(x)))
        })
        .collect()
}
