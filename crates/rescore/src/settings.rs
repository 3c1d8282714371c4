//! Rescore defaults via `rescore.toml`
//!
//! Host requests may omit the window size, the blend weight and the
//! similarity name; these settings fill them in. On first start a commented
//! default `rescore.toml` is written; edit it and restart to change defaults.

use crate::config::{DEFAULT_WEIGHT, DEFAULT_WINDOW_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strata_core::{RescoreError, RescoreResult, SimilarityKind};

/// Settings file name placed in the host's config directory.
pub const SETTINGS_FILE_NAME: &str = "rescore.toml";

/// Rescore defaults loaded from `rescore.toml`.
///
/// # Example
///
/// ```toml
/// window_size = 10
/// weight = 1.0
/// similarity = "dot_product"
/// max_window_size = 10000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RescoreSettings {
    /// Window size used when a request does not specify one.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Blend weight used when a request does not specify one.
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// Similarity name used when a request does not specify one.
    #[serde(default = "default_similarity")]
    pub similarity: String,
    /// Largest window a request may ask for.
    #[serde(default = "default_max_window_size")]
    pub max_window_size: usize,
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_weight() -> f32 {
    DEFAULT_WEIGHT
}

fn default_similarity() -> String {
    SimilarityKind::default().name().to_string()
}

fn default_max_window_size() -> usize {
    10_000
}

impl Default for RescoreSettings {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            weight: default_weight(),
            similarity: default_similarity(),
            max_window_size: default_max_window_size(),
        }
    }
}

impl RescoreSettings {
    /// Parse the similarity string into a `SimilarityKind`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSimilarityKind` if the name is not recognized.
    pub fn similarity_kind(&self) -> RescoreResult<SimilarityKind> {
        self.similarity.parse()
    }

    /// Check that the settings describe a usable default.
    pub fn validate(&self) -> RescoreResult<()> {
        self.similarity_kind()?;
        if self.window_size == 0 {
            return Err(RescoreError::invalid_config(format!(
                "window_size in {} must be positive",
                SETTINGS_FILE_NAME
            )));
        }
        if self.window_size > self.max_window_size {
            return Err(RescoreError::invalid_config(format!(
                "window_size {} exceeds max_window_size {} in {}",
                self.window_size, self.max_window_size, SETTINGS_FILE_NAME
            )));
        }
        if !self.weight.is_finite() {
            return Err(RescoreError::invalid_config(format!(
                "weight in {} must be finite",
                SETTINGS_FILE_NAME
            )));
        }
        Ok(())
    }

    /// Returns the default settings file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Strata late-interaction rescoring defaults
#
# Number of top candidates rescored when a request omits window_size.
window_size = 10

# Blend weight when a request omits weight:
#   final = (1 - weight) * original + weight * maxsim
# 1.0 replaces the original score, 0.0 leaves it unchanged.
weight = 1.0

# Similarity when a request omits it: "dot_product" or "cosine".
similarity = "dot_product"

# Upper bound on window_size accepted from requests.
max_window_size = 10000
"#
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(content: &str) -> RescoreResult<Self> {
        let settings: RescoreSettings = toml::from_str(content).map_err(|e| {
            RescoreError::Serialization(format!("Failed to parse {}: {}", SETTINGS_FILE_NAME, e))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse settings from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> RescoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Write the default settings file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> RescoreResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Load `rescore.toml` from a directory, creating the default first if missing.
    pub fn load_or_create(dir: &Path) -> RescoreResult<Self> {
        let path = dir.join(SETTINGS_FILE_NAME);
        Self::write_default_if_missing(&path)?;
        let settings = Self::from_file(&path)?;
        tracing::debug!(
            target: "strata::rescore",
            path = %path.display(),
            window_size = settings.window_size,
            weight = settings.weight,
            similarity = %settings.similarity,
            "Loaded rescore settings"
        );
        Ok(settings)
    }

    /// Serialize these settings to TOML and write them to the given path.
    pub fn write_to_file(&self, path: &Path) -> RescoreResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            RescoreError::Serialization(format!("Failed to serialize settings: {}", e))
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
