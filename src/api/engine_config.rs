use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_THEME, InferenceSettings, MissingValuePolicy, ThemeCatalog};
use crate::error::{ChartError, ChartResult};
use crate::store::{MetadataSync, RemoteMirrorConfig};

/// Host-level tuning for inference, compilation and persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_sample_size")]
    pub inference_sample_size: usize,
    #[serde(default = "default_numeric_ratio_threshold")]
    pub numeric_ratio_threshold: f64,
    #[serde(default)]
    pub missing_values: MissingValuePolicy,
    #[serde(default)]
    pub metadata_sync: MetadataSync,
    #[serde(default = "default_theme")]
    pub default_theme: String,
    #[serde(default)]
    pub remote: Option<RemoteMirrorConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inference_sample_size: default_sample_size(),
            numeric_ratio_threshold: default_numeric_ratio_threshold(),
            missing_values: MissingValuePolicy::default(),
            metadata_sync: MetadataSync::default(),
            default_theme: default_theme(),
            remote: None,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn inference(&self) -> InferenceSettings {
        InferenceSettings {
            sample_size: self.inference_sample_size,
            numeric_ratio_threshold: self.numeric_ratio_threshold,
        }
    }

    /// Sets how unparseable cells enter numeric series.
    #[must_use]
    pub fn with_missing_values(mut self, policy: MissingValuePolicy) -> Self {
        self.missing_values = policy;
        self
    }

    /// Sets whether updates refresh the gallery entry.
    #[must_use]
    pub fn with_metadata_sync(mut self, sync: MetadataSync) -> Self {
        self.metadata_sync = sync;
        self
    }

    #[must_use]
    pub fn with_default_theme(mut self, theme: impl Into<String>) -> Self {
        self.default_theme = theme.into();
        self
    }

    #[must_use]
    pub fn with_remote(mut self, remote: RemoteMirrorConfig) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn validate(self, themes: &ThemeCatalog) -> ChartResult<Self> {
        self.inference().validate()?;
        themes.require(&self.default_theme)?;
        if let Some(remote) = &self.remote {
            if remote.endpoint.trim().is_empty() {
                return Err(ChartError::InvalidData(
                    "remote mirror endpoint must not be empty".to_owned(),
                ));
            }
        }
        Ok(self)
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_sample_size() -> usize {
    InferenceSettings::default().sample_size
}

fn default_numeric_ratio_threshold() -> f64 {
    InferenceSettings::default().numeric_ratio_threshold
}

fn default_theme() -> String {
    DEFAULT_THEME.to_owned()
}
