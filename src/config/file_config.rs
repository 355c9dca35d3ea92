//! Configuration file support for biocite.
//!
//! The file is read through [`super::load_settings`]; this module writes it.
//!
//! # Configuration File Format
//!
//! ```toml
//! [pubmed]
//! api_key = "your-ncbi-api-key"
//! max_retries = 3
//! short_timeout_secs = 10
//! long_timeout_secs = 30
//! default_max_citations = 5
//! default_prioritize_reviews = false
//! default_max_age_years = 10
//!
//! [pubmed.retry]
//! base_delay_ms = 1000
//! rate_limit_floor_ms = 5000
//! max_jitter_ms = 1000
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::PubmedConfig;

/// Configuration file structure
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// PubMed section
    #[serde(default)]
    pub pubmed: PubmedConfig,

    /// Logging section
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `"json"` switches the subscriber to the JSON formatter
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

impl LoggingConfig {
    /// Whether JSON log output was requested
    pub fn is_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ConfigFile {
    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Default configuration for a new file, without the API key
    pub fn create_default() -> Self {
        let mut pubmed = PubmedConfig::default();
        pubmed.api_key = None;
        Self {
            pubmed,
            logging: LoggingConfig::default(),
        }
    }

    /// The PubMed section as an immutable runtime configuration
    pub fn pubmed_config(&self) -> PubmedConfig {
        self.pubmed.clone()
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
