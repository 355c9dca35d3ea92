//! Configuration management.

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError, LoggingConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default NCBI E-utilities base URL
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Environment variable holding the NCBI API key
pub const API_KEY_ENV: &str = "NCBI_API_KEY";

/// Prefix for environment overrides (e.g. `BIOCITE_PUBMED__MAX_RETRIES`)
pub const ENV_PREFIX: &str = "BIOCITE";

/// PubMed client and pipeline configuration.
///
/// Built once at startup and shared read-only between searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PubmedConfig {
    /// NCBI API key (optional, raises the rate limit)
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,

    /// E-utilities base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total HTTP attempts per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Timeout for lightweight calls (esummary)
    #[serde(default = "default_short_timeout")]
    pub short_timeout_secs: u64,

    /// Timeout for search and fetch calls
    #[serde(default = "default_long_timeout")]
    pub long_timeout_secs: u64,

    /// Citations returned when the caller does not say
    #[serde(default = "default_max_citations")]
    pub default_max_citations: usize,

    /// Restrict to reviews unless the caller says otherwise
    #[serde(default)]
    pub default_prioritize_reviews: bool,

    /// Default recency window in years
    #[serde(default = "default_max_age_years")]
    pub default_max_age_years: u32,

    /// Post-request delay with an API key (10 req/s ceiling)
    #[serde(default = "default_delay_with_key")]
    pub delay_with_key_ms: u64,

    /// Post-request delay without an API key (3 req/s ceiling)
    #[serde(default = "default_delay_without_key")]
    pub delay_without_key_ms: u64,

    /// Retry backoff settings
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for PubmedConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_base_url(),
            max_retries: default_max_retries(),
            short_timeout_secs: default_short_timeout(),
            long_timeout_secs: default_long_timeout(),
            default_max_citations: default_max_citations(),
            default_prioritize_reviews: false,
            default_max_age_years: default_max_age_years(),
            delay_with_key_ms: default_delay_with_key(),
            delay_without_key_ms: default_delay_without_key(),
            retry: RetrySettings::default(),
        }
    }
}

impl PubmedConfig {
    /// Timeout for lightweight calls
    pub fn short_timeout(&self) -> Duration {
        Duration::from_secs(self.short_timeout_secs)
    }

    /// Timeout for search and fetch calls
    pub fn long_timeout(&self) -> Duration {
        Duration::from_secs(self.long_timeout_secs)
    }

    /// Delay applied after every successful request
    pub fn request_delay(&self) -> Duration {
        if self.has_api_key() {
            Duration::from_millis(self.delay_with_key_ms)
        } else {
            Duration::from_millis(self.delay_without_key_ms)
        }
    }

    /// Whether a non-empty API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Copy with the API key masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.has_api_key() {
            copy.api_key = Some("********".to_string());
        }
        copy
    }
}

/// Backoff settings for retried requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Base delay, doubled per attempt
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,

    /// Minimum delay after a rate-limit response
    #[serde(default = "default_rate_limit_floor")]
    pub rate_limit_floor_ms: u64,

    /// Upper bound of the random jitter
    #[serde(default = "default_max_jitter")]
    pub max_jitter_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay(),
            rate_limit_floor_ms: default_rate_limit_floor(),
            max_jitter_ms: default_max_jitter(),
        }
    }
}

fn default_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_short_timeout() -> u64 {
    10
}

fn default_long_timeout() -> u64 {
    30
}

fn default_max_citations() -> usize {
    5
}

fn default_max_age_years() -> u32 {
    10
}

fn default_delay_with_key() -> u64 {
    100
}

fn default_delay_without_key() -> u64 {
    340
}

fn default_base_delay() -> u64 {
    1000
}

fn default_rate_limit_floor() -> u64 {
    5000
}

fn default_max_jitter() -> u64 {
    1000
}

/// Load the full settings (`[pubmed]` and `[logging]`) from an optional
/// file, with `BIOCITE_*` environment overrides such as
/// `BIOCITE_PUBMED__MAX_RETRIES`
pub fn load_settings(path: Option<&Path>) -> Result<ConfigFile, config::ConfigError> {
    build_settings(path, env_overrides())
}

fn env_overrides() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn build_settings(
    path: Option<&Path>,
    env: config::Environment,
) -> Result<ConfigFile, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    builder.add_source(env).build()?.try_deserialize()
}

/// Load the PubMed configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<PubmedConfig, config::ConfigError> {
    Ok(load_settings(Some(path))?.pubmed)
}

/// Get the PubMed configuration from environment variables and defaults
pub fn get_config() -> Result<PubmedConfig, config::ConfigError> {
    Ok(load_settings(None)?.pubmed)
}

/// Find a configuration file in the working directory or the platform
/// config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("biocite.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("biocite").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PubmedConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.short_timeout(), Duration::from_secs(10));
        assert_eq!(config.long_timeout(), Duration::from_secs(30));
        assert_eq!(config.default_max_citations, 5);
        assert_eq!(config.retry.rate_limit_floor_ms, 5000);
    }

    #[test]
    fn test_request_delay_depends_on_key() {
        let mut config = PubmedConfig::default();
        config.api_key = None;
        assert_eq!(config.request_delay(), Duration::from_millis(340));

        config.api_key = Some("abc".to_string());
        assert_eq!(config.request_delay(), Duration::from_millis(100));

        config.api_key = Some("  ".to_string());
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_redacted_hides_key() {
        let mut config = PubmedConfig::default();
        config.api_key = Some("secret-key".to_string());
        let shown = config.redacted();
        assert_eq!(shown.api_key.as_deref(), Some("********"));
        assert_eq!(config.api_key.as_deref(), Some("secret-key"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[pubmed]\nmax_retries = 5\nlong_timeout_secs = 60\n\n[pubmed.retry]\nbase_delay_ms = 10\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.long_timeout_secs, 60);
        assert_eq!(config.retry.base_delay_ms, 10);
        assert_eq!(config.retry.max_jitter_ms, 1000);
        assert_eq!(config.short_timeout_secs, 10);

        let settings = load_settings(Some(file.path())).unwrap();
        assert!(settings.logging.is_json());
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_env_override_uses_single_underscore_after_prefix() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[pubmed]\nmax_retries = 5\n\n[pubmed.retry]\nmax_jitter_ms = 50").unwrap();

        let mut vars = config::Map::new();
        vars.insert("BIOCITE_PUBMED__MAX_RETRIES".to_string(), "7".to_string());
        vars.insert("BIOCITE_PUBMED__RETRY__MAX_JITTER_MS".to_string(), "25".to_string());
        vars.insert("BIOCITE_LOGGING__LEVEL".to_string(), "debug".to_string());
        // Double underscore after the prefix is not the documented form
        vars.insert("BIOCITE__PUBMED__LONG_TIMEOUT_SECS".to_string(), "99".to_string());

        let settings =
            build_settings(Some(file.path()), env_overrides().source(Some(vars))).unwrap();
        assert_eq!(settings.pubmed.max_retries, 7);
        assert_eq!(settings.pubmed.retry.max_jitter_ms, 25);
        assert_eq!(settings.pubmed.retry.base_delay_ms, 1000);
        assert_eq!(settings.pubmed.long_timeout_secs, 30);
        assert_eq!(settings.logging.level, "debug");
    }
}
