/*!
 * Application configuration handling.
 *
 * Configuration is read from a JSON file; every field has a default so a
 * missing file or a partial file still yields a working setup. The API key
 * falls back to the `ANTHROPIC_API_KEY` environment variable when the file
 * leaves it empty.
 */

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable consulted when the config file has no API key
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

// @struct: Config
// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Batching and concurrency settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// LLM provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Optional path to a JSON lexicon overriding the built-in phase terms
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,

    /// Log verbosity
    #[serde(default)]
    pub log_level: LogLevel,
}

// @struct: TranslationConfig
// Window planning and retry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Number of cues per translation window core
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Number of preceding cues carried into each window as context
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Maximum windows translated in parallel
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Retry attempts for transient provider failures
    #[serde(default = "default_retry_count")]
    pub retry_count: usize,

    /// Initial backoff between retries, doubled per attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

// @struct: ProviderConfig
// Anthropic API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// API endpoint base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key; empty means read from the environment
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Log verbosity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the `log` crate's level filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => anyhow::bail!("Unknown log level: {}", other),
        }
    }
}

fn default_batch_size() -> usize {
    35
}

fn default_overlap() -> usize {
    5
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_retry_count() -> usize {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.3
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            overlap: default_overlap(),
            concurrent_requests: default_concurrent_requests(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translation: TranslationConfig::default(),
            provider: ProviderConfig::default(),
            lexicon_path: None,
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from a file if it exists, otherwise return defaults
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the API key, consulting the environment as a fallback.
    /// Returns an empty string when neither source provides one.
    pub fn resolve_api_key(&self) -> String {
        if !self.provider.api_key.is_empty() {
            return self.provider.api_key.clone();
        }
        std::env::var(API_KEY_ENV).unwrap_or_default()
    }

    /// Validate configuration values, failing on anything the pipeline
    /// cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.translation.batch_size < 1 {
            anyhow::bail!("batch_size must be at least 1");
        }

        if self.translation.overlap >= self.translation.batch_size {
            anyhow::bail!(
                "overlap ({}) must be smaller than batch_size ({})",
                self.translation.overlap,
                self.translation.batch_size
            );
        }

        if self.translation.concurrent_requests < 1 {
            anyhow::bail!("concurrent_requests must be at least 1");
        }

        if self.provider.model.trim().is_empty() {
            anyhow::bail!("provider model must not be empty");
        }

        Url::parse(&self.provider.endpoint)
            .with_context(|| format!("Invalid provider endpoint: {}", self.provider.endpoint))?;

        if let Some(path) = &self.lexicon_path {
            if !path.exists() {
                anyhow::bail!("Lexicon file not found: {}", path.display());
            }
        }

        Ok(())
    }
}
