//! Configuration management for the Plenum pipeline
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Data directory layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// Batch runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Network builder configuration
    #[serde(default)]
    pub builder: BuilderConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Directory holding legislator and authorship record files
    #[serde(default = "default_records_dir")]
    pub records_dir: PathBuf,

    /// Directory holding serialized graph artifacts
    #[serde(default = "default_graphs_dir")]
    pub graphs_dir: PathBuf,

    /// Directory receiving statistics tables and the run manifest
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// Maximum concurrently executing jobs
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Similarity algorithm identifiers to run per graph
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<String>,

    /// Categorical node features to analyze
    #[serde(default = "default_target_features")]
    pub target_features: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuilderConfig {
    /// First authorship year to build a network for
    #[serde(default = "default_first_year")]
    pub first_year: i32,

    /// Last authorship year to build a network for (inclusive)
    #[serde(default = "default_last_year")]
    pub last_year: i32,

    /// Legislator record file inside records_dir
    #[serde(default = "default_legislators_file")]
    pub legislators_file: String,

    /// Authorship record file inside records_dir
    #[serde(default = "default_authorships_file")]
    pub authorships_file: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_records_dir() -> PathBuf { PathBuf::from("data/records") }
fn default_graphs_dir() -> PathBuf { PathBuf::from("data/networks") }
fn default_output_dir() -> PathBuf { PathBuf::from("data/statistics") }
fn default_max_workers() -> usize { 8 }
fn default_algorithms() -> Vec<String> {
    vec![
        "weighted_adamic_adar".to_string(),
        "weighted_jaccard".to_string(),
        "jaccard".to_string(),
        "adamic_adar".to_string(),
    ]
}
fn default_target_features() -> Vec<String> {
    vec![
        "siglaPartido".to_string(),
        "siglaUf".to_string(),
        "education".to_string(),
        "gender".to_string(),
        "region".to_string(),
        "occupation".to_string(),
        "ethnicity".to_string(),
        "age_group".to_string(),
    ]
}
fn default_first_year() -> i32 { 2000 }
fn default_last_year() -> i32 { 2023 }
fn default_legislators_file() -> String { "congresspeople.json".to_string() }
fn default_authorships_file() -> String { "authorships.json".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_service_name() -> String { "plenum".to_string() }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("runner.max_workers", default_max_workers() as i64)?
            .set_default("observability.log_level", default_log_level())?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__RUNNER__MAX_WORKERS=4
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }

    /// Years covered by the builder, inclusive on both ends
    pub fn builder_years(&self) -> std::ops::RangeInclusive<i32> {
        self.builder.first_year..=self.builder.last_year
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            runner: RunnerConfig::default(),
            builder: BuilderConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            records_dir: default_records_dir(),
            graphs_dir: default_graphs_dir(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            algorithms: default_algorithms(),
            target_features: default_target_features(),
        }
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            first_year: default_first_year(),
            last_year: default_last_year(),
            legislators_file: default_legislators_file(),
            authorships_file: default_authorships_file(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            service_name: default_service_name(),
        }
    }
}
