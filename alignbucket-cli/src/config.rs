//! Configuration handling for alignbucket
//!
//! Supports loading configuration from alignbucket.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "alignbucket.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub partition: PartitionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Minimum sequence length to consider
    #[serde(default = "default_start")]
    pub start: usize,

    /// Coverage percentage in 1..=100
    #[serde(default = "default_delta")]
    pub delta: u32,

    /// Candidate spans at least this long are evaluated on the thread pool
    #[serde(default = "default_min_parallel_span")]
    pub min_parallel_span: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving every output file
    #[serde(default = "default_outdir")]
    pub outdir: PathBuf,

    /// Per-sequence bucket assignments
    #[serde(default = "default_buckets_file")]
    pub buckets_file: String,

    /// Optimizer trace written in verbose mode
    #[serde(default = "default_trace_file")]
    pub trace_file: String,

    /// JSON run summary
    #[serde(default = "default_summary_file")]
    pub summary_file: String,
}

// Default value functions
fn default_start() -> usize { 1 }
fn default_delta() -> u32 { 90 }
fn default_min_parallel_span() -> usize { 2048 }
fn default_outdir() -> PathBuf { PathBuf::from(".") }
fn default_buckets_file() -> String { "buckets.list".to_string() }
fn default_trace_file() -> String { "matrix.csv".to_string() }
fn default_summary_file() -> String { "summary.json".to_string() }

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            delta: default_delta(),
            min_parallel_span: default_min_parallel_span(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            outdir: default_outdir(),
            buckets_file: default_buckets_file(),
            trace_file: default_trace_file(),
            summary_file: default_summary_file(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = Self::to_toml(self)?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        Self::to_toml(&Self::default())
    }

    fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    pub fn buckets_path(&self, outdir: &Path) -> PathBuf {
        outdir.join(&self.output.buckets_file)
    }

    pub fn trace_path(&self, outdir: &Path) -> PathBuf {
        outdir.join(&self.output.trace_file)
    }

    pub fn summary_path(&self, outdir: &Path) -> PathBuf {
        outdir.join(&self.output.summary_file)
    }
}
