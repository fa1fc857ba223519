// src/config.rs

//! Manages server configuration: loading, resolving paths, and validation.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the Prometheus metrics exporter.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MetricsConfig {
    /// If true, an HTTP server will be started to expose Prometheus metrics.
    #[serde(default)]
    pub enabled: bool,
    /// The port for the Prometheus metrics server.
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

fn default_metrics_port() -> u16 {
    10100
}

/// A raw representation of the config file before validation.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    assignments_path: Option<String>,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    read_timeout_secs: u64,
    #[serde(default)]
    metrics: MetricsConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    10000
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Represents the final, validated server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Root of the assignment repository. Resolved by `assignments_root`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignments_path: Option<String>,
    pub log_level: String,
    /// Seconds to wait for any single read from a client. `0` waits forever.
    pub read_timeout_secs: u64,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            assignments_path: None,
            log_level: default_log_level(),
            read_timeout_secs: 0,
            metrics: MetricsConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid config in '{path}'"))
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let raw_config: RawConfig =
            toml::from_str(contents).context("Failed to parse TOML configuration")?;

        let config = Config {
            host: raw_config.host,
            port: raw_config.port,
            assignments_path: raw_config.assignments_path,
            log_level: raw_config.log_level,
            read_timeout_secs: raw_config.read_timeout_secs,
            metrics: raw_config.metrics,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration to ensure logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("port cannot be 0"));
        }
        if self.host.trim().is_empty() {
            return Err(anyhow!("host cannot be empty"));
        }
        if let Some(path) = &self.assignments_path
            && path.trim().is_empty()
        {
            return Err(anyhow!("assignments_path cannot be empty"));
        }
        if self.metrics.enabled {
            if self.metrics.port == 0 {
                return Err(anyhow!("metrics.port cannot be 0"));
            }
            if self.metrics.port == self.port {
                return Err(anyhow!(
                    "metrics.port cannot be the same as the main server port"
                ));
            }
        }
        Ok(())
    }

    /// The per-read client timeout, or `None` to wait indefinitely.
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_secs > 0).then(|| Duration::from_secs(self.read_timeout_secs))
    }

    /// Resolves `assignments_path` to an absolute path of an existing directory.
    pub fn assignments_root(&self) -> Result<PathBuf> {
        let path = self
            .assignments_path
            .as_deref()
            .ok_or_else(|| anyhow!("no assignments path configured"))?;
        resolve_directory(Path::new(path.trim()))
    }
}

/// Makes `path` absolute and checks that it names a directory.
pub fn resolve_directory(path: &Path) -> Result<PathBuf> {
    let absolute = fs::canonicalize(path)
        .with_context(|| format!("Cannot resolve assignments path '{}'", path.display()))?;
    if !absolute.is_dir() {
        return Err(anyhow!(
            "assignments path '{}' is not a directory",
            absolute.display()
        ));
    }
    Ok(absolute)
}
