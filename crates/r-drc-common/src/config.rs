//! ---
//! drc_section: "01-core-functionality"
//! drc_subsection: "module"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "Shared primitives and utilities for the controller runtime."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use tracing::debug;

use crate::logging::LogFormat;

fn default_mode() -> Mode {
    Mode::Production
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

fn default_metrics_enabled() -> bool {
    true
}

/// Primary configuration object for the R-DRC control step.
///
/// The pool, notification, and service sections are mandatory: the step
/// refuses to run against implicit defaults for live infrastructure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrcConfig {
    #[serde(default = "default_mode")]
    pub mode: Mode,
    pub primary: PoolConfig,
    pub standby: PoolConfig,
    pub notification: NotificationConfig,
    #[serde(default)]
    pub services: ServiceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Metadata describing where a [`DrcConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedDrcConfig {
    pub config: DrcConfig,
    pub source: PathBuf,
}

impl DrcConfig {
    pub const ENV_CONFIG_PATH: &str = "R_DRC_CONFIG";

    /// Load configuration from disk, respecting the `R_DRC_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedDrcConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedDrcConfig {
                    config,
                    source: path,
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedDrcConfig {
                    config,
                    source: path,
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    fn from_path(path: PathBuf) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<DrcConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.primary.validate("primary")?;
        self.standby.validate("standby")?;
        if self.primary.name == self.standby.name && self.primary.region == self.standby.region {
            return Err(anyhow!(
                "primary and standby must reference distinct pools (both are '{}' in {})",
                self.primary.name,
                self.primary.region
            ));
        }
        if self.notification.channel.trim().is_empty() {
            return Err(anyhow!("notification channel must not be empty"));
        }
        if matches!(self.mode, Mode::Production) {
            self.services
                .validate(&self.primary.region, &self.standby.region)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for DrcConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: DrcConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Operating mode for the control step.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Production,
    Simulation,
}

impl Mode {
    pub fn is_simulation(&self) -> bool {
        matches!(self, Mode::Simulation)
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Mode::Production),
            "simulation" => Ok(Mode::Simulation),
            other => Err(format!("unknown mode: {}", other)),
        }
    }
}

/// A compute pool reference: opaque name plus the region it lives in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolConfig {
    pub name: String,
    pub region: String,
}

impl PoolConfig {
    fn validate(&self, section: &str) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(anyhow!("{} pool name must not be empty", section));
        }
        if self.region.trim().is_empty() {
            return Err(anyhow!("{} pool region must not be empty", section));
        }
        Ok(())
    }
}

/// Where failover and escalation notifications are published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub channel: String,
}

/// Endpoints for the production pool-manager and notification APIs.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Pool-manager base URL per region.
    #[serde(default)]
    pub pool_endpoints: IndexMap<String, String>,
    #[serde(default)]
    pub notify_endpoint: String,
    #[serde(default = "default_request_timeout")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub request_timeout: Duration,
}

impl ServiceConfig {
    fn validate(&self, primary_region: &str, standby_region: &str) -> Result<()> {
        for region in [primary_region, standby_region] {
            if !self.pool_endpoints.contains_key(region) {
                return Err(anyhow!(
                    "production mode requires a pool endpoint for region '{}'",
                    region
                ));
            }
        }
        if self.notify_endpoint.trim().is_empty() {
            return Err(anyhow!(
                "production mode requires a notification endpoint"
            ));
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            pool_endpoints: IndexMap::new(),
            notify_endpoint: String::new(),
            request_timeout: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    /// Optional node-exporter textfile the gathered metrics are written to
    /// when the step completes. One-shot invocations have nothing to scrape.
    #[serde(default)]
    pub textfile: Option<PathBuf>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            textfile: None,
        }
    }
}

/// Inputs consumed only when `mode = "simulation"`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimulationConfig {
    /// Lifecycle states reported for the simulated primary pool, using the
    /// wire spelling (e.g. `in-service`, `terminated`).
    #[serde(default)]
    pub primary_member_states: Vec<String>,
    /// Desired capacity the simulated standby pool starts with.
    #[serde(default)]
    pub standby_initial_capacity: u32,
    /// Make the simulated pool query fail, to exercise escalation.
    #[serde(default)]
    pub inject_query_failure: bool,
}
