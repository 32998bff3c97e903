use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_VERSION: u32 = 1;

/// Shortest accepted poll period.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported config version {0}")]
    UnsupportedVersion(u32),
    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("stale_after_ms must be greater than zero")]
    ZeroStaleAfter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable one-liners.
    Text,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MonitorConfigInput {
    pub version: u32,
    pub log_filter: Option<String>,
    pub monitor: PollingConfigInput,
    pub output: OutputConfigInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PollingConfigInput {
    pub poll_interval_ms: Option<u64>,
    pub stale_after_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfigInput {
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingConfig {
    /// Re-evaluation period in `watch` mode.
    pub poll_interval: Duration,
    /// Cell info older than this is treated as absent.
    pub stale_after: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            stale_after: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub version: u32,
    pub log_filter: String,
    pub polling: PollingConfig,
    pub format: OutputFormat,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_filter: "info".to_string(),
            polling: PollingConfig::default(),
            format: OutputFormat::default(),
        }
    }
}

impl MonitorConfigInput {
    pub fn resolve(self) -> Result<MonitorConfig, ConfigError> {
        let version = if self.version == 0 {
            CONFIG_VERSION
        } else {
            self.version
        };
        if version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(version));
        }

        let defaults = PollingConfig::default();
        let poll_interval = self
            .monitor
            .poll_interval_ms
            .map_or(defaults.poll_interval, Duration::from_millis)
            .max(MIN_POLL_INTERVAL);
        let stale_after = self
            .monitor
            .stale_after_ms
            .map_or(defaults.stale_after, Duration::from_millis);
        if stale_after.is_zero() {
            return Err(ConfigError::ZeroStaleAfter);
        }

        let log_filter = self
            .log_filter
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| MonitorConfig::default().log_filter);

        Ok(MonitorConfig {
            version,
            log_filter,
            polling: PollingConfig {
                poll_interval,
                stale_after,
            },
            format: self.output.format.unwrap_or_default(),
        })
    }
}

impl MonitorConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        if input.trim().is_empty() {
            return Ok(MonitorConfig::default());
        }
        let parsed: MonitorConfigInput = toml::from_str(input)?;
        parsed.resolve()
    }
}
