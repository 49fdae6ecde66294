//! ---
//! tg_section: "01-core-functionality"
//! tg_subsection: "module"
//! tg_type: "source"
//! tg_scope: "code"
//! tg_description: "Shared primitives and utilities for the telegen runtime."
//! tg_version: "v0.1.0"
//! tg_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::LogFormat;

fn default_rate_hz() -> f64 {
    20.0
}

fn default_channel() -> String {
    "deviceState".to_owned()
}

fn default_field() -> String {
    "batteryTempC".to_owned()
}

fn default_initial_temp_c() -> f64 {
    30.0
}

fn default_min_temp_c() -> f64 {
    20.0
}

fn default_max_temp_c() -> f64 {
    60.0
}

fn default_random_seed() -> u64 {
    0x7E1Eu64
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

/// Primary configuration object for the telegen runtime.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub signal: SignalConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "TELEGEN_CONFIG";

    /// Load configuration from disk, respecting the `TELEGEN_CONFIG` override.
    ///
    /// Unlike most daemons telegen is expected to run happily with zero
    /// configuration files present, so a missing candidate list yields the
    /// built-in defaults rather than an error.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the effective source path, if any.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        debug!("no configuration file found; using built-in defaults");
        Ok(LoadedAppConfig {
            config: AppConfig::default(),
            source: None,
        })
    }

    fn from_path(path: PathBuf) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants. Bad rates or bounds abort startup
    /// before the publish loop is entered.
    pub fn validate(&self) -> Result<()> {
        self.signal.validate()?;
        self.publish.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Parameters of the simulated signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Seed value for the battery temperature walk, in degrees Celsius.
    #[serde(default = "default_initial_temp_c")]
    pub initial_temp_c: f64,
    /// Hard lower clamp for the walk.
    #[serde(default = "default_min_temp_c")]
    pub min_temp_c: f64,
    /// Hard upper clamp for the walk.
    #[serde(default = "default_max_temp_c")]
    pub max_temp_c: f64,
    /// Seed for the drift sampler, making runs reproducible.
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            initial_temp_c: default_initial_temp_c(),
            min_temp_c: default_min_temp_c(),
            max_temp_c: default_max_temp_c(),
            random_seed: default_random_seed(),
        }
    }
}

impl SignalConfig {
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("initial_temp_c", self.initial_temp_c),
            ("min_temp_c", self.min_temp_c),
            ("max_temp_c", self.max_temp_c),
        ] {
            if !value.is_finite() {
                return Err(anyhow!("signal.{} must be a finite number", label));
            }
        }
        if self.min_temp_c >= self.max_temp_c {
            return Err(anyhow!(
                "signal.min_temp_c ({}) must be below signal.max_temp_c ({})",
                self.min_temp_c,
                self.max_temp_c
            ));
        }
        Ok(())
    }
}

/// Parameters of the publish cadence and the channel naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Ticks per second driven by the scheduler.
    #[serde(default = "default_rate_hz")]
    pub rate_hz: f64,
    /// Bus channel the frames are published on.
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Payload field name carrying the scalar reading.
    #[serde(default = "default_field")]
    pub field: String,
    /// Sink implementation the daemon wires up.
    #[serde(default)]
    pub sink: SinkKind,
    /// Stop after this many ticks; unset means run until shutdown.
    #[serde(default)]
    pub max_ticks: Option<u64>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            rate_hz: default_rate_hz(),
            channel: default_channel(),
            field: default_field(),
            sink: SinkKind::default(),
            max_ticks: None,
        }
    }
}

impl PublishConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.rate_hz.is_finite() && self.rate_hz > 0.0) {
            return Err(anyhow!(
                "publish.rate_hz must be a positive finite number, got {}",
                self.rate_hz
            ));
        }
        if self.channel.trim().is_empty() {
            return Err(anyhow!("publish.channel must not be empty"));
        }
        if self.field.trim().is_empty() {
            return Err(anyhow!("publish.field must not be empty"));
        }
        if let Some(0) = self.max_ticks {
            return Err(anyhow!("publish.max_ticks must be at least 1 when set"));
        }
        Ok(())
    }
}

/// Sink implementations the daemon can wire up without code changes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// Structured-log each frame; the default, mirroring a dry-run publisher.
    #[default]
    Tracing,
    /// Queue frames in process memory; used by tests and embedding hosts.
    InMemory,
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_publisher() {
        let config = AppConfig::default();
        assert_eq!(config.publish.rate_hz, 20.0);
        assert_eq!(config.publish.channel, "deviceState");
        assert_eq!(config.publish.field, "batteryTempC");
        assert_eq!(config.signal.initial_temp_c, 30.0);
        assert_eq!(config.signal.min_temp_c, 20.0);
        assert_eq!(config.signal.max_temp_c, 60.0);
        config.validate().expect("defaults must validate");
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: AppConfig = r#"
            [publish]
            rate_hz = 5.0
            channel = "bench/deviceState"
        "#
        .parse()
        .expect("valid partial config");
        assert_eq!(config.publish.rate_hz, 5.0);
        assert_eq!(config.publish.channel, "bench/deviceState");
        assert_eq!(config.publish.field, "batteryTempC");
        assert_eq!(config.signal.max_temp_c, 60.0);
    }

    #[test]
    fn rejects_non_positive_rate() {
        let err = "[publish]\nrate_hz = 0.0\n"
            .parse::<AppConfig>()
            .expect_err("zero rate must fail");
        assert!(err.to_string().contains("rate_hz"));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = "[signal]\nmin_temp_c = 70.0\n"
            .parse::<AppConfig>()
            .expect_err("inverted bounds must fail");
        assert!(err.to_string().contains("min_temp_c"));
    }

    #[test]
    fn missing_candidates_fall_back_to_defaults() {
        let loaded = AppConfig::load_with_source(&["does/not/exist.toml"])
            .expect("defaults when nothing found");
        assert!(loaded.source.is_none());
        assert_eq!(loaded.config.publish.rate_hz, 20.0);
    }

    #[test]
    fn loads_first_existing_candidate() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[publish]\nrate_hz = 50.0").expect("write config");
        let loaded = AppConfig::load_with_source(&[file.path()]).expect("load temp config");
        assert_eq!(loaded.source.as_deref(), Some(file.path()));
        assert_eq!(loaded.config.publish.rate_hz, 50.0);
    }
}
