//! Bootstrap configuration loading
//!
//! The TOML bootstrap file carries logging, supervision and device settings
//! plus an optional `[settings]` table in the same shape as the host record.
//!
//! # Config File Resolution Priority
//!
//! 1. Command-line argument (highest priority)
//! 2. `SOUNDALIGN_CONFIG` environment variable
//! 3. `<user config dir>/soundalign/config.toml`
//! 4. Compiled defaults (no file)
//!
//! A missing or unreadable file is never fatal: a warning is logged and the
//! compiled defaults are used.

use crate::settings::SoundAlignSettings;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the bootstrap file
pub const CONFIG_ENV_VAR: &str = "SOUNDALIGN_CONFIG";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Seconds between output worker liveness checks
    #[serde(default = "default_liveness_interval")]
    pub liveness_interval_secs: u64,

    /// Output device name (None = system default device)
    #[serde(default)]
    pub device: Option<String>,

    /// Tone settings, same keys as the host record
    #[serde(default)]
    pub settings: SoundAlignSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_liveness_interval() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            liveness_interval_secs: default_liveness_interval(),
            device: None,
            settings: SoundAlignSettings::default(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        config.settings = config.settings.sanitized();
        if config.liveness_interval_secs == 0 {
            warn!("liveness_interval_secs of 0 is not allowed, using default");
            config.liveness_interval_secs = default_liveness_interval();
        }
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration, degrading to compiled defaults on any problem
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("No config file found, using compiled defaults");
            return Self::default();
        };

        match Self::load(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{} - using compiled defaults", e);
                Self::default()
            }
        }
    }
}

/// Resolve which bootstrap file to read.
///
/// Returns `None` when no candidate exists, in which case compiled defaults apply.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument (returned even if missing so the
    // caller reports it)
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: user config directory
    default_config_path().filter(|path| path.exists())
}

/// `<user config dir>/soundalign/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("soundalign").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.liveness_interval_secs, 5);
        assert!(config.device.is_none());
        assert_eq!(config.settings, SoundAlignSettings::default());
    }

    #[test]
    fn test_settings_table_uses_record_keys() {
        let config = TomlConfig::from_toml_str(
            r#"
            liveness_interval_secs = 2
            device = "Speakers"

            [logging]
            level = "debug"

            [settings]
            minFrequency = 150
            fadeAlgorithm = "gaussian"
            progressDirection = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.liveness_interval_secs, 2);
        assert_eq!(config.device.as_deref(), Some("Speakers"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.settings.min_frequency, 150);
        assert_eq!(
            config.settings.fade_algorithm,
            crate::FadeAlgorithm::Gaussian
        );
        assert_eq!(
            config.settings.progress_direction,
            crate::Direction::RightToLeft
        );
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("liveness_interval_secs = \"soon\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_liveness_interval_falls_back() {
        let config = TomlConfig::from_toml_str("liveness_interval_secs = 0").unwrap();
        assert_eq!(config.liveness_interval_secs, 5);
    }
}
