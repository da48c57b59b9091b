//! TOML configuration with defaults and environment overrides.

use crate::store::Scope;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CotConfig {
    pub scope: ScopeConfig,
    pub data: DataConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub district: String,
    pub period: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            district: "Default District".to_string(),
            period: "2024-25".to_string(),
        }
    }
}

/// Input CSV locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub records: PathBuf,
    pub rates: PathBuf,
    pub durations: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            records: PathBuf::from("training_records.csv"),
            rates: PathBuf::from("rate_reference.csv"),
            durations: PathBuf::from("duration_reference.csv"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub export_csv: PathBuf,
    pub summary_json: PathBuf,
    /// Rows shown in the console preview table.
    pub preview_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            export_csv: PathBuf::from("cost_of_training_export.csv"),
            summary_json: PathBuf::from("cost_of_training_summary.json"),
            preview_rows: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CotConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let mut config: CotConfig = toml::from_str(s)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or fall back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            let mut config = CotConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            return Ok(config);
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(district) = std::env::var("COT_DISTRICT") {
            self.scope.district = district;
        }
        if let Ok(period) = std::env::var("COT_PERIOD") {
            self.scope.period = period;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scope.district.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "scope.district must not be empty".to_string(),
            ));
        }
        if self.scope.period.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "scope.period must not be empty".to_string(),
            ));
        }
        if self.output.preview_rows == 0 {
            return Err(ConfigError::ValidationError(
                "output.preview_rows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn scope(&self) -> Scope {
        Scope::new(self.scope.district.clone(), self.scope.period.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output.preview_rows, 5);
        assert_eq!(config.data.rates, PathBuf::from("rate_reference.csv"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: CotConfig = toml::from_str(
            r#"
            [scope]
            district = "Nagpur"

            [output]
            preview_rows = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.scope.district, "Nagpur");
        assert_eq!(config.scope.period, "2024-25");
        assert_eq!(config.output.preview_rows, 3);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_preview_rows() {
        let mut config = CotConfig::default();
        config.output.preview_rows = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_bad_toml() {
        let parsed: Result<CotConfig, _> = toml::from_str("[scope\ndistrict=");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CotConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert!(!config.scope.district.is_empty());
    }

    #[test]
    fn test_scope_from_config() {
        let mut config = CotConfig::default();
        config.scope.district = "Satara".to_string();
        config.scope.period = "2023-24".to_string();
        assert_eq!(config.scope(), Scope::new("Satara", "2023-24"));
    }
}
