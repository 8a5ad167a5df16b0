//! Configuration management for grainview.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::export::DEFAULT_DATE_FORMAT;
use crate::view::{SortDirection, SortKey, ViewParams, DEFAULT_PAGE_SIZE};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "grainview";

/// Default dataset file name.
const SAMPLES_FILE_NAME: &str = "samples.json";

/// Default local store file name.
const DATABASE_FILE_NAME: &str = "local.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GRAINVIEW_`, sections split by `__`)
/// 2. TOML config file at `~/.config/grainview/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset configuration.
    pub data: DataConfig,
    /// Table view configuration.
    pub view: ViewConfig,
    /// Local store configuration.
    pub storage: StorageConfig,
    /// Export configuration.
    pub export: ExportConfig,
}

/// Dataset locations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the samples JSON file.
    /// Defaults to `~/.local/share/grainview/samples.json`
    pub samples_path: Option<PathBuf>,
    /// Optional device list JSON file.
    pub devices_path: Option<PathBuf>,
}

/// Table view defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Rows per page.
    pub page_size: usize,
    /// Initial sort field.
    pub sort_key: SortKey,
    /// Initial sort direction.
    pub sort_direction: SortDirection,
}

/// Local store configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the local store database.
    /// Defaults to `~/.local/share/grainview/local.db`
    pub database_path: Option<PathBuf>,
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory exports are written to.
    pub output_dir: PathBuf,
    /// `chrono` format of the CSV date column.
    pub date_format: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sort_key: SortKey::Timestamp,
            sort_direction: SortDirection::Descending,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("GRAINVIEW_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.view.page_size == 0 {
            return Err(Error::ConfigValidation {
                message: "page_size must be greater than 0".to_string(),
            });
        }

        if self.export.date_format.is_empty()
            || StrftimeItems::new(&self.export.date_format).any(|item| item == Item::Error)
        {
            return Err(Error::ConfigValidation {
                message: format!("invalid date_format: {:?}", self.export.date_format),
            });
        }

        Ok(())
    }

    /// Get the samples path, resolving defaults if not set.
    #[must_use]
    pub fn samples_path(&self) -> PathBuf {
        self.data
            .samples_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(SAMPLES_FILE_NAME))
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Initial view parameters for a new table session.
    #[must_use]
    pub fn initial_view(&self) -> ViewParams {
        ViewParams {
            sort_key: self.view.sort_key,
            direction: self.view.sort_direction,
            ..ViewParams::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.view.page_size, 8);
        assert_eq!(config.view.sort_key, SortKey::Timestamp);
        assert_eq!(config.view.sort_direction, SortDirection::Descending);
        assert_eq!(config.export.date_format, "%-m/%-d/%Y");
        assert_eq!(config.export.output_dir, PathBuf::from("."));
        assert!(config.data.samples_path.is_none());
        assert!(config.data.devices_path.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_page_size() {
        let mut config = Config::default();
        config.view.page_size = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("page_size"));
    }

    #[test]
    fn test_validate_bad_date_format() {
        let mut config = Config::default();
        config.export.date_format = "%Q".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("date_format"));

        config.export.date_format = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_samples_path_default() {
        let config = Config::default();
        assert!(config.samples_path().to_string_lossy().contains("samples.json"));
    }

    #[test]
    fn test_samples_path_custom() {
        let mut config = Config::default();
        config.data.samples_path = Some(PathBuf::from("/srv/public/samples.json"));
        assert_eq!(config.samples_path(), PathBuf::from("/srv/public/samples.json"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();
        assert!(path.to_string_lossy().contains("grainview"));
        assert!(path.to_string_lossy().contains("local.db"));
    }

    #[test]
    fn test_initial_view_uses_configured_sort() {
        let mut config = Config::default();
        config.view.sort_key = SortKey::GrainSize;
        config.view.sort_direction = SortDirection::Ascending;

        let params = config.initial_view();
        assert_eq!(params.sort_key, SortKey::GrainSize);
        assert_eq!(params.direction, SortDirection::Ascending);
        assert_eq!(params.page, 1);
        assert!(params.query.is_empty());
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("grainview"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_toml_file() {
        let path = std::env::temp_dir().join(format!("grainview_config_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
[data]
samples_path = "/srv/samples.json"

[view]
page_size = 20
sort_key = "location"
sort_direction = "asc"

[export]
date_format = "%Y-%m-%d"
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.view.page_size, 20);
        assert_eq!(config.view.sort_key, SortKey::Location);
        assert_eq!(config.view.sort_direction, SortDirection::Ascending);
        assert_eq!(config.samples_path(), PathBuf::from("/srv/samples.json"));
        assert_eq!(config.export.date_format, "%Y-%m-%d");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let path = std::env::temp_dir().join(format!("grainview_badcfg_{}.toml", std::process::id()));
        std::fs::write(&path, "[view]\npage_size = 0\n").unwrap();

        let err = Config::load_from(Some(path.clone())).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_view_config_deserialize() {
        let json = r#"{"page_size": 12, "sort_key": "humidity"}"#;
        let view: ViewConfig = serde_json::from_str(json).unwrap();
        assert_eq!(view.page_size, 12);
        assert_eq!(view.sort_key, SortKey::Humidity);
        assert_eq!(view.sort_direction, SortDirection::Descending);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("page_size"));
        assert!(json.contains("date_format"));
    }
}
