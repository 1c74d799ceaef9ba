//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `CLIMATE__` (e.g.
//! `CLIMATE__FETCH__API_KEY`).

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    DEFAULT_ENDPOINT_BASE, DEFAULT_LATITUDE_VAR, DEFAULT_LONGITUDE_VAR, DEFAULT_STORAGE_PATH,
    DEFAULT_TEMPERATURE_VAR, DEFAULT_TIMEOUT_SECS, DEFAULT_TIME_VAR,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub grid: GridVariables,
}

/// Everything the temperature fetch job needs, passed explicitly
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Falls back to the store's `api_key` setting when absent
    pub api_key: Option<String>,
    pub endpoint_base: String,
    pub storage_path: PathBuf,
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint_base: DEFAULT_ENDPOINT_BASE.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Variable names inside a grid file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridVariables {
    pub longitude: String,
    pub latitude: String,
    pub time: String,
    pub temperature: String,
}

impl Default for GridVariables {
    fn default() -> Self {
        Self {
            longitude: DEFAULT_LONGITUDE_VAR.to_string(),
            latitude: DEFAULT_LATITUDE_VAR.to_string(),
            time: DEFAULT_TIME_VAR.to_string(),
            temperature: DEFAULT_TEMPERATURE_VAR.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix("CLIMATE").separator("__"))
            .build()?
            .try_deserialize::<AppConfig>()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.fetch.endpoint_base.trim().is_empty() {
            return Err(ProcessingError::Config("fetch.endpoint_base is empty".to_string()));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ProcessingError::Config("fetch.timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.fetch.endpoint_base, DEFAULT_ENDPOINT_BASE);
        assert_eq!(config.grid.time, "date_number");
        assert!(config.fetch.api_key.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            "[fetch]\napi_key = \"abc\"\ntimeout_secs = 5\n\n[grid]\ntime = \"time\"\ntemperature = \"air\""
        )?;

        let config = AppConfig::load(Some(file.path()))?;
        assert_eq!(config.fetch.api_key.as_deref(), Some("abc"));
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.fetch.endpoint_base, DEFAULT_ENDPOINT_BASE);
        assert_eq!(config.grid.temperature, "air");
        assert_eq!(config.grid.latitude, "latitude");
        Ok(())
    }

    #[test]
    fn test_zero_timeout_rejected() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "[fetch]\ntimeout_secs = 0")?;
        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(ProcessingError::Config(_))
        ));
        Ok(())
    }
}
