use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{fetcher::FORECAST_ENDPOINT, model::ForecastRequest};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// endpoint = "https://api.open-meteo.com/v1/forecast"
/// timeout_secs = 10
///
/// [location]
/// latitude = 52.52
/// longitude = 13.41
/// timezone = "Europe/Berlin"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Location used when the CLI is not given coordinates.
    pub location: Option<ForecastRequest>,

    /// Forecast URL override; defaults to the public Open-Meteo endpoint.
    pub endpoint: Option<String>,

    /// Whole-request timeout for the HTTP client. No timeout when unset.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Return the configured default location as a request.
    pub fn default_request(&self) -> Result<ForecastRequest> {
        self.location.clone().ok_or_else(|| {
            anyhow!(
                "No default location configured.\n\
                 Hint: run `meteo configure` or pass --lat and --lon."
            )
        })
    }

    pub fn set_location(&mut self, location: ForecastRequest) {
        self.location = Some(location);
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(FORECAST_ENDPOINT)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "meteo", "meteo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.default_request().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No default location configured"));
        assert!(msg.contains("Hint: run `meteo configure`"));
    }

    #[test]
    fn set_location_becomes_default_request() {
        let mut cfg = Config::default();
        cfg.set_location(ForecastRequest::new(52.52, 13.41, "Europe/Berlin"));

        let req = cfg.default_request().expect("location must exist");
        assert_eq!(req, ForecastRequest::new(52.52, 13.41, "Europe/Berlin"));
    }

    #[test]
    fn defaults_without_overrides() {
        let cfg = Config::default();
        assert_eq!(cfg.endpoint(), FORECAST_ENDPOINT);
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn parses_toml_file_contents() {
        let cfg = Config::from_toml(
            r#"
            endpoint = "http://localhost:8080/v1/forecast"
            timeout_secs = 5

            [location]
            latitude = -33.87
            longitude = 151.21
            timezone = "auto"
            "#,
        )
        .expect("valid config");

        assert_eq!(cfg.endpoint(), "http://localhost:8080/v1/forecast");
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(cfg.default_request().unwrap().timezone, "auto");
    }

    #[test]
    fn toml_round_trip_keeps_location() {
        let mut cfg = Config::default();
        cfg.set_location(ForecastRequest::new(40.71, -74.01, "America/New_York"));

        let text = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(Config::from_toml("timeout_secs = \"soon\"").is_err());
    }
}
