use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const DEFAULT_GEOCODING_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_USER_AGENT: &str = concat!("weather-dashboard/", env!("CARGO_PKG_VERSION"));

/// Application configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// geocoding_url = "https://nominatim.openstreetmap.org/search"
/// weather_url = "https://api.open-meteo.com/v1/forecast"
/// user_agent = "weather-dashboard/0.1.0 (me@example.com)"
/// data_dir = "/home/me/.local/share/weather"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geocoding_url: String,
    pub weather_url: String,
    /// Nominatim rejects requests without an identifying agent.
    pub user_agent: String,
    /// Where settings and recent cities live; platform data dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
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

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory holding the persisted settings and recent-city blobs.
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.data_dir().to_path_buf()),
        }
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-dashboard", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::from_toml("").expect("empty config must parse");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.weather_url, DEFAULT_WEATHER_URL);
    }

    #[test]
    fn partial_file_backfills_missing_fields() {
        let cfg = Config::from_toml(
            r#"
            weather_url = "http://localhost:9000/v1/forecast"
            data_dir = "/tmp/weather"
            "#,
        )
        .expect("partial config must parse");

        assert_eq!(cfg.weather_url, "http://localhost:9000/v1/forecast");
        assert_eq!(cfg.geocoding_url, DEFAULT_GEOCODING_URL);
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(
            cfg.resolved_data_dir().expect("explicit dir"),
            PathBuf::from("/tmp/weather")
        );
    }

    #[test]
    fn malformed_file_errors() {
        assert!(Config::from_toml("weather_url = [").is_err());
    }

    #[test]
    fn serializes_without_unset_data_dir() {
        let toml = toml::to_string_pretty(&Config::default()).expect("serializes");
        assert!(toml.contains("geocoding_url"));
        assert!(!toml.contains("data_dir"));
    }
}
