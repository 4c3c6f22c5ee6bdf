//! User preferences, persisted as a single JSON blob.

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::storage::{LocalStore, SETTINGS_KEY};

pub const DEFAULT_CITY: &str = "London";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    #[serde(alias = "metric")]
    Celsius,
    #[serde(alias = "imperial")]
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindUnit {
    #[default]
    Kmh,
    Mph,
    Ms,
}

impl WindUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            WindUnit::Kmh => "km/h",
            WindUnit::Mph => "mph",
            WindUnit::Ms => "m/s",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
}

macro_rules! str_enum {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self> {
                // Goes through serde so the stored aliases parse too.
                serde_json::from_value(serde_json::Value::String(s.to_lowercase())).map_err(|_| {
                    let allowed: Vec<&str> = $ty::ALL.iter().map(|v| v.as_str()).collect();
                    anyhow!("Unknown value '{s}'. Expected one of: {}", allowed.join(", "))
                })
            }
        }
    };
}

str_enum!(TemperatureUnit { Celsius => "celsius", Fahrenheit => "fahrenheit" });
str_enum!(WindUnit { Kmh => "kmh", Mph => "mph", Ms => "ms" });
str_enum!(Theme { Light => "light", Dark => "dark", Auto => "auto" });
str_enum!(Language { En => "en", Es => "es", Fr => "fr", De => "de" });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub default_city: String,
    pub temperature_unit: TemperatureUnit,
    pub wind_unit: WindUnit,
    pub theme: Theme,
    pub language: Language,
    pub notifications: bool,
    pub severe_weather_alerts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_city: DEFAULT_CITY.to_string(),
            temperature_unit: TemperatureUnit::default(),
            wind_unit: WindUnit::default(),
            theme: Theme::default(),
            language: Language::default(),
            notifications: true,
            severe_weather_alerts: true,
        }
    }
}

/// Field names accepted by [`Settings::set_field`], in display order.
pub const FIELDS: &[&str] = &[
    "defaultCity",
    "temperatureUnit",
    "windUnit",
    "theme",
    "language",
    "notifications",
    "severeWeatherAlerts",
];

impl Settings {
    /// Load stored settings. Fields missing from the blob keep their defaults,
    /// and a field whose stored value no longer parses is logged and skipped.
    /// A blob that is not a JSON object is replaced by defaults.
    pub fn load(store: &LocalStore) -> Self {
        match store.get::<serde_json::Value>(SETTINGS_KEY) {
            Ok(Some(serde_json::Value::Object(stored))) => Self::merged(stored),
            Ok(Some(_)) => {
                tracing::warn!("ignoring settings blob that is not an object");
                Self::default()
            }
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "ignoring unreadable settings");
                Self::default()
            }
        }
    }

    /// Overlay stored fields on the defaults one key at a time.
    fn merged(stored: serde_json::Map<String, serde_json::Value>) -> Self {
        let mut settings = Self::default();
        for (key, value) in stored {
            let mut candidate = match serde_json::to_value(&settings) {
                Ok(serde_json::Value::Object(fields)) => fields,
                _ => return settings,
            };
            candidate.insert(key.clone(), value);
            match serde_json::from_value(serde_json::Value::Object(candidate)) {
                Ok(next) => settings = next,
                Err(e) => tracing::warn!(key = %key, error = %e, "ignoring stored setting"),
            }
        }
        settings
    }

    pub fn save(&self, store: &LocalStore) -> Result<()> {
        store.set(SETTINGS_KEY, self)
    }

    /// Restore defaults and drop the stored blob.
    pub fn reset(&mut self, store: &LocalStore) -> Result<()> {
        *self = Self::default();
        store.remove(SETTINGS_KEY)
    }

    /// Update one field from its textual form. Keys accept camelCase or kebab-case.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<()> {
        let normalized: String = key.chars().filter(|c| *c != '-' && *c != '_').collect();
        match normalized.to_lowercase().as_str() {
            "defaultcity" => {
                let city = value.trim();
                if city.is_empty() {
                    bail!("Default city must not be empty");
                }
                self.default_city = city.to_string();
            }
            "temperatureunit" => self.temperature_unit = value.parse()?,
            "windunit" => self.wind_unit = value.parse()?,
            "theme" => self.theme = value.parse()?,
            "language" => self.language = value.parse()?,
            "notifications" => self.notifications = parse_flag(value)?,
            "severeweatheralerts" => self.severe_weather_alerts = parse_flag(value)?,
            _ => bail!("Unknown setting '{key}'. Known settings: {}", FIELDS.join(", ")),
        }
        Ok(())
    }

    /// `(field, value)` pairs for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (FIELDS[0], self.default_city.clone()),
            (FIELDS[1], self.temperature_unit.to_string()),
            (FIELDS[2], self.wind_unit.to_string()),
            (FIELDS[3], self.theme.to_string()),
            (FIELDS[4], self.language.to_string()),
            (FIELDS[5], self.notifications.to_string()),
            (FIELDS[6], self.severe_weather_alerts.to_string()),
        ]
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(anyhow!("Expected true/false, got '{value}'")),
    }
}
