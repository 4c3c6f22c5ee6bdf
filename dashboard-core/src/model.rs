use serde::{Deserialize, Serialize};

/// Normalized weather snapshot, one per fetch (or per forecast day).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub city: String,
    pub country: String,
    /// Provider-local ISO timestamp (`2024-05-01T14:15`) or date (`2024-05-01`).
    pub date: String,
    pub temperature: i64,
    pub feels_like: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_temp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temp: Option<i64>,
    pub condition: String,
    pub description: String,
    /// Relative humidity, percent.
    pub humidity: u8,
    /// km/h
    pub wind_speed: i64,
    /// Degrees, meteorological convention.
    pub wind_direction: u16,
    /// hPa, mean sea level.
    pub pressure: i64,
    /// km
    pub visibility: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Geocoder answer for a free-text city query.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub coordinates: Coordinates,
    pub country: String,
    pub city: String,
}

impl Place {
    /// A place with no name, used when the user asks for raw coordinates.
    pub fn unnamed(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            country: String::new(),
            city: String::new(),
        }
    }
}

/// What a dashboard was last asked to show.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coordinates(Coordinates),
}
