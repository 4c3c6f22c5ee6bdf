use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{FetchTarget, WeatherError},
    model::{Place, WeatherRecord},
    normalize::{
        condition_description, condition_label, humidity_pct, round_pressure, round_temp,
        visibility_km, wind_direction, wind_kmh,
    },
};

use super::{FORECAST_DAYS, WeatherProvider, fetch_json};

pub(crate) const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
weather_code,pressure_msl,wind_speed_10m,wind_direction_10m,visibility,uv_index";

pub(crate) const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
apparent_temperature_max,apparent_temperature_min,wind_speed_10m_max,\
wind_direction_10m_dominant,uv_index_max,sunrise,sunset";

/// Open-Meteo forecast API, no API key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    url: String,
}

impl OpenMeteoProvider {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }

    fn base_query(place: &Place) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", place.coordinates.latitude.to_string()),
            ("longitude", place.coordinates.longitude.to_string()),
            ("timezone", "auto".to_string()),
            // Wind in m/s; normalization converts to km/h.
            ("wind_speed_unit", "ms".to_string()),
        ]
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn current(&self, place: &Place) -> Result<WeatherRecord, WeatherError> {
        let mut query = Self::base_query(place);
        query.push(("current", CURRENT_FIELDS.to_string()));

        let parsed: OmCurrentResponse = fetch_json(
            self.http.get(&self.url).query(&query),
            FetchTarget::CurrentWeather,
        )
        .await?;

        Ok(normalize_current(parsed.current, place))
    }

    async fn daily_forecast(&self, place: &Place) -> Result<Vec<WeatherRecord>, WeatherError> {
        let mut query = Self::base_query(place);
        query.push(("daily", DAILY_FIELDS.to_string()));
        query.push(("forecast_days", FORECAST_DAYS.to_string()));

        let parsed: OmForecastResponse = fetch_json(
            self.http.get(&self.url).query(&query),
            FetchTarget::Forecast,
        )
        .await?;

        Ok(normalize_daily(parsed.daily, place))
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrentResponse {
    current: OmCurrent,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: String,
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: f64,
    weather_code: i32,
    pressure_msl: f64,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
    #[serde(default)]
    visibility: Option<f64>,
    #[serde(default)]
    uv_index: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    daily: OmDaily,
}

/// Column-oriented daily series; any cell may be null.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OmDaily {
    time: Vec<String>,
    weather_code: Vec<Option<i32>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    apparent_temperature_max: Vec<Option<f64>>,
    apparent_temperature_min: Vec<Option<f64>>,
    wind_speed_10m_max: Vec<Option<f64>>,
    wind_direction_10m_dominant: Vec<Option<f64>>,
    uv_index_max: Vec<Option<f64>>,
    sunrise: Vec<Option<String>>,
    sunset: Vec<Option<String>>,
}

fn cell<T: Clone>(column: &[Option<T>], idx: usize) -> Option<T> {
    column.get(idx).cloned().flatten()
}

fn normalize_current(current: OmCurrent, place: &Place) -> WeatherRecord {
    WeatherRecord {
        city: place.city.clone(),
        country: place.country.clone(),
        date: current.time,
        temperature: round_temp(current.temperature_2m),
        feels_like: round_temp(current.apparent_temperature),
        min_temp: None,
        max_temp: None,
        condition: condition_label(current.weather_code).to_string(),
        description: condition_description(current.weather_code).to_string(),
        humidity: humidity_pct(current.relative_humidity_2m),
        wind_speed: wind_kmh(current.wind_speed_10m),
        wind_direction: wind_direction(current.wind_direction_10m),
        pressure: round_pressure(current.pressure_msl),
        visibility: current.visibility.map_or(0, visibility_km),
        uv_index: current.uv_index,
        sunrise: None,
        sunset: None,
    }
}

/// Days without both temperature extremes are skipped. Humidity, pressure and
/// visibility are not part of the daily series and stay zero.
fn normalize_daily(daily: OmDaily, place: &Place) -> Vec<WeatherRecord> {
    daily
        .time
        .iter()
        .enumerate()
        .filter_map(|(i, date)| {
            let (Some(max), Some(min)) = (
                cell(&daily.temperature_2m_max, i),
                cell(&daily.temperature_2m_min, i),
            ) else {
                tracing::warn!(%date, "forecast day without temperatures, skipping");
                return None;
            };

            let feels_like = match (
                cell(&daily.apparent_temperature_max, i),
                cell(&daily.apparent_temperature_min, i),
            ) {
                (Some(hi), Some(lo)) => (hi + lo) / 2.0,
                _ => (max + min) / 2.0,
            };
            let code = cell(&daily.weather_code, i).unwrap_or(-1);

            Some(WeatherRecord {
                city: place.city.clone(),
                country: place.country.clone(),
                date: date.clone(),
                temperature: round_temp((max + min) / 2.0),
                feels_like: round_temp(feels_like),
                min_temp: Some(round_temp(min)),
                max_temp: Some(round_temp(max)),
                condition: condition_label(code).to_string(),
                description: condition_description(code).to_string(),
                humidity: 0,
                wind_speed: cell(&daily.wind_speed_10m_max, i).map_or(0, wind_kmh),
                wind_direction: cell(&daily.wind_direction_10m_dominant, i).map_or(0, wind_direction),
                pressure: 0,
                visibility: 0,
                uv_index: cell(&daily.uv_index_max, i),
                sunrise: cell(&daily.sunrise, i),
                sunset: cell(&daily.sunset, i),
            })
        })
        .collect()
}
