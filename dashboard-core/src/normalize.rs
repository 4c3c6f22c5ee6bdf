//! Mapping of Open-Meteo (WMO) weather codes and units into display values.
//!
//! Everything here is total: unmapped codes degrade to a fallback label.

pub const UNKNOWN_CONDITION: &str = "Unknown";
pub const UNKNOWN_DESCRIPTION: &str = "Unknown weather condition";

/// (code, label, description)
const WEATHER_CODES: &[(i32, &str, &str)] = &[
    (0, "Clear", "Clear sky"),
    (1, "Mainly Clear", "Mainly clear sky"),
    (2, "Partly Cloudy", "Partly cloudy"),
    (3, "Overcast", "Overcast"),
    (45, "Fog", "Foggy conditions"),
    (48, "Depositing Rime Fog", "Rime fog"),
    (51, "Light Drizzle", "Light drizzle"),
    (53, "Moderate Drizzle", "Moderate drizzle"),
    (55, "Dense Drizzle", "Dense drizzle"),
    (56, "Light Freezing Drizzle", "Light freezing drizzle"),
    (57, "Dense Freezing Drizzle", "Dense freezing drizzle"),
    (61, "Slight Rain", "Slight rain"),
    (63, "Moderate Rain", "Moderate rain"),
    (65, "Heavy Rain", "Heavy rain"),
    (66, "Light Freezing Rain", "Light freezing rain"),
    (67, "Heavy Freezing Rain", "Heavy freezing rain"),
    (71, "Slight Snow Fall", "Slight snow fall"),
    (73, "Moderate Snow Fall", "Moderate snow fall"),
    (75, "Heavy Snow Fall", "Heavy snow fall"),
    (77, "Snow Grains", "Snow grains"),
    (80, "Slight Rain Showers", "Slight rain showers"),
    (81, "Moderate Rain Showers", "Moderate rain showers"),
    (82, "Violent Rain Showers", "Violent rain showers"),
    (85, "Slight Snow Showers", "Slight snow showers"),
    (86, "Heavy Snow Showers", "Heavy snow showers"),
    (95, "Thunderstorm", "Thunderstorm"),
    (96, "Thunderstorm with Slight Hail", "Thunderstorm with slight hail"),
    (99, "Thunderstorm with Heavy Hail", "Thunderstorm with heavy hail"),
];

fn lookup(code: i32) -> Option<&'static (i32, &'static str, &'static str)> {
    WEATHER_CODES.iter().find(|(c, _, _)| *c == code)
}

/// Short condition label, e.g. "Slight Rain".
pub fn condition_label(code: i32) -> &'static str {
    lookup(code).map_or(UNKNOWN_CONDITION, |(_, label, _)| label)
}

/// Longer sentence-case description, e.g. "Slight rain".
pub fn condition_description(code: i32) -> &'static str {
    lookup(code).map_or(UNKNOWN_DESCRIPTION, |(_, _, description)| description)
}

/// Codes with an entry in the lookup tables.
pub fn known_codes() -> impl Iterator<Item = i32> {
    WEATHER_CODES.iter().map(|(c, _, _)| *c)
}

pub fn round_temp(celsius: f64) -> i64 {
    celsius.round() as i64
}

/// m/s → km/h
pub fn wind_kmh(mps: f64) -> i64 {
    (mps * 3.6).round() as i64
}

/// m → km
pub fn visibility_km(meters: f64) -> i64 {
    (meters / 1000.0).round() as i64
}

pub fn round_pressure(hpa: f64) -> i64 {
    hpa.round() as i64
}

pub fn humidity_pct(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

pub fn wind_direction(degrees: f64) -> u16 {
    (degrees.round() as i64).rem_euclid(360) as u16
}
