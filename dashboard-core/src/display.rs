//! Presentation helpers: unit conversion, icons, advice text, colours, time.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::settings::{TemperatureUnit, WindUnit};

/// Celsius in, rounded value in the user's unit out. Missing input shows as 0.
pub fn convert_temperature(celsius: Option<f64>, unit: TemperatureUnit) -> i64 {
    let Some(c) = celsius else { return 0 };
    match unit {
        TemperatureUnit::Celsius => c.round() as i64,
        TemperatureUnit::Fahrenheit => (c * 9.0 / 5.0 + 32.0).round() as i64,
    }
}

/// km/h in, rounded value in the user's unit out.
pub fn convert_wind(kmh: f64, unit: WindUnit) -> i64 {
    match unit {
        WindUnit::Kmh => kmh.round() as i64,
        WindUnit::Mph => (kmh / 1.609_344).round() as i64,
        WindUnit::Ms => (kmh / 3.6).round() as i64,
    }
}

pub fn weather_icon(condition: &str) -> &'static str {
    let c = condition.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| c.contains(*w));

    if has(&["clear", "sunny"]) {
        "☀️"
    } else if has(&["cloud"]) {
        "☁️"
    } else if has(&["rain"]) {
        "🌧️"
    } else if has(&["snow"]) {
        "❄️"
    } else if has(&["storm", "thunder"]) {
        "⛈️"
    } else if has(&["fog", "mist"]) {
        "🌫️"
    } else {
        "🌤️"
    }
}

/// One line of advice keyed by exact condition label.
pub fn weather_advice(condition: &str) -> &'static str {
    match condition {
        "Clear" => "Perfect weather for outdoor activities",
        "Mainly Clear" => "Mostly clear skies with great visibility",
        "Partly Cloudy" => "Mix of sun and clouds",
        "Overcast" => "Cloudy skies with limited sunshine",
        "Fog" => "Drive carefully with reduced visibility",
        "Rain" => "Don't forget your umbrella",
        "Snow" => "Bundle up and stay warm",
        "Thunderstorm" => "Stay indoors and avoid outdoor activities",
        "Drizzle" => "Light rain, perfect for a cozy day",
        "Showers" => "Intermittent rain showers expected",
        _ => "Check local conditions for updates",
    }
}

pub const NEUTRAL_COLOR: &str = "#2c3e50";

/// Hex colour band for a temperature in Celsius.
pub fn temperature_color(celsius: f64) -> &'static str {
    if !celsius.is_finite() {
        NEUTRAL_COLOR
    } else if celsius < 0.0 {
        "#3498db"
    } else if celsius < 10.0 {
        "#5dade2"
    } else if celsius < 20.0 {
        "#58d68d"
    } else if celsius < 30.0 {
        "#f7dc6f"
    } else {
        "#e74c3c"
    }
}

/// `#rrggbb` → (r, g, b)
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeStyle {
    #[default]
    Short,
    Long,
}

fn parse_local(value: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// 12-hour clock, `02:05 PM` or `02:05:09 PM`. Unparseable input is returned as-is.
pub fn format_time(value: &str, style: TimeStyle) -> String {
    match parse_local(value) {
        Some(dt) => match style {
            TimeStyle::Short => dt.format("%I:%M %p").to_string(),
            TimeStyle::Long => dt.format("%I:%M:%S %p").to_string(),
        },
        None => value.to_string(),
    }
}

/// `Wed, May 1` for a forecast row.
pub fn format_day(value: &str) -> String {
    match parse_local(value) {
        Some(dt) => dt.format("%a, %b %-d").to_string(),
        None => value.to_string(),
    }
}

/// Sixteen-point compass name for a bearing in degrees.
pub fn compass_point(degrees: u16) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let idx = ((f64::from(degrees % 360) / 22.5).round() as usize) % POINTS.len();
    POINTS[idx]
}

/// Letters, whitespace, hyphens and apostrophes; at least two characters.
pub fn is_valid_city_name(city: &str) -> bool {
    city.chars().count() >= 2
        && city
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || c == '-' || c == '\'')
}
