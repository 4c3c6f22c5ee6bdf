use std::fmt;

use dashboard_core::{
    Settings, WeatherRecord,
    display::{
        TimeStyle, compass_point, convert_temperature, convert_wind, format_day, format_time,
        hex_to_rgb, temperature_color, weather_advice, weather_icon,
    },
};

/// How to paint the output.
#[derive(Debug, Clone, Copy)]
pub struct Style<'a> {
    pub settings: &'a Settings,
    pub color: bool,
}

impl Style<'_> {
    fn temp(&self, celsius: i64) -> String {
        let unit = self.settings.temperature_unit;
        let text = format!("{}{}", convert_temperature(Some(celsius as f64), unit), unit.symbol());
        self.paint(&text, temperature_color(celsius as f64))
    }

    fn wind(&self, kmh: i64) -> String {
        let unit = self.settings.wind_unit;
        format!("{} {}", convert_wind(kmh as f64, unit), unit.symbol())
    }

    fn paint(&self, text: &str, hex: &str) -> String {
        match (self.color, hex_to_rgb(hex)) {
            (true, Some((r, g, b))) => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    }
}

fn place_label(record: &WeatherRecord) -> String {
    match (record.city.is_empty(), record.country.is_empty()) {
        (true, _) => "Current location".to_string(),
        (false, true) => record.city.clone(),
        (false, false) => format!("{}, {}", record.city, record.country),
    }
}

/// Current conditions block.
pub fn current<'a>(record: &'a WeatherRecord, style: Style<'a>) -> Current<'a> {
    Current { record, style }
}

/// One row per forecast day; nothing at all for an empty forecast.
pub fn forecast<'a>(days: &'a [WeatherRecord], style: Style<'a>) -> Forecast<'a> {
    Forecast { days, style }
}

pub struct Current<'a> {
    record: &'a WeatherRecord,
    style: Style<'a>,
}

impl fmt::Display for Current<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (record, style) = (self.record, self.style);

        writeln!(
            f,
            "{}  {}  ·  {}",
            weather_icon(&record.condition),
            place_label(record),
            format_time(&record.date, TimeStyle::Short),
        )?;
        writeln!(
            f,
            "    {}  {} (feels like {})",
            style.temp(record.temperature),
            record.condition,
            style.temp(record.feels_like),
        )?;
        writeln!(f, "    {}. {}", record.description, weather_advice(&record.condition))?;

        let mut details = vec![
            format!("Humidity {}%", record.humidity),
            format!(
                "Wind {} {}",
                style.wind(record.wind_speed),
                compass_point(record.wind_direction)
            ),
            format!("Pressure {} hPa", record.pressure),
            format!("Visibility {} km", record.visibility),
        ];
        if let Some(uv) = record.uv_index {
            details.push(format!("UV {uv:.1}"));
        }
        writeln!(f, "    {}", details.join("   "))
    }
}

pub struct Forecast<'a> {
    days: &'a [WeatherRecord],
    style: Style<'a>,
}

impl fmt::Display for Forecast<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (days, style) = (self.days, self.style);
        if days.is_empty() {
            return Ok(());
        }

        writeln!(f, "{}-day forecast", days.len())?;
        for day in days {
            let range = match (day.max_temp, day.min_temp) {
                (Some(hi), Some(lo)) => format!("{} / {}", style.temp(hi), style.temp(lo)),
                _ => style.temp(day.temperature),
            };
            write!(
                f,
                "  {:<12} {}  {:<28} {}  wind {}",
                format_day(&day.date),
                weather_icon(&day.condition),
                day.condition,
                range,
                style.wind(day.wind_speed),
            )?;
            if let (Some(rise), Some(set)) = (&day.sunrise, &day.sunset) {
                write!(
                    f,
                    "  sun {}–{}",
                    format_time(rise, TimeStyle::Short),
                    format_time(set, TimeStyle::Short)
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::settings::{TemperatureUnit, WindUnit};

    fn record() -> WeatherRecord {
        WeatherRecord {
            city: "Oslo".into(),
            country: "Norge".into(),
            date: "2024-05-01T14:15".into(),
            temperature: 13,
            feels_like: 10,
            min_temp: None,
            max_temp: None,
            condition: "Slight Rain".into(),
            description: "Slight rain".into(),
            humidity: 71,
            wind_speed: 36,
            wind_direction: 225,
            pressure: 1008,
            visibility: 24,
            uv_index: Some(2.4),
            sunrise: None,
            sunset: None,
        }
    }

    #[test]
    fn current_in_default_units() {
        let settings = Settings::default();
        let text = current(&record(), Style { settings: &settings, color: false }).to_string();

        assert!(text.contains("🌧️  Oslo, Norge  ·  02:15 PM"));
        assert!(text.contains("13°C  Slight Rain (feels like 10°C)"));
        assert!(text.contains("Wind 36 km/h SW"));
        assert!(text.contains("UV 2.4"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn current_in_imperial_units_with_colour() {
        let settings = Settings {
            temperature_unit: TemperatureUnit::Fahrenheit,
            wind_unit: WindUnit::Ms,
            ..Settings::default()
        };
        let text = current(&record(), Style { settings: &settings, color: true }).to_string();

        assert!(text.contains("55°F"));
        assert!(text.contains("Wind 10 m/s"));
        assert!(text.contains("\x1b[38;2;88;214;141m"));
    }

    #[test]
    fn forecast_rows() {
        let settings = Settings::default();
        let day = WeatherRecord {
            date: "2024-05-01".into(),
            min_temp: Some(6),
            max_temp: Some(15),
            sunrise: Some("2024-05-01T05:12".into()),
            sunset: Some("2024-05-01T21:23".into()),
            ..record()
        };
        let text = forecast(&[day], Style { settings: &settings, color: false }).to_string();

        assert!(text.starts_with("1-day forecast"));
        assert!(text.contains("Wed, May 1"));
        assert!(text.contains("15°C / 6°C"));
        assert!(text.contains("sun 05:12 AM–09:23 PM"));
        assert!(forecast(&[], Style { settings: &settings, color: false }).to_string().is_empty());
    }

    #[test]
    fn unnamed_place() {
        let settings = Settings::default();
        let r = WeatherRecord { city: String::new(), country: String::new(), ..record() };
        assert!(
            current(&r, Style { settings: &settings, color: false })
                .to_string()
                .contains("Current location")
        );
    }
}
