use std::fmt;

use reqwest::StatusCode;

/// Which leg of the geocode-then-fetch chain failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    Coordinates,
    CurrentWeather,
    Forecast,
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FetchTarget::Coordinates => "coordinates",
            FetchTarget::CurrentWeather => "weather data",
            FetchTarget::Forecast => "forecast data",
        })
    }
}

/// The two error classes a user can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    FetchFailed,
}

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("City \"{0}\" not found")]
    CityNotFound(String),

    #[error("Failed to fetch {target}")]
    Transport {
        target: FetchTarget,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch {target}: provider returned {status}")]
    Status {
        target: FetchTarget,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to fetch {target}: malformed response")]
    Decode {
        target: FetchTarget,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to fetch coordinates: geocoder returned invalid coordinate '{0}'")]
    InvalidCoordinate(String),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::CityNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::FetchFailed,
        }
    }

    /// The plain message a dashboard shows next to its retry action.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::CityNotFound(city) => format!("City \"{city}\" not found"),
            WeatherError::Transport { target, .. }
            | WeatherError::Status { target, .. }
            | WeatherError::Decode { target, .. } => format!("Failed to fetch {target}"),
            WeatherError::InvalidCoordinate(_) => "Failed to fetch coordinates".to_string(),
        }
    }
}
