use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::{
    error::{FetchTarget, WeatherError},
    model::{Place, WeatherRecord},
};

pub mod open_meteo;

pub use open_meteo::OpenMeteoProvider;

/// Number of days a forecast covers.
pub const FORECAST_DAYS: u8 = 5;

/// Source of normalized weather for an already-resolved place.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, place: &Place) -> Result<WeatherRecord, WeatherError>;

    /// One record per day, [`FORECAST_DAYS`] days starting today.
    async fn daily_forecast(&self, place: &Place) -> Result<Vec<WeatherRecord>, WeatherError>;
}

/// Send `request` and decode a JSON body, tagging failures with `target`.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    target: FetchTarget,
) -> Result<T, WeatherError> {
    let res = request
        .send()
        .await
        .map_err(|source| WeatherError::Transport { target, source })?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|source| WeatherError::Transport { target, source })?;

    if !status.is_success() {
        tracing::warn!(%target, %status, body = %truncate_body(&body), "request failed");
        return Err(WeatherError::Status {
            target,
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|source| {
        tracing::warn!(%target, error = %source, "unexpected response shape");
        WeatherError::Decode { target, source }
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        let long = "é".repeat(250);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
