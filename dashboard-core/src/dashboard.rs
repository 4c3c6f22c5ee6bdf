//! Dashboard view state: the last result, the last error and the recent-city list.

use crate::{
    error::WeatherError,
    model::{Coordinates, Query, WeatherRecord},
    recent::RecentCities,
    service::WeatherService,
    storage::LocalStore,
};

/// Which parts of the view a request fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Current,
    CurrentAndForecast,
    ForecastOnly,
}

impl View {
    fn dashboard(with_forecast: bool) -> Self {
        if with_forecast { View::CurrentAndForecast } else { View::Current }
    }
}

#[derive(Debug)]
pub struct Dashboard {
    service: WeatherService,
    store: LocalStore,
    recent: RecentCities,
    current: Option<WeatherRecord>,
    forecast: Vec<WeatherRecord>,
    error: Option<String>,
    last_request: Option<(Query, View)>,
}

impl Dashboard {
    /// Recent cities are read from `store` once, here.
    pub fn new(service: WeatherService, store: LocalStore) -> Self {
        let recent = RecentCities::load(&store);
        Self {
            service,
            store,
            recent,
            current: None,
            forecast: Vec::new(),
            error: None,
            last_request: None,
        }
    }

    pub fn current(&self) -> Option<&WeatherRecord> {
        self.current.as_ref()
    }

    pub fn forecast(&self) -> &[WeatherRecord] {
        &self.forecast
    }

    /// User-visible message of the last failed request.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn recent(&self) -> &RecentCities {
        &self.recent
    }

    pub fn suggestions(&self, filter: &str) -> Vec<&str> {
        self.recent.matching(filter)
    }

    /// Current conditions then forecast for `city`. Returns `false` when the
    /// current-conditions request failed; a failed forecast only empties the forecast.
    pub async fn search(&mut self, city: &str, with_forecast: bool) -> bool {
        self.load(Query::City(city.trim().to_string()), View::dashboard(with_forecast))
            .await
    }

    pub async fn show_coordinates(&mut self, coordinates: Coordinates, with_forecast: bool) -> bool {
        self.load(Query::Coordinates(coordinates), View::dashboard(with_forecast))
            .await
    }

    /// Forecast alone for `city`. Its failure is the view's error; the city is not remembered.
    pub async fn show_forecast(&mut self, city: &str) -> bool {
        self.load(Query::City(city.trim().to_string()), View::ForecastOnly)
            .await
    }

    /// Re-issue the last request. `None` when nothing was asked yet.
    pub async fn retry(&mut self) -> Option<bool> {
        let (query, view) = self.last_request.clone()?;
        tracing::info!(?query, ?view, "retrying");
        Some(self.load(query, view).await)
    }

    async fn load(&mut self, query: Query, view: View) -> bool {
        self.error = None;
        self.current = None;
        self.forecast.clear();
        self.last_request = Some((query.clone(), view));

        let mut ok = true;

        if view != View::ForecastOnly {
            let result = match &query {
                Query::City(city) => self.service.current_weather(city).await,
                Query::Coordinates(c) => self.service.weather_at(*c).await,
            };
            match result {
                Ok(record) => {
                    self.current = Some(record);
                    if let Query::City(city) = &query {
                        self.remember(city);
                    }
                }
                Err(e) => {
                    self.fail(&e);
                    ok = false;
                }
            }
        }

        if view != View::Current {
            let result = match &query {
                Query::City(city) => self.service.forecast(city).await,
                Query::Coordinates(c) => self.service.forecast_at(*c).await,
            };
            match result {
                Ok(days) => self.forecast = days,
                Err(e) if view == View::ForecastOnly => {
                    self.fail(&e);
                    ok = false;
                }
                Err(e) => tracing::warn!(?query, error = %e, "forecast fetch failed"),
            }
        }

        ok
    }

    fn fail(&mut self, error: &WeatherError) {
        tracing::error!(error = %error, "weather fetch failed");
        self.error = Some(error.user_message());
    }

    fn remember(&mut self, city: &str) {
        self.recent.add(city);
        if let Err(e) = self.recent.save(&self.store) {
            tracing::warn!(error = %format!("{e:#}"), "failed to persist recent cities");
        }
    }
}
