//! Geocode-then-fetch chain. Every call re-resolves the city; nothing is cached.

use reqwest::Client;

use crate::{
    Config,
    error::WeatherError,
    geocode::Geocoder,
    model::{Coordinates, Place, WeatherRecord},
    provider::{OpenMeteoProvider, WeatherProvider},
};

#[derive(Debug)]
pub struct WeatherService {
    geocoder: Geocoder,
    provider: Box<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(geocoder: Geocoder, provider: Box<dyn WeatherProvider>) -> Self {
        Self { geocoder, provider }
    }

    /// Nominatim + Open-Meteo at the endpoints named in `config`.
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        let http = Client::builder().user_agent(config.user_agent.clone()).build()?;

        Ok(Self::new(
            Geocoder::new(http.clone(), config.geocoding_url.clone()),
            Box::new(OpenMeteoProvider::new(http, config.weather_url.clone())),
        ))
    }

    pub async fn current_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        let place = self.geocoder.locate(city).await?;
        self.provider.current(&place).await
    }

    pub async fn forecast(&self, city: &str) -> Result<Vec<WeatherRecord>, WeatherError> {
        let place = self.geocoder.locate(city).await?;
        self.provider.daily_forecast(&place).await
    }

    /// Current conditions at raw coordinates; city and country stay empty.
    pub async fn weather_at(&self, coordinates: Coordinates) -> Result<WeatherRecord, WeatherError> {
        self.provider.current(&Place::unnamed(coordinates)).await
    }

    /// Daily forecast at raw coordinates; city and country stay empty.
    pub async fn forecast_at(
        &self,
        coordinates: Coordinates,
    ) -> Result<Vec<WeatherRecord>, WeatherError> {
        self.provider.daily_forecast(&Place::unnamed(coordinates)).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub(crate) fn config_for(server: &MockServer) -> Config {
        Config {
            geocoding_url: format!("{}/search", server.uri()),
            weather_url: format!("{}/v1/forecast", server.uri()),
            ..Config::default()
        }
    }

    pub(crate) async fn mount_city(server: &MockServer, city: &str, lat: &str, lon: &str) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", city))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "lat": lat, "lon": lon, "address": { "city": city, "country": "Testland" } }
            ])))
            .mount(server)
            .await;
    }

    pub(crate) async fn mount_current(server: &MockServer, lat: &str, temperature: f64) {
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", lat))
            .and(query_param("current", crate::provider::open_meteo::CURRENT_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "current": {
                    "time": "2024-05-01T14:15",
                    "temperature_2m": temperature,
                    "relative_humidity_2m": 60,
                    "apparent_temperature": temperature - 1.0,
                    "weather_code": 2,
                    "pressure_msl": 1015.0,
                    "wind_speed_10m": 3.0,
                    "wind_direction_10m": 90,
                    "visibility": 10000.0,
                    "uv_index": 1.0
                }
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn geocodes_then_fetches_current() {
        let mock_server = MockServer::start().await;
        mount_city(&mock_server, "Lyon", "45.75", "4.85").await;
        mount_current(&mock_server, "45.75", 18.4).await;

        let service = WeatherService::from_config(&config_for(&mock_server)).unwrap();
        let record = service.current_weather("Lyon").await.unwrap();

        assert_eq!(record.city, "Lyon");
        assert_eq!(record.country, "Testland");
        assert_eq!(record.temperature, 18);
        assert_eq!(record.condition, "Partly Cloudy");
        assert_eq!(record.wind_speed, 11);
        assert_eq!(record.visibility, 10);
    }

    #[tokio::test]
    async fn unknown_city_yields_not_found_and_no_weather_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&mock_server)
            .await;

        let service = WeatherService::from_config(&config_for(&mock_server)).unwrap();
        let err = service.current_weather("London").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = service.forecast("London").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn every_call_re_resolves_the_city() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "lat": "45.75", "lon": "4.85", "address": { "city": "Lyon" } }
            ])))
            .expect(2)
            .mount(&mock_server)
            .await;
        mount_current(&mock_server, "45.75", 18.4).await;

        let service = WeatherService::from_config(&config_for(&mock_server)).unwrap();
        service.current_weather("Lyon").await.unwrap();
        service.current_weather("Lyon").await.unwrap();
    }

    #[tokio::test]
    async fn coordinates_skip_geocoding() {
        let mock_server = MockServer::start().await;
        mount_current(&mock_server, "45.75", 21.0).await;

        let service = WeatherService::from_config(&config_for(&mock_server)).unwrap();
        let record = service
            .weather_at(Coordinates { latitude: 45.75, longitude: 4.85 })
            .await
            .unwrap();

        assert_eq!(record.city, "");
        assert_eq!(record.country, "");
        assert_eq!(record.temperature, 21);
    }
}
