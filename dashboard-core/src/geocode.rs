//! City name → coordinates via Nominatim (OpenStreetMap), no API key required.

use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{FetchTarget, WeatherError},
    model::{Coordinates, Place},
    provider::fetch_json,
};

#[derive(Debug, Clone)]
pub struct Geocoder {
    http: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    address: NominatimAddress,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
}

impl Geocoder {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }

    /// Resolve `city` to its best match. Zero matches is [`WeatherError::CityNotFound`].
    pub async fn locate(&self, city: &str) -> Result<Place, WeatherError> {
        let results: Vec<NominatimResult> = fetch_json(
            self.http.get(&self.url).query(&[
                ("q", city),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ]),
            FetchTarget::Coordinates,
        )
        .await?;

        let Some(first) = results.into_iter().next() else {
            tracing::info!(city, "geocoder returned no matches");
            return Err(WeatherError::CityNotFound(city.to_string()));
        };

        let place = Place {
            coordinates: Coordinates {
                latitude: parse_coordinate(&first.lat)?,
                longitude: parse_coordinate(&first.lon)?,
            },
            country: first.address.country.unwrap_or_default(),
            city: first
                .address
                .city
                .or(first.address.town)
                .or(first.address.village)
                .unwrap_or_else(|| city.to_string()),
        };

        tracing::debug!(
            query = city,
            resolved = %place.city,
            lat = place.coordinates.latitude,
            lon = place.coordinates.longitude,
            "geocoded"
        );
        Ok(place)
    }
}

fn parse_coordinate(raw: &str) -> Result<f64, WeatherError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| WeatherError::InvalidCoordinate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn geocoder(server: &MockServer) -> Geocoder {
        Geocoder::new(Client::new(), format!("{}/search", server.uri()))
    }

    #[tokio::test]
    async fn resolves_first_match() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Paris"))
            .and(query_param("format", "json"))
            .and(query_param("limit", "1"))
            .and(query_param("addressdetails", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "lat": "48.8588897",
                    "lon": "2.3200410",
                    "display_name": "Paris, Île-de-France, France",
                    "address": { "city": "Paris", "country": "France", "country_code": "fr" }
                }
            ])))
            .mount(&mock_server)
            .await;

        let place = geocoder(&mock_server).locate("Paris").await.unwrap();

        assert_eq!(place.city, "Paris");
        assert_eq!(place.country, "France");
        assert!((place.coordinates.latitude - 48.8588897).abs() < 1e-9);
        assert!((place.coordinates.longitude - 2.320041).abs() < 1e-9);
    }

    #[tokio::test]
    async fn falls_back_through_town_village_and_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("q", "Hallstatt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "lat": "47.56", "lon": "13.64", "address": { "village": "Hallstatt", "country": "Österreich" } }
            ])))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(query_param("q", "Nowhere Special"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "lat": "1.0", "lon": "2.0" }
            ])))
            .mount(&mock_server)
            .await;

        let g = geocoder(&mock_server);

        let village = g.locate("Hallstatt").await.unwrap();
        assert_eq!(village.city, "Hallstatt");
        assert_eq!(village.country, "Österreich");

        let bare = g.locate("Nowhere Special").await.unwrap();
        assert_eq!(bare.city, "Nowhere Special");
        assert_eq!(bare.country, "");
    }

    #[tokio::test]
    async fn zero_results_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let err = geocoder(&mock_server).locate("London").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.user_message(), "City \"London\" not found");
    }

    #[tokio::test]
    async fn server_error_is_fetch_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&mock_server)
            .await;

        let err = geocoder(&mock_server).locate("London").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FetchFailed);
        assert!(matches!(err, WeatherError::Status { target: FetchTarget::Coordinates, .. }));
    }

    #[tokio::test]
    async fn garbage_coordinates_are_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "lat": "north", "lon": "2.0", "address": {} }
            ])))
            .mount(&mock_server)
            .await;

        let err = geocoder(&mock_server).locate("Paris").await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidCoordinate(ref v) if v == "north"));
        assert_eq!(err.kind(), ErrorKind::FetchFailed);
    }
}
