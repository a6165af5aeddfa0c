use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::model::{WeatherCondition, WeatherResult};

use super::{FetchError, WeatherProvider, WeatherQuery};

const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Client for OpenWeatherMap's current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: Client,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
            base_url: OPENWEATHER_BASE_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn fetch_current(
        &self,
        query: &WeatherQuery,
        api_key: &str,
    ) -> Result<WeatherResult, FetchError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let mut params: Vec<(&str, String)> = match query {
            WeatherQuery::City(name) => vec![("q", name.clone())],
            WeatherQuery::Coordinates {
                latitude,
                longitude,
            } => vec![("lat", latitude.to_string()), ("lon", longitude.to_string())],
        };
        params.push(("appid", api_key.to_string()));
        params.push(("units", "metric".to_string()));

        let res = self
            .http
            .get(&url)
            .query(&params)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Http {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;

        Ok(parsed.into_result())
    }
}

impl Default for OpenWeatherClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
}

impl OwCurrentResponse {
    fn into_result(self) -> WeatherResult {
        WeatherResult {
            city_name: self.name,
            temperature_c: self.main.temp,
            conditions: self
                .weather
                .into_iter()
                .map(|w| WeatherCondition {
                    summary: w.main,
                    description: w.description,
                    icon: w.icon,
                })
                .collect(),
            observed_at: unix_to_utc(self.dt).unwrap_or_else(Utc::now),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(
        &self,
        query: &WeatherQuery,
        api_key: &str,
    ) -> Result<WeatherResult, FetchError> {
        self.fetch_current(query, api_key).await
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload(name: &str, temp: f64) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "dt": 1_700_000_000,
            "main": { "temp": temp },
            "weather": [
                { "main": "Clouds", "description": "scattered clouds", "icon": "03d" }
            ],
        })
    }

    #[tokio::test]
    async fn fetches_current_weather_by_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "London"))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload("London", 7.3)))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url(server.uri());
        let query = WeatherQuery::City("London".to_string());
        let result = client.current_weather(&query, "test-key").await.expect("result");

        assert_eq!(result.city_name, "London");
        assert_eq!(result.temperature_c, 7.3);
        assert_eq!(result.conditions.len(), 1);
        assert_eq!(result.conditions[0].summary, "Clouds");
        assert_eq!(result.conditions[0].icon, "03d");
        assert_eq!(result.observed_at.timestamp(), 1_700_000_000);
    }

    #[tokio::test]
    async fn fetches_current_weather_by_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "50.4501"))
            .and(query_param("lon", "30.5234"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload("Kyiv", -3.0)))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url(server.uri());
        let query = WeatherQuery::Coordinates {
            latitude: 50.4501,
            longitude: 30.5234,
        };
        let result = client.current_weather(&query, "test-key").await.expect("result");

        assert_eq!(result.city_name, "Kyiv");
        assert_eq!(result.temperature_c, -3.0);
    }

    #[tokio::test]
    async fn extra_payload_fields_are_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "London",
                "dt": 1_700_000_000,
                "main": { "temp": 7.3, "feels_like": 5.1, "humidity": 81 },
                "weather": [
                    { "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }
                ],
                "wind": { "speed": 4.6 },
                "cod": 200,
            })))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url(server.uri());
        let query = WeatherQuery::City("London".to_string());
        let result = client.current_weather(&query, "test-key").await.expect("result");

        assert_eq!(result.conditions[0].description, "broken clouds");
    }

    #[tokio::test]
    async fn non_success_status_is_an_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string("{\"cod\":\"404\",\"message\":\"city not found\"}"),
            )
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url(server.uri());
        let query = WeatherQuery::City("Nowhere".to_string());
        let err = client.current_weather(&query, "test-key").await.unwrap_err();

        match err {
            FetchError::Http { status, body } => {
                assert_eq!(status.as_u16(), 404);
                assert!(body.contains("city not found"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url(server.uri());
        let query = WeatherQuery::City("London".to_string());
        let err = client.current_weather(&query, "test-key").await.unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        // Nothing listens on port 1.
        let client = OpenWeatherClient::with_base_url("http://127.0.0.1:1");
        let query = WeatherQuery::City("London".to_string());
        let err = client.current_weather(&query, "test-key").await.unwrap_err();

        assert!(matches!(err, FetchError::Network(_)));
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);

        assert!(truncated.len() < long.len());
        assert!(truncated.ends_with("..."));
    }
}
