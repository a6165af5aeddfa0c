use async_trait::async_trait;
use std::fmt::Debug;

use crate::model::WeatherResult;

pub mod openweather;

/// What to look up: a city by name, or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coordinates { latitude: f64, longitude: f64 },
}

impl std::fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherQuery::City(name) => write!(f, "city '{name}'"),
            WeatherQuery::Coordinates {
                latitude,
                longitude,
            } => write!(f, "coordinates {latitude:.4},{longitude:.4}"),
        }
    }
}

/// Failure modes of a single fetch. There is no retry anywhere; callers
/// decide what a missing result means.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent, or its body could not be read.
    #[error("weather request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered, but not with a success status.
    #[error("weather service returned status {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body did not match the expected schema.
    #[error("failed to decode weather response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current weather for `query`, authenticating with `api_key`.
    async fn current_weather(
        &self,
        query: &WeatherQuery,
        api_key: &str,
    ) -> Result<WeatherResult, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_display_names_the_city() {
        let query = WeatherQuery::City("New York".to_string());
        assert_eq!(query.to_string(), "city 'New York'");
    }

    #[test]
    fn query_display_rounds_coordinates() {
        let query = WeatherQuery::Coordinates {
            latitude: 50.450_123,
            longitude: 30.523_456,
        };
        assert_eq!(query.to_string(), "coordinates 50.4501,30.5235");
    }
}
