use crate::model::WeatherResult;
use crate::provider::{FetchError, WeatherProvider, WeatherQuery};

/// Thin adapter between the view model and a weather provider.
///
/// Exists so the view model never sees provider construction or query
/// encoding; it forwards one call per intent and nothing else.
#[derive(Debug)]
pub struct WeatherRepository {
    provider: Box<dyn WeatherProvider>,
}

impl WeatherRepository {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub async fn current_by_city(
        &self,
        city: &str,
        api_key: &str,
    ) -> Result<WeatherResult, FetchError> {
        let query = WeatherQuery::City(city.to_string());
        tracing::debug!("requesting current weather for {query}");
        self.provider.current_weather(&query, api_key).await
    }

    pub async fn current_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        api_key: &str,
    ) -> Result<WeatherResult, FetchError> {
        let query = WeatherQuery::Coordinates {
            latitude,
            longitude,
        };
        tracing::debug!("requesting current weather for {query}");
        self.provider.current_weather(&query, api_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeatherCondition;
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::sync::{Arc, Mutex};

    /// Provider double that records every query it sees. Clones share the
    /// recording, so a test can keep a handle after boxing one up.
    #[derive(Debug, Default, Clone)]
    struct RecordingProvider {
        queries: Arc<Mutex<Vec<(WeatherQuery, String)>>>,
    }

    fn sample_result(city: &str) -> WeatherResult {
        WeatherResult {
            city_name: city.to_string(),
            temperature_c: 11.0,
            conditions: vec![WeatherCondition {
                summary: "Clear".to_string(),
                description: "clear sky".to_string(),
                icon: "01d".to_string(),
            }],
            observed_at: DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp"),
        }
    }

    #[async_trait]
    impl WeatherProvider for RecordingProvider {
        async fn current_weather(
            &self,
            query: &WeatherQuery,
            api_key: &str,
        ) -> Result<WeatherResult, FetchError> {
            self.queries
                .lock()
                .expect("lock")
                .push((query.clone(), api_key.to_string()));
            Ok(sample_result("London"))
        }
    }

    #[tokio::test]
    async fn by_city_passes_the_name_through() {
        let provider = RecordingProvider::default();
        let repository = WeatherRepository::new(Box::new(provider.clone()));

        let result = repository.current_by_city("London", "key").await.expect("result");

        assert_eq!(result.city_name, "London");
        let seen = provider.queries.lock().expect("lock");
        assert_eq!(
            *seen,
            vec![(WeatherQuery::City("London".to_string()), "key".to_string())]
        );
    }

    #[tokio::test]
    async fn by_coordinates_passes_the_pair_through() {
        let provider = RecordingProvider::default();
        let repository = WeatherRepository::new(Box::new(provider.clone()));

        repository
            .current_by_coordinates(50.4501, 30.5234, "key-b")
            .await
            .expect("coordinate result");

        let seen = provider.queries.lock().expect("lock");
        assert_eq!(
            *seen,
            vec![(
                WeatherQuery::Coordinates {
                    latitude: 50.4501,
                    longitude: 30.5234,
                },
                "key-b".to_string()
            )]
        );
    }
}
