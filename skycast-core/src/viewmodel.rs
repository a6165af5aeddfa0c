//! Observable holder for the latest fetched weather.
//!
//! The screen renders whatever this holds and never talks to the repository
//! directly. A failed fetch leaves the held state untouched; there is no
//! error state. Concurrent intents are not coordinated: whichever resolves
//! last overwrites the state.

use std::sync::Arc;
use tokio::sync::watch;

use crate::model::WeatherResult;
use crate::provider::FetchError;
use crate::repository::WeatherRepository;

/// View-state holder for the search screen.
///
/// Cloning is cheap and clones share the same state channel, so one clone
/// can be moved into a spawned fetch while the screen keeps observing.
#[derive(Clone)]
pub struct WeatherViewModel {
    inner: Arc<Inner>,
}

struct Inner {
    repository: WeatherRepository,
    state: watch::Sender<Option<WeatherResult>>,
}

impl WeatherViewModel {
    pub fn new(repository: WeatherRepository) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner { repository, state }),
        }
    }

    /// Subscribe to the held result. The receiver's first borrow yields the
    /// current value; every successful fetch notifies it.
    pub fn observe(&self) -> watch::Receiver<Option<WeatherResult>> {
        self.inner.state.subscribe()
    }

    /// Latest fetched result, if any fetch has succeeded yet.
    pub fn current(&self) -> Option<WeatherResult> {
        self.inner.state.borrow().clone()
    }

    /// Fetch current weather for a city name and publish the result.
    pub async fn fetch_by_city(&self, city: &str, api_key: &str) {
        let outcome = self.inner.repository.current_by_city(city, api_key).await;
        self.publish(outcome, &format!("city '{city}'"));
    }

    /// Fetch current weather for a coordinate pair and publish the result.
    pub async fn fetch_by_coordinates(&self, latitude: f64, longitude: f64, api_key: &str) {
        let outcome = self
            .inner
            .repository
            .current_by_coordinates(latitude, longitude, api_key)
            .await;
        self.publish(outcome, &format!("coordinates {latitude:.4},{longitude:.4}"));
    }

    fn publish(&self, outcome: Result<WeatherResult, FetchError>, requested: &str) {
        match outcome {
            Ok(result) => {
                tracing::debug!(
                    "weather for {requested}: {:.1}°C in {}",
                    result.temperature_c,
                    result.city_name
                );
                self.inner.state.send_replace(Some(result));
            }
            Err(e) => {
                // The screen shows nothing for failures; the state keeps its
                // previous value.
                tracing::warn!("weather fetch for {requested} failed: {e}");
            }
        }
    }
}
