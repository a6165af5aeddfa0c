//! System location lookup.
//!
//! The permission model is the `location.enabled` config flag: when the user
//! has not opted in, `last_known` fails before any I/O and the caller skips
//! the coordinate fetch. When granted, the last known position is resolved
//! with a single IP-geolocation query. No retry, no caching.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::LocationConfig;

const GEOLOCATION_URL: &str = "http://ip-api.com/json";
const REQUEST_TIMEOUT_SECS: u64 = 5;

/// A latitude/longitude pair from the location service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("location permission not granted")]
    PermissionDenied,
    #[error("location service unavailable: {0}")]
    Unavailable(String),
    #[error("location request failed: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct GeoIpResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Client for the device-location analog of a desktop terminal.
#[derive(Debug, Clone)]
pub struct LocationService {
    http: Client,
    base_url: String,
    enabled: bool,
}

impl LocationService {
    pub fn new(config: &LocationConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: GEOLOCATION_URL.to_string(),
            enabled: config.enabled,
        }
    }

    #[cfg(test)]
    pub fn with_base_url(enabled: bool, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            enabled,
        }
    }

    /// Whether the user has opted in to location lookup.
    pub fn permission_granted(&self) -> bool {
        self.enabled
    }

    /// One last-known-position query. Fails with `PermissionDenied` before
    /// touching the network when the opt-in is absent.
    pub async fn last_known(&self) -> Result<Coordinates, LocationError> {
        if !self.enabled {
            return Err(LocationError::PermissionDenied);
        }

        let res = self
            .http
            .get(&self.base_url)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .send()
            .await?;

        let body: GeoIpResponse = res.json().await?;

        if body.status != "success" {
            return Err(LocationError::Unavailable(format!(
                "lookup answered with status '{}'",
                body.status
            )));
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => {
                tracing::debug!("resolved last known location to {latitude:.4},{longitude:.4}");
                Ok(Coordinates {
                    latitude,
                    longitude,
                })
            }
            _ => Err(LocationError::Unavailable(
                "lookup response carried no coordinates".to_string(),
            )),
        }
    }
}
