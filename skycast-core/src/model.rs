use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base URL for OpenWeatherMap condition icons.
const ICON_BASE_URL: &str = "https://openweathermap.org/img/w";

/// One condition entry as reported by the provider.
///
/// A result carries an ordered list of these; the first entry is the primary
/// condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    /// Short condition group, e.g. "Clouds".
    pub summary: String,
    /// Longer human-readable text, e.g. "scattered clouds".
    pub description: String,
    /// Provider icon code, e.g. "01d".
    pub icon: String,
}

/// Snapshot of one current-weather query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city_name: String,
    pub temperature_c: f64,
    pub conditions: Vec<WeatherCondition>,
    pub observed_at: DateTime<Utc>,
}

impl WeatherResult {
    pub fn primary_condition(&self) -> Option<&WeatherCondition> {
        self.conditions.first()
    }

    /// Icon URL for the primary condition, if the result has one.
    pub fn icon_url(&self) -> Option<String> {
        self.primary_condition().map(|c| icon_url(&c.icon))
    }
}

/// Deterministic icon URL for a provider icon code.
pub fn icon_url(code: &str) -> String {
    format!("{ICON_BASE_URL}/{code}.png")
}
