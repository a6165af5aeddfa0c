//! Interactive search screen.
//!
//! Renders the observable weather state, persists the screen preferences,
//! and turns submitted city names into fetch intents. Failures never reach
//! the result area: the state simply does not change and the prompt returns.

use std::fmt::Write as _;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use inquire::{InquireError, Text};
use skycast_core::{
    Config, LocationService, OpenWeatherClient, PrefKey, PrefStore, WeatherRepository,
    WeatherResult, WeatherViewModel,
};
use tokio::sync::watch;

/// How long a dispatched fetch is given before the screen goes back to the
/// prompt with unchanged state. The HTTP client times out well before this.
const FETCH_WAIT: Duration = Duration::from_secs(15);

pub struct SearchScreen {
    viewmodel: WeatherViewModel,
    prefs: PrefStore,
    location: LocationService,
    api_key: String,
}

impl SearchScreen {
    /// Build the screen from the on-disk configuration. Fails when no API
    /// key is configured yet.
    pub fn from_config() -> Result<Self> {
        let config = Config::load()?;
        let api_key = config.api_key()?.to_string();

        Ok(Self {
            viewmodel: WeatherViewModel::new(WeatherRepository::new(Box::new(
                OpenWeatherClient::new(),
            ))),
            prefs: PrefStore::open_default()?,
            location: LocationService::new(&config.location),
            api_key,
        })
    }

    pub async fn run(self) -> Result<()> {
        let mut state = self.viewmodel.observe();

        // First display: one last-known-location fetch, if the user opted
        // in. Denial or lookup failure skips this without a message.
        if self.location.permission_granted() {
            match self.location.last_known().await {
                Ok(coords) => {
                    let vm = self.viewmodel.clone();
                    let api_key = self.api_key.clone();
                    tokio::spawn(async move {
                        vm.fetch_by_coordinates(coords.latitude, coords.longitude, &api_key)
                            .await;
                    });
                    self.wait_for_update(&mut state).await;
                }
                Err(e) => tracing::debug!("startup location fetch skipped: {e}"),
            }
        }

        loop {
            self.render();

            let initial = self.prefs.get(PrefKey::LastCity);
            let submitted = tokio::task::spawn_blocking(move || {
                Text::new("Enter city name")
                    .with_initial_value(&initial)
                    .with_help_message("Enter searches, Esc quits")
                    .prompt()
            })
            .await
            .context("Prompt task failed")?;

            let city = match submitted {
                Ok(city) => city,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
                Err(e) => return Err(e).context("City prompt failed"),
            };
            let city = city.trim().to_string();
            if city.is_empty() {
                break;
            }

            if let Err(e) = self.prefs.set(PrefKey::LastCity, &city).await {
                tracing::warn!("could not persist city name: {e}");
            }

            let vm = self.viewmodel.clone();
            let api_key = self.api_key.clone();
            tokio::spawn(async move { vm.fetch_by_city(&city, &api_key).await });
            self.wait_for_update(&mut state).await;
        }

        Ok(())
    }

    /// Wait until the observable state changes or the fetch window expires.
    /// A failed fetch never updates the state, so the timeout is the only
    /// way back to the prompt in that case.
    async fn wait_for_update(&self, state: &mut watch::Receiver<Option<WeatherResult>>) {
        match tokio::time::timeout(FETCH_WAIT, state.changed()).await {
            Ok(Ok(())) => {
                let result = state.borrow_and_update().clone();
                if let Some(result) = result {
                    // Every successful fetch persists its icon URL.
                    if let Some(url) = result.icon_url() {
                        if let Err(e) = self.prefs.set(PrefKey::LastIconUrl, &url).await {
                            tracing::warn!("could not persist icon url: {e}");
                        }
                    }
                }
            }
            // Timed out, or the sender side is gone; either way the prompt
            // comes back with whatever state we have.
            Ok(Err(_)) | Err(_) => {}
        }
    }

    fn render(&self) {
        if let Some(result) = self.viewmodel.current() {
            print!("{}", render_result(&result, &self.prefs.get(PrefKey::LastIconUrl)));
        }
        // Nothing fetched yet: the result area stays empty.
    }
}

/// Format one result the way the screen shows it. `stored_icon_url` is the
/// fallback when the result carries no condition entry.
pub(crate) fn render_result(result: &WeatherResult, stored_icon_url: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", result.city_name);
    let _ = writeln!(out, "  Temperature: {:.1}°C", result.temperature_c);
    if let Some(condition) = result.primary_condition() {
        let _ = writeln!(out, "  Currently {}", condition.summary);
        let _ = writeln!(out, "  {}", condition.description);
    }

    let icon = result
        .icon_url()
        .unwrap_or_else(|| stored_icon_url.to_string());
    if !icon.is_empty() {
        let _ = writeln!(out, "  Icon: {icon}");
    }

    let observed = result.observed_at.with_timezone(&Local);
    let _ = writeln!(out, "  Observed at {}", observed.format("%Y-%m-%d %H:%M"));

    out
}
