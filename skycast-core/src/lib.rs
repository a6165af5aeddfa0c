//! Core library for the `skycast` weather lookup app.
//!
//! This crate defines:
//! - Configuration & preference persistence
//! - The weather provider abstraction and its OpenWeatherMap client
//! - The observable view-state holder the screen renders from
//! - System location lookup
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod location;
pub mod model;
pub mod prefs;
pub mod provider;
pub mod repository;
pub mod viewmodel;

pub use config::{Config, LocationConfig};
pub use location::{Coordinates, LocationError, LocationService};
pub use model::{WeatherCondition, WeatherResult, icon_url};
pub use prefs::{PrefKey, PrefStore, PrefsError};
pub use provider::{FetchError, WeatherProvider, WeatherQuery, openweather::OpenWeatherClient};
pub use repository::WeatherRepository;
pub use viewmodel::WeatherViewModel;
