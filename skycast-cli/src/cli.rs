use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Text};
use skycast_core::{
    Config, OpenWeatherClient, PrefKey, PrefStore, WeatherRepository, WeatherViewModel,
};

use crate::screen::{self, SearchScreen};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather lookup for your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the OpenWeatherMap API key and location preferences.
    Configure,

    /// Print current weather for a city once and exit.
    Show {
        /// City name, e.g. "London".
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show { city }) => show(&city).await,
            // No subcommand: open the interactive search screen.
            None => SearchScreen::from_config()?.run().await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("OpenWeatherMap API key:")
        .with_initial_value(config.api_key.as_deref().unwrap_or(""))
        .prompt()
        .context("Configuration aborted")?;
    let api_key = api_key.trim();
    if !api_key.is_empty() {
        config.set_api_key(api_key.to_string());
    }

    config.location.enabled = Confirm::new("Look up your location on startup?")
        .with_default(config.location.enabled)
        .with_help_message("Uses one IP-geolocation query per launch")
        .prompt()
        .context("Configuration aborted")?;

    config.save()?;
    println!(
        "Configuration saved to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}

async fn show(city: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let api_key = config.api_key()?.to_string();
    let prefs = PrefStore::open_default()?;

    let repository = WeatherRepository::new(Box::new(OpenWeatherClient::new()));
    let viewmodel = WeatherViewModel::new(repository);

    viewmodel.fetch_by_city(city, &api_key).await;

    match viewmodel.current() {
        Some(result) => {
            prefs.set(PrefKey::LastCity, city).await?;
            if let Some(url) = result.icon_url() {
                prefs.set(PrefKey::LastIconUrl, &url).await?;
            }
            print!("{}", screen::render_result(&result, &prefs.get(PrefKey::LastIconUrl)));
            Ok(())
        }
        None => anyhow::bail!("No weather available for '{city}' (see log output for details)"),
    }
}
