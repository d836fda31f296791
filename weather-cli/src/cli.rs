use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use tracing::info;
use weather_core::{
    Config, MIN_QUERY_LEN, Unit, WeatherProvider, WeatherState, provider_from_config,
    view::render_forecast_only,
};

use crate::session;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather forecast CLI backed by weatherapi.com")]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Runs the interactive session when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weatherapi.com key, default city and unit.
    Configure,

    /// Show the 5-day forecast for a city.
    Forecast {
        /// City name, passed to the service as typed.
        city: String,

        /// Display unit (`c`/`celsius` or `f`/`fahrenheit`); defaults to the configured one.
        #[arg(short, long, value_parser = parse_unit)]
        unit: Option<Unit>,
    },

    /// List places matching a partial city name.
    Search {
        /// At least three characters.
        text: String,
    },

    /// Type a city, pick a suggestion and load forecasts interactively.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(),
            Command::Forecast { city, unit } => {
                let config = Config::load()?;
                let unit = unit.unwrap_or_else(|| config.unit());

                let provider = provider_from_config(&config)?;
                let forecast = provider
                    .forecast(&city)
                    .await
                    .with_context(|| format!("Could not load forecast for '{city}'"))?;

                print!("{}", render_forecast_only(&forecast, unit));
                Ok(())
            }
            Command::Search { text } => {
                if text.chars().count() < MIN_QUERY_LEN {
                    anyhow::bail!("Type at least {MIN_QUERY_LEN} characters to search.");
                }

                let provider = provider_from_config(&Config::load()?)?;
                let items = provider.search(&text).await.context("Search request failed")?;

                if items.is_empty() {
                    println!("No places match '{text}'.");
                }
                for (idx, item) in items.iter().enumerate() {
                    println!("{}. {item}", idx + 1);
                }
                Ok(())
            }
            Command::Interactive => {
                let config = Config::load()?;
                let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(&config)?);
                let state = WeatherState::new(config.initial_city(), config.unit());

                session::run(provider, state).await
            }
        }
    }
}

fn parse_unit(value: &str) -> Result<Unit, String> {
    Unit::try_from(value).map_err(|err| err.to_string())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("weatherapi.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("API key prompt cancelled")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let city = Text::new("Default city:")
        .with_default(config.initial_city())
        .prompt()
        .context("City prompt cancelled")?;
    config.default_city = Some(city);

    let starting = match config.unit() {
        Unit::Fahrenheit => 0,
        Unit::Celsius => 1,
    };
    let unit = Select::new("Temperature unit:", vec![Unit::Fahrenheit, Unit::Celsius])
        .with_starting_cursor(starting)
        .prompt()
        .context("Unit prompt cancelled")?;
    config.unit = Some(unit);

    let path = config.save()?;
    info!(path = %path.display(), "configuration saved");
    println!("Saved configuration to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["weather"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn forecast_accepts_unit_option() {
        let cli = Cli::try_parse_from(["weather", "-vv", "forecast", "London", "--unit", "c"]).unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Forecast { city, unit }) => {
                assert_eq!(city, "London");
                assert_eq!(unit, Some(Unit::Celsius));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn forecast_unit_defaults_to_config() {
        let cli = Cli::try_parse_from(["weather", "forecast", "London"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Forecast { unit: None, .. })));
    }

    #[test]
    fn forecast_accepts_empty_city() {
        let cli = Cli::try_parse_from(["weather", "forecast", ""]).unwrap();
        assert!(matches!(cli.command, Some(Command::Forecast { ref city, .. }) if city.is_empty()));
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let err = Cli::try_parse_from(["weather", "forecast", "London", "-u", "kelvin"]).unwrap_err();
        assert!(err.to_string().contains("Unknown unit"));
    }
}
