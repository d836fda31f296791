use crate::{
    Config,
    model::{Forecast, Suggestion},
    provider::weatherapi::WeatherApiProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod weatherapi;

/// Errors surfaced by a [`WeatherProvider`].
///
/// The `Display` text is what the user sees when a forecast request fails.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never produced a response (DNS, connect, timeout, body read).
    /// Built with the URL stripped, since the query string holds the API key.
    #[error("Request to weather service failed: {0}")]
    Transport(reqwest::Error),

    /// The service answered with its own error object, e.g. "No matching location found."
    #[error("{message} (code {code})")]
    Api { code: i64, message: String },

    /// Non-success status without a recognizable error object.
    #[error("Weather service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// A success response whose body did not have the expected shape.
    #[error("Unexpected response from weather service: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Five-day forecast for a city name, forwarded verbatim.
    async fn forecast(&self, city: &str) -> Result<Forecast, ProviderError>;

    /// Places matching a partial city name.
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>, ProviderError>;
}

/// Construct the weatherapi.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.resolve_api_key()?;
    let provider = WeatherApiProvider::builder(api_key)
        .base_url(config.base_url())
        .timeout_secs(config.timeout_secs)
        .build()?;

    Ok(Box::new(provider))
}
