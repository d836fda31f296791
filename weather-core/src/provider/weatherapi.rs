use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::model::{Forecast, Suggestion};

use super::{ProviderError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";

const FORECAST_DAYS: &str = "5";

/// Client for weatherapi.com's forecast and search endpoints.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

#[derive(Debug)]
pub struct WeatherApiProviderBuilder {
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl WeatherApiProviderBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Without a timeout the reqwest default applies.
    pub fn timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.timeout = secs.map(Duration::from_secs);
        self
    }

    pub fn build(self) -> Result<WeatherApiProvider, ProviderError> {
        let mut http = Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(WeatherApiProvider {
            api_key: self.api_key,
            base_url: self.base_url,
            http: http.build().map_err(transport)?,
        })
    }
}

impl WeatherApiProvider {
    pub fn builder(api_key: String) -> WeatherApiProviderBuilder {
        WeatherApiProviderBuilder { api_key, base_url: DEFAULT_BASE_URL.to_string(), timeout: None }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    #[instrument(skip(self))]
    async fn forecast(&self, city: &str) -> Result<Forecast, ProviderError> {
        let res = self
            .http
            .get(self.endpoint("/v1/forecast.json"))
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", city),
                ("days", FORECAST_DAYS),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .send()
            .await
            .map_err(transport)?;

        let forecast: Forecast = decode(res).await?;
        debug!(location = %forecast.location.name, days = forecast.days().len(), "forecast loaded");
        Ok(forecast)
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>, ProviderError> {
        let res = self
            .http
            .get(self.endpoint("/v1/search.json"))
            .query(&[("key", self.api_key.as_str()), ("q", query)])
            .send()
            .await
            .map_err(transport)?;

        let items: Vec<Suggestion> = decode(res).await?;
        debug!(count = items.len(), "suggestions loaded");
        Ok(items)
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorEnvelope {
    error: WaError,
}

#[derive(Debug, Deserialize)]
struct WaError {
    code: i64,
    message: String,
}

/// Read the body and map it onto `T`, turning weatherapi error objects into
/// [`ProviderError::Api`] whatever the status code.
async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ProviderError> {
    let status = res.status();
    let body = res.text().await.map_err(transport)?;

    if let Ok(envelope) = serde_json::from_str::<WaErrorEnvelope>(&body) {
        return Err(ProviderError::Api { code: envelope.error.code, message: envelope.error.message });
    }

    if !status.is_success() {
        return Err(ProviderError::Status { status: status.as_u16(), body: truncate_body(&body) });
    }

    Ok(serde_json::from_str(&body)?)
}

/// The request URL carries the API key, so it never goes into an error.
fn transport(err: reqwest::Error) -> ProviderError {
    ProviderError::Transport(err.without_url())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_strips_trailing_slash() {
        let provider = WeatherApiProvider::builder("KEY".into())
            .base_url("http://localhost:8080/")
            .build()
            .expect("client builds");

        assert_eq!(provider.endpoint("/v1/search.json"), "http://localhost:8080/v1/search.json");
    }

    #[test]
    fn builder_defaults_to_public_service() {
        let provider = WeatherApiProvider::builder("KEY".into()).build().expect("client builds");
        assert_eq!(provider.endpoint("/v1/forecast.json"), "https://api.weatherapi.com/v1/forecast.json");
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("bad gateway"), "bad gateway");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(300);
        let cut = truncate_body(&body);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }
}
