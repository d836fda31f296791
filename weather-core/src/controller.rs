//! Drives a [`WeatherState`] against a [`WeatherProvider`].
//!
//! Every effect runs on its own tokio task; completions are funnelled back
//! through a channel so the state is only ever touched by the owner of the
//! controller.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::{
    provider::WeatherProvider,
    state::{Effect, Event, WeatherState},
};

#[derive(Debug)]
pub struct Controller {
    state: WeatherState,
    provider: Arc<dyn WeatherProvider>,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
}

impl Controller {
    pub fn new(provider: Arc<dyn WeatherProvider>, state: WeatherState) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { state, provider, tx, rx }
    }

    pub fn state(&self) -> &WeatherState {
        &self.state
    }

    /// Apply an event and start whatever request it calls for.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, event: Event) {
        if let Some(effect) = self.state.apply(event) {
            self.spawn(effect);
        }
    }

    /// Wait for the next request to finish. Returns `None` only if the
    /// channel is closed, which cannot happen while `self` holds a sender.
    pub async fn next_completion(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Receive one completion and apply it.
    pub async fn apply_completion(&mut self) -> bool {
        match self.next_completion().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    fn spawn(&self, effect: Effect) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let event = match effect {
                Effect::Search { seq, query } => {
                    debug!(seq, %query, "requesting suggestions");
                    match provider.search(&query).await {
                        Ok(items) => Event::SuggestionsLoaded { seq, items },
                        Err(err) => Event::SuggestionsFailed { seq, message: err.to_string() },
                    }
                }
                Effect::FetchForecast { seq, city } => {
                    debug!(seq, %city, "requesting forecast");
                    match provider.forecast(&city).await {
                        Ok(forecast) => Event::ForecastLoaded { seq, forecast: Box::new(forecast) },
                        Err(err) => Event::ForecastFailed { seq, message: err.to_string() },
                    }
                }
            };

            // Receiver gone means the session ended; nothing left to update.
            let _ = tx.send(event);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentConditions, Forecast, ForecastDays, Location, Suggestion, Unit};
    use crate::provider::ProviderError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every call; answers searches after a per-query delay.
    #[derive(Debug, Default)]
    struct FakeProvider {
        searches: Mutex<Vec<String>>,
        forecasts: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        fn search_calls(&self) -> Vec<String> {
            self.searches.lock().unwrap().clone()
        }

        fn forecast_calls(&self) -> Vec<String> {
            self.forecasts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn forecast(&self, city: &str) -> Result<Forecast, ProviderError> {
            self.forecasts.lock().unwrap().push(city.to_string());
            if city == "Zzzznotacity" {
                return Err(ProviderError::Api {
                    code: 1006,
                    message: "No matching location found.".into(),
                });
            }

            Ok(Forecast {
                location: Location { name: city.to_string() },
                current: CurrentConditions {
                    temp_f: 59.0,
                    temp_c: 15.0,
                    wind_mph: 5.0,
                    wind_kph: 8.0,
                    humidity: 70.0,
                },
                forecast: ForecastDays { forecastday: Vec::new() },
            })
        }

        async fn search(&self, query: &str) -> Result<Vec<Suggestion>, ProviderError> {
            self.searches.lock().unwrap().push(query.to_string());
            // Shorter queries answer later so the older request finishes last.
            let delay = if query.len() <= 3 { 50 } else { 0 };
            tokio::time::sleep(Duration::from_millis(delay)).await;

            Ok(vec![Suggestion { name: format!("{query}-match"), region: "Region".into() }])
        }
    }

    fn controller(provider: &Arc<FakeProvider>) -> Controller {
        let provider: Arc<dyn WeatherProvider> = provider.clone();
        Controller::new(provider, WeatherState::new("", Unit::Fahrenheit))
    }

    #[tokio::test]
    async fn short_query_issues_no_request() {
        let provider = Arc::new(FakeProvider::default());
        let mut ctl = controller(&provider);

        ctl.dispatch(Event::QueryChanged("Lo".into()));
        tokio::task::yield_now().await;

        assert!(provider.search_calls().is_empty());
        assert!(ctl.state().suggestions.is_empty());
    }

    #[tokio::test]
    async fn suggestion_flow_selects_name() {
        let provider = Arc::new(FakeProvider::default());
        let mut ctl = controller(&provider);

        ctl.dispatch(Event::QueryChanged("London".into()));
        assert!(ctl.apply_completion().await);
        assert_eq!(ctl.state().suggestions[0].name, "London-match");

        ctl.dispatch(Event::SuggestionSelected(0));

        assert_eq!(ctl.state().query, "London-match");
        assert!(ctl.state().suggestions.is_empty());
        assert!(provider.forecast_calls().is_empty());
    }

    #[tokio::test]
    async fn out_of_order_search_results_keep_latest() {
        let provider = Arc::new(FakeProvider::default());
        let mut ctl = controller(&provider);

        ctl.dispatch(Event::QueryChanged("Lon".into()));
        ctl.dispatch(Event::QueryChanged("Lond".into()));
        assert!(ctl.apply_completion().await);
        assert!(ctl.apply_completion().await);

        assert_eq!(provider.search_calls(), vec!["Lon", "Lond"]);
        assert_eq!(ctl.state().suggestions.len(), 1);
        assert_eq!(ctl.state().suggestions[0].name, "Lond-match");
    }

    #[tokio::test]
    async fn submit_fetches_once_and_unit_toggle_does_not() {
        let provider = Arc::new(FakeProvider::default());
        let mut ctl = Controller::new(
            provider.clone() as Arc<dyn WeatherProvider>,
            WeatherState::new("London", Unit::Fahrenheit),
        );

        ctl.dispatch(Event::Submitted);
        assert!(ctl.apply_completion().await);

        let forecast = ctl.state().forecast.as_ref().expect("forecast loaded");
        assert_eq!(forecast.current.temp(ctl.state().unit), 59.0);

        ctl.dispatch(Event::UnitToggled);
        let forecast = ctl.state().forecast.as_ref().expect("forecast kept");
        assert_eq!(forecast.current.temp(ctl.state().unit), 15.0);
        assert_eq!(provider.forecast_calls(), vec!["London"]);
    }

    #[tokio::test]
    async fn failed_forecast_sets_error() {
        let provider = Arc::new(FakeProvider::default());
        let mut ctl = Controller::new(
            provider.clone() as Arc<dyn WeatherProvider>,
            WeatherState::new("Zzzznotacity", Unit::Fahrenheit),
        );

        ctl.dispatch(Event::Submitted);
        assert!(ctl.apply_completion().await);

        assert_eq!(
            ctl.state().error.as_deref(),
            Some("No matching location found. (code 1006)")
        );
        assert!(ctl.state().forecast.is_none());
    }
}
