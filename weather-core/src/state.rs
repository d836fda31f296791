//! Component state and its transitions.
//!
//! [`WeatherState::apply`] is pure: it mutates the state and returns the
//! network request, if any, that the caller must run. Completions come back
//! as events tagged with the sequence number they were issued under, and only
//! the latest request of each kind may land.

use tracing::{debug, warn};

use crate::model::{Forecast, Suggestion, Unit};

/// Number of characters the query needs before suggestions are requested.
pub const MIN_QUERY_LEN: usize = 3;

/// Monotonic request number, one counter per request kind.
pub type Seq = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    QueryChanged(String),
    /// Index into the current suggestion list.
    SuggestionSelected(usize),
    Submitted,
    UnitToggled,
    SuggestionsLoaded { seq: Seq, items: Vec<Suggestion> },
    SuggestionsFailed { seq: Seq, message: String },
    ForecastLoaded { seq: Seq, forecast: Box<Forecast> },
    ForecastFailed { seq: Seq, message: String },
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Search { seq: Seq, query: String },
    FetchForecast { seq: Seq, city: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherState {
    pub query: String,
    pub suggestions: Vec<Suggestion>,
    pub forecast: Option<Forecast>,
    pub error: Option<String>,
    pub unit: Unit,
    search_seq: Seq,
    forecast_seq: Seq,
}

impl WeatherState {
    pub fn new(query: impl Into<String>, unit: Unit) -> Self {
        Self { query: query.into(), unit, ..Self::default() }
    }

    pub fn apply(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::QueryChanged(text) => {
                // Any answer to an earlier search is stale from here on.
                self.search_seq += 1;
                self.query = text;

                if self.query.chars().count() >= MIN_QUERY_LEN {
                    Some(Effect::Search { seq: self.search_seq, query: self.query.clone() })
                } else {
                    self.suggestions.clear();
                    None
                }
            }
            Event::SuggestionSelected(index) => {
                let item = self.suggestions.get(index)?;
                self.query = item.name.clone();
                self.suggestions.clear();
                self.search_seq += 1;
                None
            }
            Event::Submitted => {
                self.forecast_seq += 1;
                self.error = None;
                Some(Effect::FetchForecast { seq: self.forecast_seq, city: self.query.clone() })
            }
            Event::UnitToggled => {
                self.unit = self.unit.toggle();
                None
            }
            Event::SuggestionsLoaded { seq, items } => {
                if self.is_current_search(seq) {
                    self.suggestions = items;
                }
                None
            }
            Event::SuggestionsFailed { seq, message } => {
                // Never user-visible; the list keeps whatever it had.
                if self.is_current_search(seq) {
                    warn!(seq, error = %message, "autocomplete request failed");
                }
                None
            }
            Event::ForecastLoaded { seq, forecast } => {
                if self.is_current_forecast(seq) {
                    self.forecast = Some(*forecast);
                    self.error = None;
                }
                None
            }
            Event::ForecastFailed { seq, message } => {
                if self.is_current_forecast(seq) {
                    self.error = Some(message);
                }
                None
            }
        }
    }

    fn is_current_search(&self, seq: Seq) -> bool {
        let current = seq == self.search_seq;
        if !current {
            debug!(seq, latest = self.search_seq, "dropping stale search result");
        }
        current
    }

    fn is_current_forecast(&self, seq: Seq) -> bool {
        let current = seq == self.forecast_seq;
        if !current {
            debug!(seq, latest = self.forecast_seq, "dropping stale forecast result");
        }
        current
    }
}
