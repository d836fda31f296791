//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weatherapi.com client behind the [`WeatherProvider`] trait
//! - Shared domain models (forecast, suggestions, units)
//! - The search/forecast state, its event-driven controller and a text renderer
//!
//! It is used by `weather-cli`, but the state and renderer have no I/O of
//! their own and can be driven by any front end.

pub mod config;
pub mod controller;
pub mod model;
pub mod provider;
pub mod state;
pub mod view;

pub use config::Config;
pub use controller::Controller;
pub use model::{Forecast, Suggestion, Unit};
pub use provider::{ProviderError, WeatherProvider, provider_from_config};
pub use state::{Effect, Event, MIN_QUERY_LEN, WeatherState};
