use std::fmt::Write;

use crate::{
    model::{Forecast, Unit},
    state::WeatherState,
};

/// Render the component as plain text.
///
/// An error replaces everything else. Otherwise the unit toggle, query and
/// suggestions are always shown, followed by the forecast once one has loaded.
pub fn render(state: &WeatherState) -> String {
    if let Some(error) = &state.error {
        return format!("Error: {error}\n");
    }

    let mut out = String::new();
    let _ = writeln!(out, "[{}]", toggle_label(state.unit));
    let _ = writeln!(out, "City: {}", state.query);

    for (idx, item) in state.suggestions.iter().enumerate() {
        let _ = writeln!(out, "  {}. {item}", idx + 1);
    }

    if let Some(forecast) = &state.forecast {
        out.push('\n');
        render_forecast(&mut out, forecast, state.unit);
    }

    out
}

pub fn toggle_label(unit: Unit) -> &'static str {
    match unit {
        Unit::Fahrenheit => "Switch to Celsius",
        Unit::Celsius => "Switch to Fahrenheit",
    }
}

/// Forecast section only, used by the one-shot command.
pub fn render_forecast_only(forecast: &Forecast, unit: Unit) -> String {
    let mut out = String::new();
    render_forecast(&mut out, forecast, unit);
    out
}

fn render_forecast(out: &mut String, forecast: &Forecast, unit: Unit) {
    let temp = unit.symbol();
    let wind = unit.wind_label();
    let current = &forecast.current;

    let _ = writeln!(out, "Weather Forecast for {}", forecast.location.name);
    let _ = writeln!(out, "Current Temperature: {} {temp}", current.temp(unit));
    let _ = writeln!(out, "Wind Speed: {} {wind}", current.wind(unit));
    let _ = writeln!(out, "Humidity: {}%", current.humidity);
    let _ = writeln!(out, "\n{}-Day Forecast", forecast.days().len());

    for day in forecast.days() {
        let _ = writeln!(out, "\n{}", day.date);
        let _ = writeln!(out, "  Average Temperature: {} {temp}", day.day.avg_temp(unit));
        let _ = writeln!(out, "  Max Wind Speed: {} {wind}", day.day.max_wind(unit));
    }
}
