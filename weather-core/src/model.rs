use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Temperature unit used when displaying a [`Forecast`].
///
/// Both units are always present in the payload; the unit only selects which
/// field is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Fahrenheit,
    Celsius,
}

impl Unit {
    pub fn toggle(self) -> Self {
        match self {
            Unit::Fahrenheit => Unit::Celsius,
            Unit::Celsius => Unit::Fahrenheit,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Fahrenheit => "F",
            Unit::Celsius => "C",
        }
    }

    /// Wind speed label paired with this unit system.
    pub fn wind_label(&self) -> &'static str {
        match self {
            Unit::Fahrenheit => "mph",
            Unit::Celsius => "kph",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Fahrenheit => "fahrenheit",
            Unit::Celsius => "celsius",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Unit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "f" | "fahrenheit" => Ok(Unit::Fahrenheit),
            "c" | "celsius" => Ok(Unit::Celsius),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: fahrenheit, celsius."
            )),
        }
    }
}

/// A place returned by the autocomplete endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub region: String,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.region)
    }
}

/// Forecast payload as returned by `/v1/forecast.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: ForecastDays,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_f: f64,
    pub temp_c: f64,
    pub wind_mph: f64,
    pub wind_kph: f64,
    pub humidity: f64,
}

impl CurrentConditions {
    pub fn temp(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Fahrenheit => self.temp_f,
            Unit::Celsius => self.temp_c,
        }
    }

    pub fn wind(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Fahrenheit => self.wind_mph,
            Unit::Celsius => self.wind_kph,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDays {
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day: DayStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStats {
    pub avgtemp_f: f64,
    pub avgtemp_c: f64,
    pub maxwind_mph: f64,
    pub maxwind_kph: f64,
    pub avghumidity: f64,
}

impl DayStats {
    pub fn avg_temp(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Fahrenheit => self.avgtemp_f,
            Unit::Celsius => self.avgtemp_c,
        }
    }

    pub fn max_wind(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Fahrenheit => self.maxwind_mph,
            Unit::Celsius => self.maxwind_kph,
        }
    }
}

impl Forecast {
    pub fn days(&self) -> &[ForecastDay] {
        &self.forecast.forecastday
    }
}
