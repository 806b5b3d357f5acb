//! Weather scenarios
//!
//! A `WeatherScenario` is an immutable bundle of the weather values the point
//! model consumes. Wind direction is carried for reporting only; the simplified
//! spread model has no directional term.

use crate::core_types::units::{Degrees, Fahrenheit, MilesPerHour, Percent};
use serde::{Deserialize, Serialize};

/// Named weather conditions for one fire behavior calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherScenario {
    /// Scenario name (e.g. "Red Flag Warning")
    pub name: String,
    /// Midflame wind speed
    pub wind_speed: MilesPerHour,
    /// Compass direction the wind blows from (informational)
    pub wind_direction: Degrees,
    /// Dead fuel moisture content
    pub fuel_moisture: Percent,
    /// Air temperature
    pub temperature: Fahrenheit,
    /// Relative humidity
    pub relative_humidity: Percent,
}

impl WeatherScenario {
    /// Create a scenario from explicit values
    pub fn new(
        name: &str,
        wind_speed: MilesPerHour,
        wind_direction: Degrees,
        fuel_moisture: Percent,
        temperature: Fahrenheit,
        relative_humidity: Percent,
    ) -> Self {
        Self {
            name: name.to_string(),
            wind_speed,
            wind_direction,
            fuel_moisture,
            temperature,
            relative_humidity,
        }
    }

    /// Moderate conditions: 10 mph, 8% moisture, 75°F, 40% RH
    pub fn moderate() -> Self {
        Self::new(
            "Moderate Conditions",
            MilesPerHour::new(10.0),
            Degrees::new(0.0),
            Percent::new(8.0),
            Fahrenheit::new(75.0),
            Percent::new(40.0),
        )
    }

    /// Red flag warning: 25 mph, 5% moisture, 95°F, 15% RH
    pub fn red_flag_warning() -> Self {
        Self::new(
            "Red Flag Warning",
            MilesPerHour::new(25.0),
            Degrees::new(0.0),
            Percent::new(5.0),
            Fahrenheit::new(95.0),
            Percent::new(15.0),
        )
    }

    /// Extreme fire weather: 40 mph, 3% moisture, 105°F, 10% RH
    pub fn extreme() -> Self {
        Self::new(
            "Extreme Fire Weather",
            MilesPerHour::new(40.0),
            Degrees::new(0.0),
            Percent::new(3.0),
            Fahrenheit::new(105.0),
            Percent::new(10.0),
        )
    }

    /// Tubbs Fire, 8-9 October 2017: 60 mph northeast Diablo winds, 3% moisture
    pub fn tubbs_fire() -> Self {
        Self::new(
            "Tubbs Fire (Oct 2017)",
            MilesPerHour::new(60.0),
            Degrees::new(45.0),
            Percent::new(3.0),
            Fahrenheit::new(85.0),
            Percent::new(10.0),
        )
    }

    /// Peak Diablo wind event: 70 mph from the northeast, 2% moisture
    pub fn diablo_extreme() -> Self {
        Self::new(
            "Diablo Wind Extreme",
            MilesPerHour::new(70.0),
            Degrees::new(45.0),
            Percent::new(2.0),
            Fahrenheit::new(95.0),
            Percent::new(25.0),
        )
    }

    /// All built-in presets, mildest first
    pub fn presets() -> Vec<Self> {
        vec![
            Self::moderate(),
            Self::red_flag_warning(),
            Self::extreme(),
            Self::tubbs_fire(),
            Self::diablo_extreme(),
        ]
    }
}

impl Default for WeatherScenario {
    fn default() -> Self {
        Self::moderate()
    }
}
