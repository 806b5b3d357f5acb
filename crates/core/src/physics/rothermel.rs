//! Simplified Rothermel point model
//!
//! Converts a fuel model plus wind, slope and moisture into rate of spread,
//! fireline intensity, flame length and a qualitative fire type.
//!
//! This is NOT the full Rothermel (1972) formulation. Reaction intensity,
//! propagating flux and heat of pre-ignition are collapsed into a single
//! base-rate term. Results are first-order planning estimates.
//!
//! # Formula
//! ```text
//! r     = M_f / M_x
//! η_M   = max(0, 1 - 2.59 r + 5.11 r² - 3.52 r³)     (0 when r ≥ 1)
//! Φ_w   = 1 + sqrt(U / 10)
//! Φ_s   = 1 + 0.3 × (slope / 100)
//! R     = (w × σ / 1000) × η_M × Φ_w × Φ_s           (ch/h)
//! I     = R × w × 8000                               (BTU/ft/s)
//! L     = 0.45 × I^0.46                              (ft, Byram)
//! ```
//!
//! # References
//! - Rothermel, R.C. (1972). "A mathematical model for predicting fire spread in wildland fuels."
//!   USDA Forest Service Research Paper INT-115.
//! - Byram, G.M. (1959). "Combustion of forest fuels." In: Forest Fire: Control and Use.
//! - Scott, J.H., Burgan, R.E. (2005). "Standard fire behavior fuel models." RMRS-GTR-153.

use crate::core_types::fuel::{FuelModel, FuelModelCatalog};
use crate::core_types::units::{
    BtuPerFootSecond, ChainsPerHour, Fahrenheit, Feet, FeetPerMinute, MilesPerHour, Percent,
};
use crate::error::FireResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Empirical constant linking spread rate and fuel load to energy release
pub const INTENSITY_COEFFICIENT: f32 = 8000.0;

/// Byram flame length coefficient
pub const BYRAM_COEFFICIENT: f32 = 0.45;

/// Byram flame length exponent
pub const BYRAM_EXPONENT: f32 = 0.46;

/// Slope factor gain per 100% slope
pub const SLOPE_GAIN: f32 = 0.3;

/// Wind speed (mph) that normalises the wind factor
pub const WIND_REFERENCE: f32 = 10.0;

/// Wind speed (mph) above which a moderate fire is called wind-driven
pub const WIND_DRIVEN_THRESHOLD: f32 = 15.0;

/// Default air temperature when the caller has none
pub const DEFAULT_TEMPERATURE: Fahrenheit = Fahrenheit::new(70.0);

/// Default relative humidity when the caller has none
pub const DEFAULT_HUMIDITY: Percent = Percent::new(40.0);

/// Qualitative fire behavior class derived from flame length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FireType {
    /// Flame length below 4 ft
    LowIntensitySurface,
    /// Flame length below 8 ft with wind above 15 mph
    WindDrivenSurface,
    /// Flame length below 8 ft in lighter wind
    ModerateIntensitySurface,
    /// Flame length below 12 ft
    TransitionalCrown,
    /// Flame length 12 ft and above
    ExtremeCrown,
}

impl FireType {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            FireType::LowIntensitySurface => "low-intensity surface fire",
            FireType::WindDrivenSurface => "wind-driven surface fire",
            FireType::ModerateIntensitySurface => "moderate-intensity surface fire",
            FireType::TransitionalCrown => "transitional / crown-fire potential",
            FireType::ExtremeCrown => "extreme / crown fire",
        }
    }
}

impl fmt::Display for FireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Environmental inputs to one point-model evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadConditions {
    /// Midflame wind speed
    pub wind_speed: MilesPerHour,
    /// Slope steepness in percent
    pub slope: Percent,
    /// Dead fuel moisture content
    pub fuel_moisture: Percent,
    /// Air temperature (echoed, not used by the simplified model)
    pub temperature: Fahrenheit,
    /// Relative humidity (echoed, not used by the simplified model)
    pub relative_humidity: Percent,
}

impl SpreadConditions {
    /// Conditions with default temperature (70°F) and humidity (40%)
    pub fn new(wind_speed: MilesPerHour, slope: Percent, fuel_moisture: Percent) -> Self {
        Self {
            wind_speed,
            slope,
            fuel_moisture,
            temperature: DEFAULT_TEMPERATURE,
            relative_humidity: DEFAULT_HUMIDITY,
        }
    }

    /// Override air temperature
    pub fn with_temperature(mut self, temperature: Fahrenheit) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override relative humidity
    pub fn with_humidity(mut self, relative_humidity: Percent) -> Self {
        self.relative_humidity = relative_humidity;
        self
    }
}

/// Output of one point-model evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadBehaviorResult {
    /// Fuel model code
    pub fuel_model: String,
    /// Fuel model display name
    pub fuel_model_name: String,
    /// Rate of spread in chains per hour
    pub rate_of_spread: ChainsPerHour,
    /// Rate of spread in feet per minute
    pub rate_of_spread_fpm: FeetPerMinute,
    /// Flame length
    pub flame_length: Feet,
    /// Fireline intensity
    pub fireline_intensity: BtuPerFootSecond,
    /// Qualitative classification
    pub fire_type: FireType,
    /// Echo of the input conditions
    pub conditions: SpreadConditions,
}

/// Stateless point model over an injected fuel catalog
///
/// Reads only the immutable catalog, so one instance can be shared freely
/// across threads.
#[derive(Debug, Clone, Copy)]
pub struct RateOfSpreadModel<'a> {
    catalog: &'a FuelModelCatalog,
}

impl<'a> RateOfSpreadModel<'a> {
    /// Create a model that resolves fuel codes against `catalog`
    pub fn new(catalog: &'a FuelModelCatalog) -> Self {
        Self { catalog }
    }

    /// Catalog this model reads from
    pub fn catalog(&self) -> &'a FuelModelCatalog {
        self.catalog
    }

    /// Calculate fire behavior for a fuel model code
    ///
    /// # Errors
    /// Returns `UnknownFuelModel` if `fuel_model_code` is not in the catalog
    pub fn calculate(
        &self,
        fuel_model_code: &str,
        conditions: &SpreadConditions,
    ) -> FireResult<SpreadBehaviorResult> {
        let fuel = self.catalog.get(fuel_model_code)?;
        Ok(calculate_for_fuel(fuel, conditions))
    }
}

/// Calculate fire behavior for an already-resolved fuel model
pub fn calculate_for_fuel(fuel: &FuelModel, conditions: &SpreadConditions) -> SpreadBehaviorResult {
    let damping = moisture_damping(*conditions.fuel_moisture, fuel.moisture_of_extinction);
    let wind = wind_factor(*conditions.wind_speed);
    let slope = slope_factor(*conditions.slope);

    let base_rate = (fuel.fuel_load * fuel.sav_ratio / 1000.0) * damping;
    let ros = ChainsPerHour::new(base_rate * wind * slope);

    let intensity = BtuPerFootSecond::new(*ros * fuel.fuel_load * INTENSITY_COEFFICIENT);
    let flame_length = Feet::new(BYRAM_COEFFICIENT * intensity.powf(BYRAM_EXPONENT));

    SpreadBehaviorResult {
        fuel_model: fuel.code.clone(),
        fuel_model_name: fuel.name.clone(),
        rate_of_spread: ros,
        rate_of_spread_fpm: ros.to_feet_per_minute(),
        flame_length,
        fireline_intensity: intensity,
        fire_type: classify_fire_type(flame_length, conditions.wind_speed),
        conditions: *conditions,
    }
}

/// Moisture damping coefficient (`η_M`)
///
/// Zero at or above the moisture of extinction, otherwise the empirical cubic
/// clamped below at zero.
pub fn moisture_damping(moisture: f32, moisture_of_extinction: f32) -> f32 {
    if moisture >= moisture_of_extinction {
        return 0.0;
    }
    let r = moisture / moisture_of_extinction;
    (1.0 - 2.59 * r + 5.11 * r.powi(2) - 3.52 * r.powi(3)).max(0.0)
}

/// Wind factor (`Φ_w`). Negative speeds are treated as calm.
pub fn wind_factor(wind_speed_mph: f32) -> f32 {
    1.0 + (wind_speed_mph.max(0.0) / WIND_REFERENCE).sqrt()
}

/// Slope factor (`Φ_s`)
pub fn slope_factor(slope_percent: f32) -> f32 {
    1.0 + SLOPE_GAIN * (slope_percent / 100.0)
}

/// Classify fire type from flame length; first matching tier wins
pub fn classify_fire_type(flame_length: Feet, wind_speed: MilesPerHour) -> FireType {
    if *flame_length < 4.0 {
        FireType::LowIntensitySurface
    } else if *flame_length < 8.0 {
        if *wind_speed > WIND_DRIVEN_THRESHOLD {
            FireType::WindDrivenSurface
        } else {
            FireType::ModerateIntensitySurface
        }
    } else if *flame_length < 12.0 {
        FireType::TransitionalCrown
    } else {
        FireType::ExtremeCrown
    }
}
