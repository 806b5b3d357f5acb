//! Landscape fire risk zoning
//!
//! Two classifications over the same fuel and slope rasters, both reported
//! with the `RiskLevel` scale:
//!
//! - `HazardTable::zone` is static. Fuel codes carry a moderate or high hazard
//!   class, and steep terrain promotes a cell one level:
//!   high hazard on steep slope is Extreme, high hazard or moderate hazard on
//!   steep slope is High, remaining moderate hazard is Moderate, all else Low.
//! - `RiskIndex::evaluate` is weather-adjusted:
//!   ```text
//!   index = clamp(base × (1 + slope/100 × 0.5) × (1 + wind/20) × max(0.3, 1 - moisture/20), 0, 1)
//!   ```
//!   banded at 0.3, 0.6 and 0.8.
//!
//! Fuel nodata cells get no zone and are left out of every percentage.

use crate::analysis::grid_analysis::RiskLevel;
use crate::core_types::units::Percent;
use crate::core_types::weather::WeatherScenario;
use crate::error::FireResult;
use crate::grid::raster::{Landscape, RasterGrid};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Slope above which terrain counts as steep
pub const DEFAULT_STEEP_SLOPE: Percent = Percent::new(30.0);

/// Slope gain of the risk index per 100% slope
const INDEX_SLOPE_GAIN: f32 = 0.5;
/// Wind speed (mph) that doubles the risk index
const INDEX_WIND_REFERENCE: f32 = 20.0;
/// Fuel moisture (%) at which the moisture factor bottoms out
const INDEX_MOISTURE_REFERENCE: f32 = 20.0;
/// Floor of the moisture factor
const INDEX_MOISTURE_FLOOR: f32 = 0.3;

/// Hazard class of a fuel code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelHazard {
    /// Moderate load fuels
    Moderate,
    /// High load fuels
    High,
}

impl RiskLevel {
    /// Band a weather-adjusted risk index in `[0, 1]`
    pub fn from_index(index: f32) -> Self {
        if index < 0.3 {
            Self::Low
        } else if index < 0.6 {
            Self::Moderate
        } else if index < 0.8 {
            Self::High
        } else {
            Self::Extreme
        }
    }
}

/// Cell counts per risk level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    /// All cells of the raster
    pub total_cells: usize,
    /// Cells with valid fuel data
    pub valid_cells: usize,
    /// Cells per level, lowest first
    pub counts: [usize; 4],
}

impl RiskSummary {
    /// Count the zones of a raster; `None` cells are nodata
    pub fn from_zones(zones: &RasterGrid<Option<RiskLevel>>) -> Self {
        let mut counts = [0; 4];
        for level in zones.data().iter().flatten() {
            counts[*level as usize] += 1;
        }
        Self {
            total_cells: zones.len(),
            valid_cells: counts.iter().sum(),
            counts,
        }
    }

    /// Cells in exactly `level`
    pub fn count(&self, level: RiskLevel) -> usize {
        self.counts[level as usize]
    }

    /// Cells in `level` or above
    pub fn at_least(&self, level: RiskLevel) -> usize {
        self.counts[level as usize..].iter().sum()
    }

    /// Share of valid cells in exactly `level`, in percent
    pub fn percent(&self, level: RiskLevel) -> f32 {
        if self.valid_cells == 0 {
            return 0.0;
        }
        self.count(level) as f32 / self.valid_cells as f32 * 100.0
    }
}

/// Zone raster plus its summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskZoning {
    /// Risk level per cell, `None` on fuel nodata
    pub zones: RasterGrid<Option<RiskLevel>>,
    /// Counts over `zones`
    pub summary: RiskSummary,
}

impl RiskZoning {
    fn from_zones(zones: RasterGrid<Option<RiskLevel>>) -> Self {
        let summary = RiskSummary::from_zones(&zones);
        Self { zones, summary }
    }
}

/// Fuel hazard classes and steep-slope threshold for static zoning
#[derive(Debug, Clone)]
pub struct HazardTable {
    hazards: FxHashMap<i32, FuelHazard>,
    steep_slope: Percent,
}

impl HazardTable {
    /// Hazard classes for LANDFIRE FBFM40 rasters
    pub fn landfire_fbfm40() -> Self {
        let mut entries: Vec<(i32, FuelHazard)> = Vec::new();

        // High load grass (GR5-9), grass-shrub (GS3-4), shrub and timber understory
        entries.extend((105..=109).map(|c| (c, FuelHazard::High)));
        entries.extend([123, 124, 143, 145].map(|c| (c, FuelHazard::High)));
        entries.extend((147..=149).map(|c| (c, FuelHazard::High)));
        entries.extend([163, 165].map(|c| (c, FuelHazard::High)));

        // Moderate grass (GR2-4), grass-shrub, shrub, understory and litter
        entries.extend((102..=104).map(|c| (c, FuelHazard::Moderate)));
        entries.extend(
            [122, 142, 144, 146, 162, 164, 183, 186, 189].map(|c| (c, FuelHazard::Moderate)),
        );

        Self::from_entries(entries, DEFAULT_STEEP_SLOPE)
    }

    /// Build a custom table; unlisted codes carry no hazard
    pub fn from_entries(
        entries: impl IntoIterator<Item = (i32, FuelHazard)>,
        steep_slope: Percent,
    ) -> Self {
        Self {
            hazards: entries.into_iter().collect(),
            steep_slope,
        }
    }

    /// Replace the steep-slope threshold
    pub fn with_steep_slope(mut self, steep_slope: Percent) -> Self {
        self.steep_slope = steep_slope;
        self
    }

    /// Set or clear the hazard class of one code
    pub fn set_code(&mut self, code: i32, hazard: Option<FuelHazard>) {
        match hazard {
            Some(h) => {
                self.hazards.insert(code, h);
            }
            None => {
                self.hazards.remove(&code);
            }
        }
    }

    /// Hazard class of a code, if any
    pub fn hazard(&self, code: i32) -> Option<FuelHazard> {
        self.hazards.get(&code).copied()
    }

    /// Slope above which terrain is steep
    pub fn steep_slope(&self) -> Percent {
        self.steep_slope
    }

    /// Zone of one cell; a non-finite slope is never steep
    pub fn classify(&self, code: i32, slope_percent: f32) -> RiskLevel {
        let steep = slope_percent.is_finite() && self.steep_slope < slope_percent;
        match (self.hazard(code), steep) {
            (Some(FuelHazard::High), true) => RiskLevel::Extreme,
            (Some(FuelHazard::High), false) | (Some(FuelHazard::Moderate), true) => RiskLevel::High,
            (Some(FuelHazard::Moderate), false) => RiskLevel::Moderate,
            (None, _) => RiskLevel::Low,
        }
    }

    /// Zone a landscape
    ///
    /// # Errors
    /// `MissingRasterLayer` if a layer is absent, `ShapeMismatch` if the
    /// layers disagree in shape
    pub fn zone(&self, landscape: &Landscape) -> FireResult<RiskZoning> {
        self.zone_layers(landscape.fuel()?, landscape.slope()?)
    }

    /// Zone explicit fuel and slope layers
    ///
    /// # Errors
    /// `ShapeMismatch` if the layers disagree in shape
    pub fn zone_layers(
        &self,
        fuel: &RasterGrid<i32>,
        slope: &RasterGrid<f32>,
    ) -> FireResult<RiskZoning> {
        fuel.check_same_shape(slope)?;
        let zones = zip_layers(fuel, slope, |code, s| {
            let s = if slope.is_nodata(s) { f32::NAN } else { s };
            Some(self.classify(code, s))
        })?;
        let zoning = RiskZoning::from_zones(zones);
        log_summary("Hazard zoning", &zoning.summary);
        Ok(zoning)
    }
}

impl Default for HazardTable {
    fn default() -> Self {
        Self::landfire_fbfm40()
    }
}

/// Weather-adjusted risk index layer with its zones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskIndexField {
    /// Index in `[0, 1]`; 0 on fuel nodata
    pub index: RasterGrid<f32>,
    /// Banded index
    pub zoning: RiskZoning,
}

/// Base fuel risk per code for the weather-adjusted index
#[derive(Debug, Clone)]
pub struct RiskIndex {
    base: FxHashMap<i32, f32>,
}

impl RiskIndex {
    /// Base risk by FBFM40 fuel group: grass 0.6, shrub 0.8, timber 0.5
    pub fn fbfm40_groups() -> Self {
        let mut entries: Vec<(i32, f32)> = Vec::new();
        entries.extend((101..=109).map(|c| (c, 0.6)));
        entries.extend((121..=124).map(|c| (c, 0.6)));
        entries.extend((141..=149).map(|c| (c, 0.8)));
        entries.extend((161..=165).map(|c| (c, 0.5)));
        entries.extend((181..=189).map(|c| (c, 0.5)));
        entries.extend((201..=204).map(|c| (c, 0.5)));
        Self::from_entries(entries)
    }

    /// Build a custom table; unlisted codes have base risk 0
    pub fn from_entries(entries: impl IntoIterator<Item = (i32, f32)>) -> Self {
        Self {
            base: entries.into_iter().collect(),
        }
    }

    /// Base risk of a code, never negative
    pub fn base_risk(&self, code: i32) -> f32 {
        self.base.get(&code).map_or(0.0, |&b| b.max(0.0))
    }

    /// Index of one cell under `scenario`
    pub fn index(&self, code: i32, slope_percent: f32, scenario: &WeatherScenario) -> f32 {
        let slope = if slope_percent.is_finite() {
            slope_percent.max(0.0)
        } else {
            0.0
        };
        let slope_factor = 1.0 + slope / 100.0 * INDEX_SLOPE_GAIN;
        let wind_factor = 1.0 + scenario.wind_speed.value().max(0.0) / INDEX_WIND_REFERENCE;
        let moisture_factor =
            (1.0 - *scenario.fuel_moisture / INDEX_MOISTURE_REFERENCE).max(INDEX_MOISTURE_FLOOR);
        (self.base_risk(code) * slope_factor * wind_factor * moisture_factor).clamp(0.0, 1.0)
    }

    /// Index and zones for a landscape
    ///
    /// # Errors
    /// `MissingRasterLayer` if a layer is absent, `ShapeMismatch` if the
    /// layers disagree in shape
    pub fn evaluate(
        &self,
        landscape: &Landscape,
        scenario: &WeatherScenario,
    ) -> FireResult<RiskIndexField> {
        let fuel = landscape.fuel()?;
        let slope = landscape.slope()?;
        fuel.check_same_shape(slope)?;

        let index = zip_layers(fuel, slope, |code, s| {
            let s = if slope.is_nodata(s) { 0.0 } else { s };
            self.index(code, s, scenario)
        })?;
        let zones = RasterGrid::new(
            fuel.rows(),
            fuel.cols(),
            fuel.data()
                .iter()
                .zip(index.data())
                .map(|(&code, &i)| (!fuel.is_nodata(code)).then(|| RiskLevel::from_index(i)))
                .collect(),
            *fuel.transform(),
            None,
        )?;

        let zoning = RiskZoning::from_zones(zones);
        log_summary(&format!("Risk index for '{}'", scenario.name), &zoning.summary);
        Ok(RiskIndexField { index, zoning })
    }
}

impl Default for RiskIndex {
    fn default() -> Self {
        Self::fbfm40_groups()
    }
}

/// Per-cell combination of fuel and slope; fuel nodata maps to `T::default()`
fn zip_layers<T, F>(
    fuel: &RasterGrid<i32>,
    slope: &RasterGrid<f32>,
    f: F,
) -> FireResult<RasterGrid<T>>
where
    T: Copy + PartialEq + Default + Send,
    F: Fn(i32, f32) -> T + Sync,
{
    let data: Vec<T> = fuel
        .data()
        .par_iter()
        .zip(slope.data().par_iter())
        .map(|(&code, &s)| if fuel.is_nodata(code) { T::default() } else { f(code, s) })
        .collect();
    RasterGrid::new(fuel.rows(), fuel.cols(), data, *fuel.transform(), None)
}

fn log_summary(label: &str, summary: &RiskSummary) {
    info!(
        "{}: {} valid cells, Low {:.1}%, Moderate {:.1}%, High {:.1}%, Extreme {:.1}%",
        label,
        summary.valid_cells,
        summary.percent(RiskLevel::Low),
        summary.percent(RiskLevel::Moderate),
        summary.percent(RiskLevel::High),
        summary.percent(RiskLevel::Extreme)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::{Degrees, Fahrenheit, MilesPerHour};
    use crate::error::FireSpreadError;
    use approx::assert_relative_eq;

    fn weather(wind: f32, moisture: f32) -> WeatherScenario {
        WeatherScenario::new(
            "test",
            MilesPerHour::new(wind),
            Degrees::new(0.0),
            Percent::new(moisture),
            Fahrenheit::new(80.0),
            Percent::new(20.0),
        )
    }

    #[test]
    fn test_fbfm40_hazard_classes() {
        let table = HazardTable::landfire_fbfm40();
        assert_eq!(table.hazard(105), Some(FuelHazard::High));
        assert_eq!(table.hazard(145), Some(FuelHazard::High));
        assert_eq!(table.hazard(165), Some(FuelHazard::High));
        assert_eq!(table.hazard(102), Some(FuelHazard::Moderate));
        assert_eq!(table.hazard(183), Some(FuelHazard::Moderate));
        assert_eq!(table.hazard(101), None);
        assert_eq!(table.hazard(144), Some(FuelHazard::Moderate));
        assert_eq!(table.hazard(98), None);
        assert_eq!(table.steep_slope(), DEFAULT_STEEP_SLOPE);
    }

    #[test]
    fn test_classify_at_steep_slope_boundary() {
        let table = HazardTable::landfire_fbfm40();

        // Exactly 30% is not steep
        assert_eq!(table.classify(145, 30.0), RiskLevel::High);
        assert_eq!(table.classify(145, 30.5), RiskLevel::Extreme);
        assert_eq!(table.classify(183, 30.0), RiskLevel::Moderate);
        assert_eq!(table.classify(183, 30.5), RiskLevel::High);
        assert_eq!(table.classify(101, 80.0), RiskLevel::Low);
        assert_eq!(table.classify(145, f32::NAN), RiskLevel::High);

        let gentle = table.with_steep_slope(Percent::new(10.0));
        assert_eq!(gentle.classify(183, 15.0), RiskLevel::High);
    }

    #[test]
    fn test_zoning_skips_fuel_nodata() {
        let table = HazardTable::landfire_fbfm40();
        let fuel = RasterGrid::from_rows(&[vec![145, 145, -9999], vec![183, 101, -9999]])
            .unwrap()
            .with_nodata(Some(-9999));
        let slope = RasterGrid::from_rows(&[vec![40.0, 5.0, 90.0], vec![40.0, 40.0, 90.0]])
            .unwrap();

        let zoning = table.zone_layers(&fuel, &slope).unwrap();
        assert_eq!(zoning.zones.get(0, 0), Some(Some(RiskLevel::Extreme)));
        assert_eq!(zoning.zones.get(0, 1), Some(Some(RiskLevel::High)));
        assert_eq!(zoning.zones.get(0, 2), Some(None));
        assert_eq!(zoning.zones.get(1, 0), Some(Some(RiskLevel::High)));
        assert_eq!(zoning.zones.get(1, 1), Some(Some(RiskLevel::Low)));

        let summary = &zoning.summary;
        assert_eq!(summary.total_cells, 6);
        assert_eq!(summary.valid_cells, 4);
        assert_eq!(summary.counts, [1, 0, 2, 1]);
        assert_eq!(summary.at_least(RiskLevel::High), 3);
        assert_relative_eq!(summary.percent(RiskLevel::High), 50.0);
        assert_relative_eq!(summary.percent(RiskLevel::Extreme), 25.0);
    }

    #[test]
    fn test_slope_nodata_is_not_steep() {
        let table = HazardTable::landfire_fbfm40();
        let fuel = RasterGrid::from_rows(&[vec![145]]).unwrap();
        let slope = RasterGrid::from_rows(&[vec![-9999.0_f32]])
            .unwrap()
            .with_nodata(Some(-9999.0));
        let zoning = table.zone_layers(&fuel, &slope).unwrap();
        assert_eq!(zoning.zones.data(), &[Some(RiskLevel::High)]);
    }

    #[test]
    fn test_all_nodata_summary() {
        let fuel = RasterGrid::filled(2, 2, -9999).with_nodata(Some(-9999));
        let slope = RasterGrid::filled(2, 2, 10.0_f32);
        let zoning = HazardTable::default().zone_layers(&fuel, &slope).unwrap();
        assert_eq!(zoning.summary.valid_cells, 0);
        assert_eq!(zoning.summary.percent(RiskLevel::Low), 0.0);
    }

    #[test]
    fn test_index_bands() {
        assert_eq!(RiskLevel::from_index(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_index(0.29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_index(0.3), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_index(0.6), RiskLevel::High);
        assert_eq!(RiskLevel::from_index(0.79), RiskLevel::High);
        assert_eq!(RiskLevel::from_index(0.8), RiskLevel::Extreme);
        assert_eq!(RiskLevel::from_index(1.0), RiskLevel::Extreme);
    }

    #[test]
    fn test_index_factors() {
        let index = RiskIndex::fbfm40_groups();

        // Calm, bone dry, flat grass is the base risk
        assert_relative_eq!(index.index(102, 0.0, &weather(0.0, 0.0)), 0.6);
        // 100% slope adds half, 20 mph wind doubles
        assert_relative_eq!(index.index(183, 100.0, &weather(20.0, 0.0)), 1.0);
        assert_relative_eq!(index.index(183, 100.0, &weather(0.0, 0.0)), 0.75);
        // Moisture factor floors at 0.3
        assert_relative_eq!(index.index(102, 0.0, &weather(0.0, 18.0)), 0.6 * 0.3, epsilon = 1e-6);
        assert_relative_eq!(index.index(102, 0.0, &weather(0.0, 30.0)), 0.6 * 0.3, epsilon = 1e-6);
        // Clipped to 1
        assert_eq!(index.index(145, 40.0, &weather(40.0, 3.0)), 1.0);
        // Unlisted code
        assert_eq!(index.index(98, 50.0, &weather(40.0, 3.0)), 0.0);
    }

    #[test]
    fn test_index_evaluate_over_landscape() {
        let fuel = RasterGrid::from_rows(&[vec![102, 145, 183, -9999]])
            .unwrap()
            .with_nodata(Some(-9999));
        let slope = RasterGrid::filled(1, 4, 0.0_f32);
        let landscape = Landscape::from_layers(fuel, slope);

        let field = RiskIndex::default()
            .evaluate(&landscape, &weather(0.0, 0.0))
            .unwrap();
        assert_eq!(field.index.data(), &[0.6, 0.8, 0.5, 0.0]);
        assert_eq!(
            field.zoning.zones.data(),
            &[
                Some(RiskLevel::High),
                Some(RiskLevel::Extreme),
                Some(RiskLevel::Moderate),
                None
            ]
        );
        assert_eq!(field.zoning.summary.valid_cells, 3);
    }

    #[test]
    fn test_missing_layer_and_shape_mismatch() {
        let index = RiskIndex::default();
        let fuel_only = Landscape::new().with_fuel(RasterGrid::filled(2, 2, 102));
        assert!(matches!(
            index.evaluate(&fuel_only, &weather(10.0, 5.0)),
            Err(FireSpreadError::MissingRasterLayer { .. })
        ));

        let mismatched =
            Landscape::from_layers(RasterGrid::filled(2, 2, 102), RasterGrid::filled(2, 3, 0.0));
        assert!(matches!(
            HazardTable::default().zone(&mismatched),
            Err(FireSpreadError::ShapeMismatch { .. })
        ));
    }
}
