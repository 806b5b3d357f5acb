//! Per-cell rate of spread rasters
//!
//! `RateFieldBuilder` turns a fuel code raster, a slope raster and a weather
//! scenario into a `RateField` (feet per minute, 0 = non-burnable) ready for
//! the spread simulator.
//!
//! # Aggregation
//!
//! By default the point model runs once per distinct fuel code, using the mean
//! slope of every cell carrying that code, and the result is broadcast to all
//! of those cells. Slope variation inside a fuel class is ignored.
//! `SlopeAggregation::PerCell` evaluates every cell with its own slope.

use crate::analysis::FieldStatistics;
use crate::core_types::fuel::FuelModelCatalog;
use crate::core_types::units::{Acres, Feet, FeetPerMinute, Percent};
use crate::core_types::weather::WeatherScenario;
use crate::error::{FireResult, FireSpreadError};
use crate::grid::fuel_loader::{FuelAssignment, FuelCodeMapper};
use crate::grid::raster::{GeoTransform, Landscape, RasterGrid};
use crate::physics::rothermel::{RateOfSpreadModel, SpreadConditions};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Granularity at which slope feeds the point model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlopeAggregation {
    /// One evaluation per fuel code with the class-average slope
    #[default]
    PerFuelClass,
    /// One evaluation per cell with that cell's slope
    PerCell,
}

/// Rate of spread raster in feet per minute
///
/// Every value is either exactly 0 (non-burnable) or positive and finite.
#[derive(Debug, Clone, PartialEq)]
pub struct RateField {
    grid: RasterGrid<f32>,
}

impl RateField {
    /// Wrap a rate raster, validating every cell
    ///
    /// # Errors
    /// Returns `InvalidParameter` if any value is negative or not finite
    pub fn new(grid: RasterGrid<f32>) -> FireResult<Self> {
        if let Some(bad) = grid.data().iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(FireSpreadError::invalid(
                "rate_field",
                format!("rates must be 0 or positive and finite, got {bad}"),
            ));
        }
        Ok(Self {
            grid: grid.with_nodata(None),
        })
    }

    /// Build from nested rows of ft/min values
    ///
    /// # Errors
    /// Returns `ShapeMismatch` for ragged rows or `InvalidParameter` for bad values
    pub fn from_rows(rows: &[Vec<f32>]) -> FireResult<Self> {
        Self::new(RasterGrid::from_rows(rows)?)
    }

    /// Field with the same rate in every cell
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `rate` is negative or not finite
    pub fn uniform(rows: usize, cols: usize, rate: FeetPerMinute) -> FireResult<Self> {
        Self::new(RasterGrid::filled(rows, cols, *rate))
    }

    /// Rate at (row, col); 0 outside the grid
    #[inline]
    pub fn rate(&self, row: usize, col: usize) -> FeetPerMinute {
        FeetPerMinute::new(self.grid.get(row, col).unwrap_or(0.0))
    }

    /// Whether (row, col) lies inside the grid and can burn
    #[inline]
    pub fn is_burnable(&self, row: usize, col: usize) -> bool {
        self.grid.get(row, col).is_some_and(|r| r > 0.0)
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// (rows, cols)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.grid.shape()
    }

    /// Row-major rates in ft/min
    #[inline]
    pub fn values(&self) -> &[f32] {
        self.grid.data()
    }

    /// Underlying raster (carries the source geotransform)
    pub fn grid(&self) -> &RasterGrid<f32> {
        &self.grid
    }

    /// Number of burnable cells
    pub fn burnable_cells(&self) -> usize {
        self.values().iter().filter(|&&r| r > 0.0).count()
    }
}

/// Per-cell fire behavior layers for one scenario
#[derive(Debug, Clone)]
pub struct BehaviorFields {
    /// Rate of spread in ft/min (input to the simulator)
    pub rate_field: RateField,
    /// Rate of spread in chains per hour
    pub rate_of_spread: RasterGrid<f32>,
    /// Flame length in feet
    pub flame_length: RasterGrid<f32>,
    /// Fireline intensity in BTU/ft/s
    pub fireline_intensity: RasterGrid<f32>,
    /// Scenario these layers were computed for
    pub scenario: WeatherScenario,
}

impl BehaviorFields {
    /// Summary statistics over burnable cells
    pub fn statistics(&self, cell_size: Feet) -> BehaviorStatistics {
        let burnable = self.rate_field.burnable_cells();
        BehaviorStatistics {
            scenario: self.scenario.clone(),
            rate_of_spread: FieldStatistics::over_positive(self.rate_of_spread.data()),
            flame_length: FieldStatistics::over_positive(self.flame_length.data()),
            fireline_intensity: FieldStatistics::over_positive(self.fireline_intensity.data()),
            burnable_cells: burnable,
            burnable_area: cell_size.square_acres() * burnable as f32,
        }
    }
}

/// Scenario-level summary of a `BehaviorFields`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorStatistics {
    /// Scenario the statistics describe
    pub scenario: WeatherScenario,
    /// Rate of spread (ch/h) over burnable cells
    pub rate_of_spread: Option<FieldStatistics>,
    /// Flame length (ft) over burnable cells
    pub flame_length: Option<FieldStatistics>,
    /// Fireline intensity (BTU/ft/s) over burnable cells
    pub fireline_intensity: Option<FieldStatistics>,
    /// Count of burnable cells
    pub burnable_cells: usize,
    /// Burnable area
    pub burnable_area: Acres,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CellBehavior {
    rate_fpm: f32,
    rate_chph: f32,
    flame_length: f32,
    intensity: f32,
}

impl CellBehavior {
    const NON_BURNABLE: CellBehavior = CellBehavior {
        rate_fpm: 0.0,
        rate_chph: 0.0,
        flame_length: 0.0,
        intensity: 0.0,
    };
}

#[derive(Debug, Default)]
struct ClassAccumulator {
    cells: usize,
    slope_sum: f64,
    slope_samples: usize,
}

/// Builds rate fields from fuel and slope rasters
#[derive(Debug, Clone, Copy)]
pub struct RateFieldBuilder<'a> {
    model: RateOfSpreadModel<'a>,
    mapper: &'a FuelCodeMapper,
    aggregation: SlopeAggregation,
}

impl<'a> RateFieldBuilder<'a> {
    /// Builder using the per-fuel-class aggregation
    pub fn new(catalog: &'a FuelModelCatalog, mapper: &'a FuelCodeMapper) -> Self {
        Self {
            model: RateOfSpreadModel::new(catalog),
            mapper,
            aggregation: SlopeAggregation::default(),
        }
    }

    /// Choose the slope aggregation granularity
    pub fn with_aggregation(mut self, aggregation: SlopeAggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Current aggregation mode
    pub fn aggregation(&self) -> SlopeAggregation {
        self.aggregation
    }

    /// Build the rate field for a landscape
    ///
    /// # Errors
    /// - `MissingRasterLayer` if the fuel or slope layer is absent
    /// - `ShapeMismatch` if the layers disagree in shape
    /// - `UnknownFuelModel` if the mapper names a model the catalog lacks
    pub fn build(&self, landscape: &Landscape, scenario: &WeatherScenario) -> FireResult<RateField> {
        self.build_from_layers(landscape.fuel()?, landscape.slope()?, scenario)
    }

    /// Build the rate field from explicit layers
    ///
    /// # Errors
    /// Same as [`RateFieldBuilder::build`], minus the missing-layer case
    pub fn build_from_layers(
        &self,
        fuel: &RasterGrid<i32>,
        slope: &RasterGrid<f32>,
        scenario: &WeatherScenario,
    ) -> FireResult<RateField> {
        let cells = self.evaluate(fuel, slope, scenario)?;
        let data = cells.iter().map(|c| c.rate_fpm).collect();
        let field = RateField::new(assemble(fuel, data, *fuel.transform())?)?;

        info!(
            "Rate field built for '{}': {}x{} grid, {} burnable cells",
            scenario.name,
            field.rows(),
            field.cols(),
            field.burnable_cells()
        );
        Ok(field)
    }

    /// Build the rate field plus flame length and intensity layers
    ///
    /// # Errors
    /// Same as [`RateFieldBuilder::build`]
    pub fn build_behavior(
        &self,
        landscape: &Landscape,
        scenario: &WeatherScenario,
    ) -> FireResult<BehaviorFields> {
        let fuel = landscape.fuel()?;
        let slope = landscape.slope()?;
        let cells = self.evaluate(fuel, slope, scenario)?;
        let transform = *fuel.transform();
        let layer = |values: Vec<f32>| assemble(fuel, values, transform);

        let fields = BehaviorFields {
            rate_field: RateField::new(layer(cells.iter().map(|c| c.rate_fpm).collect())?)?,
            rate_of_spread: layer(cells.iter().map(|c| c.rate_chph).collect())?,
            flame_length: layer(cells.iter().map(|c| c.flame_length).collect())?,
            fireline_intensity: layer(cells.iter().map(|c| c.intensity).collect())?,
            scenario: scenario.clone(),
        };
        debug!(
            "Behavior layers built for '{}': {} burnable cells",
            scenario.name,
            fields.rate_field.burnable_cells()
        );
        Ok(fields)
    }

    fn evaluate(
        &self,
        fuel: &RasterGrid<i32>,
        slope: &RasterGrid<f32>,
        scenario: &WeatherScenario,
    ) -> FireResult<Vec<CellBehavior>> {
        fuel.check_same_shape(slope)?;
        match self.aggregation {
            SlopeAggregation::PerFuelClass => self.evaluate_per_class(fuel, slope, scenario),
            SlopeAggregation::PerCell => self.evaluate_per_cell(fuel, slope, scenario),
        }
    }

    fn evaluate_per_class(
        &self,
        fuel: &RasterGrid<i32>,
        slope: &RasterGrid<f32>,
        scenario: &WeatherScenario,
    ) -> FireResult<Vec<CellBehavior>> {
        // Accumulate slope per distinct fuel code
        let mut classes: FxHashMap<i32, ClassAccumulator> = FxHashMap::default();
        for (&code, &s) in fuel.data().iter().zip(slope.data()) {
            if fuel.is_nodata(code) {
                continue;
            }
            let acc = classes.entry(code).or_default();
            acc.cells += 1;
            if is_valid_slope(slope, s) {
                acc.slope_sum += f64::from(s);
                acc.slope_samples += 1;
            }
        }

        let mut codes: Vec<i32> = classes.keys().copied().collect();
        codes.sort_unstable();
        debug!("Processing {} distinct fuel codes", codes.len());

        let mut behavior: FxHashMap<i32, CellBehavior> = FxHashMap::default();
        for code in codes {
            let acc = &classes[&code];
            let model_code = match self.mapper.resolve(code) {
                FuelAssignment::Model(m) => m,
                FuelAssignment::NonBurnable => {
                    debug!("Fuel code {} is non-burnable ({} cells)", code, acc.cells);
                    behavior.insert(code, CellBehavior::NON_BURNABLE);
                    continue;
                }
            };

            let avg_slope = if acc.slope_samples > 0 {
                (acc.slope_sum / acc.slope_samples as f64) as f32
            } else {
                warn!(
                    "Fuel code {} has no valid slope samples, assuming flat terrain",
                    code
                );
                0.0
            };

            let cell = self.point_behavior(model_code, avg_slope, scenario)?;
            debug!(
                "Fuel code {} -> {}: avg slope {:.1}%, ROS {:.2} ft/min ({} cells)",
                code, model_code, avg_slope, cell.rate_fpm, acc.cells
            );
            behavior.insert(code, cell);
        }

        Ok(fuel
            .data()
            .iter()
            .map(|&code| {
                if fuel.is_nodata(code) {
                    CellBehavior::NON_BURNABLE
                } else {
                    behavior
                        .get(&code)
                        .copied()
                        .unwrap_or(CellBehavior::NON_BURNABLE)
                }
            })
            .collect())
    }

    fn evaluate_per_cell(
        &self,
        fuel: &RasterGrid<i32>,
        slope: &RasterGrid<f32>,
        scenario: &WeatherScenario,
    ) -> FireResult<Vec<CellBehavior>> {
        fuel.data()
            .par_iter()
            .zip(slope.data().par_iter())
            .map(|(&code, &s)| {
                if fuel.is_nodata(code) {
                    return Ok(CellBehavior::NON_BURNABLE);
                }
                match self.mapper.resolve(code) {
                    FuelAssignment::Model(m) => {
                        let s = if is_valid_slope(slope, s) { s } else { 0.0 };
                        self.point_behavior(m, s, scenario)
                    }
                    FuelAssignment::NonBurnable => Ok(CellBehavior::NON_BURNABLE),
                }
            })
            .collect()
    }

    fn point_behavior(
        &self,
        model_code: &str,
        slope_percent: f32,
        scenario: &WeatherScenario,
    ) -> FireResult<CellBehavior> {
        let conditions = SpreadConditions::new(
            scenario.wind_speed,
            Percent::new(slope_percent),
            scenario.fuel_moisture,
        )
        .with_temperature(scenario.temperature)
        .with_humidity(scenario.relative_humidity);

        let result = self.model.calculate(model_code, &conditions)?;
        let rate_fpm = *result.rate_of_spread_fpm;

        // Degenerate inputs (steep negative slope, NaN weather) must not leak
        // negative or non-finite rates into the field
        if !(rate_fpm.is_finite() && rate_fpm > 0.0) {
            return Ok(CellBehavior::NON_BURNABLE);
        }
        Ok(CellBehavior {
            rate_fpm,
            rate_chph: *result.rate_of_spread,
            flame_length: *result.flame_length,
            intensity: *result.fireline_intensity,
        })
    }
}

fn is_valid_slope(slope: &RasterGrid<f32>, value: f32) -> bool {
    value.is_finite() && !slope.is_nodata(value)
}

fn assemble(
    like: &RasterGrid<i32>,
    data: Vec<f32>,
    transform: GeoTransform,
) -> FireResult<RasterGrid<f32>> {
    RasterGrid::new(like.rows(), like.cols(), data, transform, None)
}
