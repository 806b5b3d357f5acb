//! Multi-ignition risk analysis
//!
//! Simulates one fire per point of a regular lat/lon grid over a shared rate
//! field and classifies each point by the area it burns. Points run in
//! parallel; each simulation owns its arrival grid.
//!
//! Burned area here is the spread extent: cells reached after ignition, with
//! the ignition cell itself left out. A point with no burnable cell within the
//! search radius still reports, as an unignited 0-acre result.

use crate::analysis::stats::{ArrivalSummary, IsochroneBands, DEFAULT_ISOCHRONE_EDGES};
use crate::core_types::units::{Acres, Feet, Hours};
use crate::error::{FireResult, FireSpreadError};
use crate::grid::rate_field::RateField;
use crate::grid::raster::GeoBounds;
use crate::grid::transform::CoordinateTransform;
use crate::solver::spread::SpreadSimulator;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Width of a 30 m LANDFIRE cell in feet
pub const LANDFIRE_CELL_SIZE: Feet = Feet::new(98.4);

/// Default simulated duration for grid analysis
pub const DEFAULT_ANALYSIS_DURATION: Hours = Hours::new(12.0);

/// Qualitative risk from burned area
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Under 50 acres
    Low,
    /// 50 to 200 acres
    Moderate,
    /// 200 to 500 acres
    High,
    /// 500 acres or more
    Extreme,
}

impl RiskLevel {
    /// Classify a burned area
    pub fn from_area(area: Acres) -> Self {
        if area < 50.0 {
            Self::Low
        } else if area < 200.0 {
            Self::Moderate
        } else if area < 500.0 {
            Self::High
        } else {
            Self::Extreme
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Extreme => "Extreme",
        };
        f.write_str(label)
    }
}

/// `n` × `n` evenly spaced (lat, lon) points spanning `bounds`, both ends included
///
/// Points are ordered by latitude, then longitude. A single point sits on the
/// bottom-left corner.
pub fn generate_grid_points(bounds: &GeoBounds, n: usize) -> Vec<(f64, f64)> {
    let lats = linspace(bounds.bottom, bounds.top, n);
    let lons = linspace(bounds.left, bounds.right, n);
    lats.iter()
        .flat_map(|&lat| lons.iter().map(move |&lon| (lat, lon)))
        .collect()
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Outcome for one analyzed ignition point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPointResult {
    /// Position of the point in the input list
    pub index: usize,
    /// Requested (lat, lon)
    pub requested: (f64, f64),
    /// (lat, lon) of the cell actually ignited
    pub actual: (f64, f64),
    /// Cell actually ignited, or the requested cell when nothing could burn
    pub cell: (usize, usize),
    /// Whether a burnable cell was found within the search radius
    pub ignited: bool,
    /// Burned extent
    pub summary: ArrivalSummary,
    /// Arrival time histogram
    pub isochrones: IsochroneBands,
    /// Risk class from the spread area
    pub risk: RiskLevel,
}

impl GridPointResult {
    /// Area reached after ignition
    pub fn burned_area(&self) -> Acres {
        self.summary.spread_area
    }
}

/// Aggregate over all analyzed points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAnalysisSummary {
    /// Points inside the raster, unignited points included
    pub points_analyzed: usize,
    /// Points with no burnable cell within the search radius
    pub points_unignited: usize,
    /// Mean spread area over all analyzed points (unignited count as 0)
    pub mean_burned_area: Acres,
    /// Largest spread area of any point
    pub max_burned_area: Acres,
    /// Point count per risk level, lowest first
    pub risk_counts: [usize; 4],
}

impl GridAnalysisSummary {
    /// Summarize results; `None` if there are none
    pub fn from_results(results: &[GridPointResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }
        let areas = results.iter().map(GridPointResult::burned_area);
        let total: f32 = areas.clone().map(|a| *a).sum();
        let mut risk_counts = [0; 4];
        for r in results {
            risk_counts[r.risk as usize] += 1;
        }
        Some(Self {
            points_analyzed: results.len(),
            points_unignited: results.iter().filter(|r| !r.ignited).count(),
            mean_burned_area: Acres::new(total / results.len() as f32),
            max_burned_area: areas.max().unwrap_or(Acres::ZERO),
            risk_counts,
        })
    }
}

/// Runs one spread simulation per ignition point over a shared rate field
#[derive(Debug, Clone)]
pub struct GridAnalysis<'a> {
    field: &'a RateField,
    transform: CoordinateTransform,
    simulator: SpreadSimulator,
    duration: Hours,
    cell_size: Feet,
}

impl<'a> GridAnalysis<'a> {
    /// Analysis over `field`, with points placed through its geotransform
    ///
    /// # Errors
    /// Returns `DegenerateTransform` if the field's geotransform is singular
    pub fn new(field: &'a RateField) -> FireResult<Self> {
        Ok(Self {
            field,
            transform: CoordinateTransform::for_raster(field.grid())?,
            simulator: SpreadSimulator::default(),
            duration: DEFAULT_ANALYSIS_DURATION,
            cell_size: LANDFIRE_CELL_SIZE,
        })
    }

    /// Use a specific simulator configuration
    pub fn with_simulator(mut self, simulator: SpreadSimulator) -> Self {
        self.simulator = simulator;
        self
    }

    /// Set the simulated duration
    pub fn with_duration(mut self, duration: Hours) -> Self {
        self.duration = duration;
        self
    }

    /// Set the physical cell width
    pub fn with_cell_size(mut self, cell_size: Feet) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Simulate every point in parallel
    ///
    /// Points outside the raster are skipped. Points with no burnable cell
    /// within the search radius are kept as unignited 0-acre results. Results
    /// keep input order.
    ///
    /// # Errors
    /// Any other simulation error (invalid duration or cell size) aborts the run
    pub fn run(&self, points: &[(f64, f64)]) -> FireResult<Vec<GridPointResult>> {
        info!(
            "Grid analysis: {} ignition points, {} over {}x{} cells",
            points.len(),
            self.duration,
            self.field.rows(),
            self.field.cols()
        );

        let results: Vec<Option<GridPointResult>> = points
            .par_iter()
            .enumerate()
            .map(|(index, &point)| self.analyze_point(index, point))
            .collect::<FireResult<_>>()?;

        let results: Vec<GridPointResult> = results.into_iter().flatten().collect();
        info!(
            "Grid analysis complete: {} of {} points produced results",
            results.len(),
            points.len()
        );
        Ok(results)
    }

    fn analyze_point(&self, index: usize, (lat, lon): (f64, f64)) -> FireResult<Option<GridPointResult>> {
        let (row, col) = self.transform.to_grid(lat, lon);
        let outcome = match self.simulator.simulate(self.field, row, col, self.duration, self.cell_size) {
            Ok(outcome) => outcome,
            Err(FireSpreadError::OutOfBounds { .. }) => {
                debug!("Point {} ({:.4}, {:.4}) is outside the raster", index, lat, lon);
                return Ok(None);
            }
            Err(FireSpreadError::NoBurnableIgnition { row, col, .. }) => {
                debug!("Point {} ({:.4}, {:.4}) has no burnable fuel nearby", index, lat, lon);
                return Ok(Some(GridPointResult {
                    index,
                    requested: (lat, lon),
                    actual: (lat, lon),
                    cell: (row, col),
                    ignited: false,
                    summary: ArrivalSummary::empty(),
                    isochrones: IsochroneBands::empty(&DEFAULT_ISOCHRONE_EDGES),
                    risk: RiskLevel::Low,
                }));
            }
            Err(e) => return Err(e),
        };

        let (ar, ac) = outcome.ignition.actual;
        let summary = ArrivalSummary::from_grid(&outcome.arrival, self.cell_size);
        let risk = RiskLevel::from_area(summary.spread_area);
        debug!(
            "Point {}: {} burned, {} risk",
            index, summary.spread_area, risk
        );

        Ok(Some(GridPointResult {
            index,
            requested: (lat, lon),
            actual: self.transform.to_geo(ar as i64, ac as i64),
            cell: (ar, ac),
            ignited: true,
            isochrones: IsochroneBands::with_default_edges(&outcome.arrival),
            summary,
            risk,
        }))
    }
}
