//! Summary statistics over behavior rasters and arrival grids

use crate::core_types::units::{Acres, Feet, Hours};
use crate::solver::arrival::{ArrivalTimeGrid, CellState};
use serde::{Deserialize, Serialize};

/// Isochrone band edges in hours
pub const DEFAULT_ISOCHRONE_EDGES: [f32; 8] = [0.0, 1.0, 3.0, 6.0, 12.0, 24.0, 48.0, 72.0];

/// Mean, extremes and population standard deviation of a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStatistics {
    /// Number of samples
    pub count: usize,
    /// Arithmetic mean
    pub mean: f32,
    /// Largest sample
    pub max: f32,
    /// Smallest sample
    pub min: f32,
    /// Population standard deviation
    pub std: f32,
}

impl FieldStatistics {
    /// Statistics over an arbitrary sample, `None` if it is empty
    pub fn from_values(values: impl IntoIterator<Item = f32>) -> Option<Self> {
        let mut count = 0_usize;
        let mut sum = 0.0_f64;
        let mut sum_sq = 0.0_f64;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;

        for v in values {
            count += 1;
            sum += f64::from(v);
            sum_sq += f64::from(v) * f64::from(v);
            min = min.min(v);
            max = max.max(v);
        }
        if count == 0 {
            return None;
        }

        let n = count as f64;
        let mean = sum / n;
        let variance = (sum_sq / n - mean * mean).max(0.0);
        Some(Self {
            count,
            mean: mean as f32,
            max,
            min,
            std: variance.sqrt() as f32,
        })
    }

    /// Statistics over the strictly positive (burnable) cells of a layer
    pub fn over_positive(values: &[f32]) -> Option<Self> {
        Self::from_values(values.iter().copied().filter(|&v| v > 0.0))
    }
}

/// Burned extent of one spread run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalSummary {
    /// Cells reached, ignition included
    pub burned_cells: usize,
    /// Area of the reached cells
    pub burned_area: Acres,
    /// Cells reached after ignition (arrival time above zero)
    pub spread_cells: usize,
    /// Area of the cells reached after ignition
    pub spread_area: Acres,
    /// Latest arrival time
    pub max_arrival: Option<Hours>,
    /// Arrival time statistics over cells reached after ignition
    pub arrival: Option<FieldStatistics>,
}

impl ArrivalSummary {
    /// Summary of a run that never ignited
    pub fn empty() -> Self {
        Self {
            burned_cells: 0,
            burned_area: Acres::ZERO,
            spread_cells: 0,
            spread_area: Acres::ZERO,
            max_arrival: None,
            arrival: None,
        }
    }

    /// Summarize an arrival grid
    pub fn from_grid(grid: &ArrivalTimeGrid, cell_size: Feet) -> Self {
        let cell_area = cell_size.square_acres();
        let burned_cells = grid.burned_cell_count();
        let arrival = FieldStatistics::from_values(grid.states().iter().filter_map(|s| match s {
            CellState::Burning(t) => Some(**t),
            _ => None,
        }));
        let spread_cells = arrival.map_or(0, |a| a.count);
        Self {
            burned_cells,
            burned_area: cell_area * burned_cells as f32,
            spread_cells,
            spread_area: cell_area * spread_cells as f32,
            max_arrival: grid.max_time(),
            arrival,
        }
    }
}

/// Area reached no later than `threshold`, ignition included
pub fn area_within(grid: &ArrivalTimeGrid, threshold: Hours, cell_size: Feet) -> Acres {
    let cells = grid.arrival_times().filter(|&t| t <= threshold).count();
    cell_size.square_acres() * cells as f32
}

/// Histogram of arrival times over half-open bands `(lo, hi]`
///
/// The ignition cell (time 0) falls in no band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochroneBands {
    /// Band edges in hours, ascending
    pub edges: Vec<f32>,
    /// Cell count per band; `counts[i]` covers `(edges[i], edges[i + 1]]`
    pub counts: Vec<usize>,
}

impl IsochroneBands {
    /// Bucket a grid with the default 0-1-3-6-12-24-48-72 h edges
    pub fn with_default_edges(grid: &ArrivalTimeGrid) -> Self {
        Self::compute(grid, &DEFAULT_ISOCHRONE_EDGES)
    }

    /// Bands with every count at zero
    pub fn empty(edges: &[f32]) -> Self {
        Self {
            edges: edges.to_vec(),
            counts: vec![0; edges.len().saturating_sub(1)],
        }
    }

    /// Bucket a grid with custom ascending edges
    pub fn compute(grid: &ArrivalTimeGrid, edges: &[f32]) -> Self {
        let mut bands = Self::empty(edges);
        for state in grid.states() {
            if let CellState::Burning(t) = state {
                if let Some(i) = bands.band_of(*t) {
                    bands.counts[i] += 1;
                }
            }
        }
        bands
    }

    /// Band index containing `time`, if any
    pub fn band_of(&self, time: Hours) -> Option<usize> {
        self.edges
            .windows(2)
            .position(|w| time > w[0] && time <= w[1])
    }

    /// Cells covered by all bands
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}
