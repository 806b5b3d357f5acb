//! Time-of-arrival grid
//!
//! Each cell carries an explicit `CellState`, so "ignition" and "never
//! reached" stay distinguishable even though both read as 0 hours through
//! the numeric view returned by `values()`.

use crate::core_types::units::Hours;
use crate::grid::raster::{GeoTransform, RasterGrid};
use serde::{Deserialize, Serialize};

/// Per-cell state of a spread run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CellState {
    /// Fire never reached the cell within the duration
    #[default]
    Unreached,
    /// The (possibly relocated) ignition cell; arrival time 0
    Ignition,
    /// Reached by the front at the given elapsed time
    Burning(Hours),
}

impl CellState {
    /// Arrival time, or `None` if unreached
    #[inline]
    pub fn time(&self) -> Option<Hours> {
        match self {
            CellState::Unreached => None,
            CellState::Ignition => Some(Hours::ZERO),
            CellState::Burning(t) => Some(*t),
        }
    }
}

/// Arrival times in hours for every cell of a rate field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalTimeGrid {
    states: Vec<CellState>,
    rows: usize,
    cols: usize,
}

impl ArrivalTimeGrid {
    /// Grid with every cell unreached
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            states: vec![CellState::Unreached; rows * cols],
            rows,
            cols,
        }
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// State of (row, col); `Unreached` outside the grid
    #[inline]
    pub fn state(&self, row: usize, col: usize) -> CellState {
        if row < self.rows && col < self.cols {
            self.states[row * self.cols + col]
        } else {
            CellState::Unreached
        }
    }

    /// Arrival time at (row, col), `None` if never reached
    #[inline]
    pub fn time_at(&self, row: usize, col: usize) -> Option<Hours> {
        self.state(row, col).time()
    }

    /// Whether the fire reached (row, col), ignition included
    #[inline]
    pub fn is_reached(&self, row: usize, col: usize) -> bool {
        self.state(row, col) != CellState::Unreached
    }

    /// Numeric arrival time with 0 for both ignition and unreached cells
    #[inline]
    pub fn value(&self, row: usize, col: usize) -> f32 {
        self.time_at(row, col).map_or(0.0, Hours::value)
    }

    /// Row-major numeric view (0 = ignition or unreached)
    pub fn values(&self) -> Vec<f32> {
        self.states
            .iter()
            .map(|s| s.time().map_or(0.0, Hours::value))
            .collect()
    }

    /// Row-major cell states
    pub fn states(&self) -> &[CellState] {
        &self.states
    }

    /// Arrival times of every reached cell, ignition included
    pub fn arrival_times(&self) -> impl Iterator<Item = Hours> + '_ {
        self.states.iter().filter_map(CellState::time)
    }

    /// Count of reached cells, ignition included
    pub fn burned_cell_count(&self) -> usize {
        self.arrival_times().count()
    }

    /// Latest arrival time, `None` if nothing burned
    pub fn max_time(&self) -> Option<Hours> {
        self.arrival_times().max()
    }

    /// Location of the ignition cell, if any
    pub fn ignition(&self) -> Option<(usize, usize)> {
        self.states
            .iter()
            .position(|s| *s == CellState::Ignition)
            .map(|i| (i / self.cols, i % self.cols))
    }

    /// Numeric view as a georeferenced raster
    pub fn to_raster(&self, transform: GeoTransform) -> RasterGrid<f32> {
        RasterGrid::from_fn(self.rows, self.cols, |row, col| self.value(row, col))
            .with_transform(transform)
    }

    pub(crate) fn set_ignition(&mut self, row: usize, col: usize) {
        self.states[row * self.cols + col] = CellState::Ignition;
    }

    pub(crate) fn set_arrival(&mut self, row: usize, col: usize, time: Hours) {
        self.states[row * self.cols + col] = CellState::Burning(time);
    }
}
