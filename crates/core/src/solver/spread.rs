//! Cellular fire spread over a rate field
//!
//! Huygens-style wave expansion on the 8-connected grid. Each burning cell
//! offers its arrival time to its neighbours; the travel time into a
//! neighbour uses the neighbour's own rate of spread:
//!
//! ```text
//! t_neighbour = t_cell + (d × cell_size / rate_neighbour) / 60
//! ```
//!
//! with d = 1 for orthogonal and √2 for diagonal neighbours, rates in ft/min
//! and times in hours. Cells whose candidate time exceeds the duration are not
//! reached.
//!
//! The expansion order is delegated to a `FrontQueue`. The default FIFO order
//! keeps the first time assigned to a cell, which is not a fastest-path
//! solution in heterogeneous fields; `TraversalOrder::ArrivalTime` gives the
//! shortest-arrival result.

use crate::core_types::units::{Feet, Hours};
use crate::error::{FireResult, FireSpreadError};
use crate::grid::rate_field::RateField;
use crate::solver::arrival::{ArrivalTimeGrid, CellState};
use crate::solver::cancel::CancelToken;
use crate::solver::config::SpreadConfig;
use crate::solver::create_front_queue;
use crate::solver::r#trait::{FrontEntry, FrontQueue};
use serde::{Deserialize, Serialize};
use std::f32::consts::SQRT_2;
use tracing::{debug, info, warn};

/// Neighbour offsets (row, col) and their distance in cell widths
const NEIGHBORS: [(i64, i64, f32); 8] = [
    (-1, -1, SQRT_2),
    (-1, 0, 1.0),
    (-1, 1, SQRT_2),
    (0, -1, 1.0),
    (0, 1, 1.0),
    (1, -1, SQRT_2),
    (1, 0, 1.0),
    (1, 1, SQRT_2),
];

/// Lower bound on time steps used for the safety ceiling
const MIN_CEILING_STEPS: usize = 8;

/// Ignition location and duration for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadRequest {
    /// Requested ignition row (may be outside the grid)
    pub row: i64,
    /// Requested ignition column (may be outside the grid)
    pub col: i64,
    /// Simulated duration
    pub duration: Hours,
    /// Physical width of one cell
    pub cell_size: Feet,
}

impl SpreadRequest {
    /// Create a request
    pub fn new(row: i64, col: i64, duration: Hours, cell_size: Feet) -> Self {
        Self {
            row,
            col,
            duration,
            cell_size,
        }
    }
}

/// Where the fire was asked to start and where it actually started
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IgnitionPoint {
    /// Requested (row, col)
    pub requested: (usize, usize),
    /// Cell the run ignited, after relocation off non-burnable fuel
    pub actual: (usize, usize),
    /// Straight-line pixel distance between the two
    pub distance_cells: f32,
}

impl IgnitionPoint {
    /// Whether ignition was moved off a non-burnable cell
    pub fn relocated(&self) -> bool {
        self.requested != self.actual
    }
}

/// Result of one spread run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadOutcome {
    /// Arrival time per cell
    pub arrival: ArrivalTimeGrid,
    /// Requested and actual ignition
    pub ignition: IgnitionPoint,
    /// Worklist entries expanded
    pub processed: usize,
    /// Whether the safety ceiling stopped the run early
    pub truncated: bool,
}

impl SpreadOutcome {
    /// Cells reached, ignition included
    pub fn burned_cells(&self) -> usize {
        self.arrival.burned_cell_count()
    }
}

/// Propagates fire from an ignition cell across a `RateField`
#[derive(Debug, Clone, Default)]
pub struct SpreadSimulator {
    config: SpreadConfig,
}

impl SpreadSimulator {
    /// Create a simulator with the given configuration
    pub fn new(config: SpreadConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &SpreadConfig {
        &self.config
    }

    /// Run a simulation with the configured traversal order
    ///
    /// # Arguments
    /// * `field` - Rate of spread per cell (ft/min)
    /// * `row`, `col` - Requested ignition cell
    /// * `duration` - Simulated time span
    /// * `cell_size` - Physical cell width
    ///
    /// # Errors
    /// - `InvalidParameter` for a non-positive cell size, a negative or
    ///   non-finite duration, or an invalid configuration
    /// - `OutOfBounds` if the requested ignition lies outside the grid
    /// - `NoBurnableIgnition` if no burnable cell lies within the search radius
    pub fn simulate(
        &self,
        field: &RateField,
        row: i64,
        col: i64,
        duration: Hours,
        cell_size: Feet,
    ) -> FireResult<SpreadOutcome> {
        let request = SpreadRequest::new(row, col, duration, cell_size);
        let mut queue = create_front_queue(self.config.traversal);
        self.simulate_with_queue(field, &request, queue.as_mut(), None)
    }

    /// Run a simulation that stops when `cancel` trips
    ///
    /// # Errors
    /// As [`SpreadSimulator::simulate`], plus `Cancelled` when the token trips
    pub fn simulate_cancellable(
        &self,
        field: &RateField,
        request: &SpreadRequest,
        cancel: &CancelToken,
    ) -> FireResult<SpreadOutcome> {
        let mut queue = create_front_queue(self.config.traversal);
        self.simulate_with_queue(field, request, queue.as_mut(), Some(cancel))
    }

    /// Run a simulation with a caller-supplied front queue
    ///
    /// # Errors
    /// As [`SpreadSimulator::simulate_cancellable`]
    pub fn simulate_with_queue<Q: FrontQueue + ?Sized>(
        &self,
        field: &RateField,
        request: &SpreadRequest,
        queue: &mut Q,
        cancel: Option<&CancelToken>,
    ) -> FireResult<SpreadOutcome> {
        self.config.validate()?;
        validate_request(request)?;

        let ignition = self.locate_ignition(field, request.row, request.col)?;
        let (rows, cols) = field.shape();
        let mut arrival = ArrivalTimeGrid::empty(rows, cols);
        let (ir, ic) = ignition.actual;
        arrival.set_ignition(ir, ic);

        if let Some(token) = cancel {
            if token.is_cancelled() {
                return Err(FireSpreadError::Cancelled { processed: 0 });
            }
        }

        let ceiling = self.safety_ceiling(field, request.duration);
        let check_interval = self.config.cancel_check_interval.max(1);
        let revisit = queue.revisits_reached_cells();

        queue.clear();
        queue.push(FrontEntry::new(Hours::ZERO, ir, ic));

        let mut processed = 0_usize;
        let mut truncated = false;

        while let Some(entry) = queue.pop() {
            if processed >= ceiling {
                warn!(
                    "Spread safety ceiling of {} entries reached with {} pending, stopping early",
                    ceiling,
                    queue.len() + 1
                );
                truncated = true;
                break;
            }
            if entry.time > request.duration {
                continue;
            }
            if revisit
                && arrival
                    .time_at(entry.row, entry.col)
                    .is_some_and(|t| entry.time > t)
            {
                // Superseded by a faster route
                continue;
            }

            processed += 1;
            if let Some(token) = cancel {
                if processed % check_interval == 0 && token.is_cancelled() {
                    return Err(FireSpreadError::Cancelled { processed });
                }
            }

            for &(dr, dc, dist) in &NEIGHBORS {
                let Some((nr, nc)) = offset(entry.row, entry.col, dr, dc, rows, cols) else {
                    continue;
                };

                let state = arrival.state(nr, nc);
                if state == CellState::Ignition || (!revisit && state != CellState::Unreached) {
                    continue;
                }

                let rate = field.rate(nr, nc);
                if *rate <= 0.0 {
                    continue;
                }

                let candidate = entry.time + (request.cell_size * dist).travel_time(rate);
                if candidate > request.duration {
                    continue;
                }
                if let CellState::Burning(current) = state {
                    if candidate >= current {
                        continue;
                    }
                }

                arrival.set_arrival(nr, nc, candidate);
                queue.push(FrontEntry::new(candidate, nr, nc));
            }
        }

        let outcome = SpreadOutcome {
            arrival,
            ignition,
            processed,
            truncated,
        };
        info!(
            "Spread simulation complete ({}): {} entries processed, {} cells burned",
            queue.name(),
            outcome.processed,
            outcome.burned_cells()
        );
        Ok(outcome)
    }

    /// Maximum worklist entries one run may expand
    ///
    /// `cells × max(time_steps, 8)` where `time_steps` covers the duration in
    /// the configured nominal step. FIFO expands each cell at most once, so a
    /// normal run stays far below it.
    pub fn safety_ceiling(&self, field: &RateField, duration: Hours) -> usize {
        let cells = field.rows() * field.cols();
        cells.saturating_mul(self.config.time_steps(*duration).max(MIN_CEILING_STEPS))
    }

    /// Validate the ignition and relocate it off non-burnable fuel if needed
    ///
    /// # Errors
    /// `OutOfBounds` or `NoBurnableIgnition`
    pub fn locate_ignition(&self, field: &RateField, row: i64, col: i64) -> FireResult<IgnitionPoint> {
        let (rows, cols) = field.shape();
        if !field.grid().contains(row, col) {
            return Err(FireSpreadError::OutOfBounds {
                row,
                col,
                rows,
                cols,
            });
        }
        let (row, col) = (row as usize, col as usize);

        if field.is_burnable(row, col) {
            return Ok(IgnitionPoint {
                requested: (row, col),
                actual: (row, col),
                distance_cells: 0.0,
            });
        }

        let radius = self.config.search_radius;
        debug!(
            "Ignition ({}, {}) is non-burnable, searching within {} cells",
            row, col, radius
        );

        // Row-major scan; the first cell at the strictly smallest distance wins
        let mut best: Option<((usize, usize), usize)> = None;
        for r in row.saturating_sub(radius)..=row.saturating_add(radius).min(rows - 1) {
            for c in col.saturating_sub(radius)..=col.saturating_add(radius).min(cols - 1) {
                if !field.is_burnable(r, c) {
                    continue;
                }
                let dist_sq = r.abs_diff(row).pow(2) + c.abs_diff(col).pow(2);
                if best.is_none_or(|(_, d)| dist_sq < d) {
                    best = Some(((r, c), dist_sq));
                }
            }
        }

        let Some(((br, bc), dist_sq)) = best else {
            return Err(FireSpreadError::NoBurnableIgnition {
                row,
                col,
                search_radius: radius,
            });
        };

        let distance_cells = (dist_sq as f32).sqrt();
        warn!(
            "Ignition relocated from ({}, {}) to ({}, {}), {:.1} cells away (rate {})",
            row,
            col,
            br,
            bc,
            distance_cells,
            field.rate(br, bc)
        );
        Ok(IgnitionPoint {
            requested: (row, col),
            actual: (br, bc),
            distance_cells,
        })
    }
}

fn validate_request(request: &SpreadRequest) -> FireResult<()> {
    if !(request.cell_size.is_finite() && request.cell_size > 0.0) {
        return Err(FireSpreadError::invalid(
            "cell_size",
            format!("must be positive and finite, got {}", *request.cell_size),
        ));
    }
    if !(request.duration.is_finite() && request.duration >= 0.0) {
        return Err(FireSpreadError::invalid(
            "duration",
            format!("must be non-negative and finite, got {}", *request.duration),
        ));
    }
    Ok(())
}

#[inline]
fn offset(row: usize, col: usize, dr: i64, dc: i64, rows: usize, cols: usize) -> Option<(usize, usize)> {
    let r = row.checked_add_signed(dr as isize)?;
    let c = col.checked_add_signed(dc as isize)?;
    (r < rows && c < cols).then_some((r, c))
}
