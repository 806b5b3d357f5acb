//! Spread simulator configuration
//!
//! Defaults reproduce the established FIFO wave expansion with a 100-cell
//! ignition search radius.

use crate::error::{FireResult, FireSpreadError};
use serde::{Deserialize, Serialize};

/// Order in which the active front is expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TraversalOrder {
    /// First-in-first-out wave expansion
    ///
    /// Not a fastest-path search: in heterogeneous rate fields a cell keeps the
    /// first arrival time assigned to it even if a faster route is found later.
    #[default]
    Fifo,
    /// Earliest-arrival-first expansion with improvement of reached cells
    /// (Dijkstra on the 8-connected grid)
    ArrivalTime,
}

impl TraversalOrder {
    /// Short name used in logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fifo => "fifo",
            Self::ArrivalTime => "arrival-time",
        }
    }
}

/// Tunables for `SpreadSimulator`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfig {
    /// Half-width (cells) of the square searched when the ignition cell cannot burn
    pub search_radius: usize,
    /// Nominal time step in minutes; only sizes the safety ceiling
    pub time_step_minutes: f32,
    /// Front expansion order
    pub traversal: TraversalOrder,
    /// Processed entries between cancellation checks
    pub cancel_check_interval: usize,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            search_radius: 100,
            time_step_minutes: 30.0,
            traversal: TraversalOrder::Fifo,
            cancel_check_interval: 1024,
        }
    }
}

impl SpreadConfig {
    /// Set the ignition search radius
    pub fn with_search_radius(mut self, radius: usize) -> Self {
        self.search_radius = radius;
        self
    }

    /// Set the traversal order
    pub fn with_traversal(mut self, traversal: TraversalOrder) -> Self {
        self.traversal = traversal;
        self
    }

    /// Set the cancellation polling interval
    pub fn with_cancel_check_interval(mut self, interval: usize) -> Self {
        self.cancel_check_interval = interval;
        self
    }

    /// Check the configuration
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `time_step_minutes` is not positive and finite
    pub fn validate(&self) -> FireResult<()> {
        if !(self.time_step_minutes.is_finite() && self.time_step_minutes > 0.0) {
            return Err(FireSpreadError::invalid(
                "time_step_minutes",
                format!("must be positive and finite, got {}", self.time_step_minutes),
            ));
        }
        Ok(())
    }

    /// Number of nominal time steps covering `duration_hours`
    pub(crate) fn time_steps(&self, duration_hours: f32) -> usize {
        (duration_hours * 60.0 / self.time_step_minutes).ceil().max(0.0) as usize
    }
}
