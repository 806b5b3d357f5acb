//! Error taxonomy for the fire behavior model and spread simulator
//!
//! Every condition here is local and recoverable. A caller that receives
//! `OutOfBounds` or `NoBurnableIgnition` can simply pick a different ignition
//! point; none of these should bring the process down.
//!
//! Numerically degenerate inputs (moisture at or above extinction, zero wind,
//! flat terrain) are NOT errors. They produce zero or minimal fire behavior.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result alias used throughout the crate
pub type FireResult<T> = Result<T, FireSpreadError>;

/// Raster layers the rate field builder consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    /// Integer fuel classification codes (e.g. LANDFIRE FBFM40)
    FuelModel,
    /// Terrain slope in percent
    Slope,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::FuelModel => write!(f, "fuel model"),
            LayerKind::Slope => write!(f, "slope"),
        }
    }
}

/// Errors raised by the fire behavior core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FireSpreadError {
    /// Fuel model code is not present in the catalog
    #[error("Unknown fuel model: {code}")]
    UnknownFuelModel {
        /// The code that failed to resolve
        code: String,
    },

    /// A raster layer required by the builder was not supplied
    #[error("Required raster layer missing: {layer}")]
    MissingRasterLayer {
        /// Which layer was absent
        layer: LayerKind,
    },

    /// Ignition indices fall outside the rate field
    #[error("Ignition ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        /// Requested row
        row: i64,
        /// Requested column
        col: i64,
        /// Grid rows
        rows: usize,
        /// Grid columns
        cols: usize,
    },

    /// Ignition cell is non-burnable and no burnable cell lies within the search radius
    #[error("No burnable cell within {search_radius} cells of ignition ({row}, {col})")]
    NoBurnableIgnition {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Radius that was searched
        search_radius: usize,
    },

    /// Two rasters (or a raster and its data buffer) disagree in shape
    #[error("Raster shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Expected (rows, cols)
        expected: (usize, usize),
        /// Actual (rows, cols)
        found: (usize, usize),
    },

    /// Parameter outside its valid domain
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Geotransform has no inverse
    #[error("Geotransform is not invertible")]
    DegenerateTransform,

    /// Run stopped through its cancellation token or deadline
    #[error("Simulation cancelled after processing {processed} cells")]
    Cancelled {
        /// Worklist entries processed before stopping
        processed: usize,
    },
}

impl FireSpreadError {
    /// Shorthand for [`FireSpreadError::InvalidParameter`]
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Whether callers may treat this as an empty result instead of a failure
    ///
    /// Only an exhausted ignition search qualifies: the run was well-formed but
    /// there was nothing to burn near the requested point.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::NoBurnableIgnition { .. })
    }
}
