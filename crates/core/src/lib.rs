//! Fire Spread Core Library
//!
//! Surface fire behavior and cellular spread over landscape rasters, after the
//! Rothermel point model as simplified for US customary fire-behavior units.
//!
//! ## Pipeline
//!
//! - `physics`: point model (rate of spread, fireline intensity, flame length,
//!   fire-type classification) over an injected fuel model catalog
//! - `grid`: georeferenced rasters, fuel code mapping and per-cell rate fields
//! - `solver`: time-of-arrival propagation from an ignition cell
//! - `analysis`: burned area, isochrone bands, multi-ignition risk, landscape
//!   risk zoning and scenario comparison
//!
//! Raw fuel and slope rasters plus a weather scenario go through the
//! `RateFieldBuilder` into a `RateField`, which the `SpreadSimulator` turns into
//! an `ArrivalTimeGrid`.
//!
//! The library performs no I/O and installs no tracing subscriber.

// Core types and utilities
pub mod core_types;
pub mod error;

// Model and pipeline modules
pub mod analysis;
pub mod grid;
pub mod physics;
pub mod solver;

// Re-export core types
pub use core_types::{FuelModel, FuelModelCatalog, WeatherScenario};
pub use error::{FireResult, FireSpreadError, LayerKind};

// Re-export pipeline types
pub use grid::{
    CoordinateTransform, FuelCodeMapper, Landscape, RasterGrid, RateField, RateFieldBuilder,
    SlopeAggregation,
};
pub use physics::{FireType, RateOfSpreadModel, SpreadBehaviorResult, SpreadConditions};
pub use solver::{ArrivalTimeGrid, SpreadConfig, SpreadOutcome, SpreadSimulator, TraversalOrder};
