//! Raster layers, fuel mapping and rate field construction

pub mod fuel_loader;
pub mod raster;
pub mod rate_field;
pub mod synthetic;
pub mod transform;

// Re-export main types
pub use fuel_loader::{FuelAssignment, FuelCodeMapper};
pub use raster::{GeoBounds, GeoTransform, Landscape, RasterGrid};
pub use rate_field::{
    BehaviorFields, BehaviorStatistics, RateField, RateFieldBuilder, SlopeAggregation,
};
pub use synthetic::SyntheticLandscape;
pub use transform::CoordinateTransform;
