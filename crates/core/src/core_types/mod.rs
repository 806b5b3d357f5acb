//! Core types and utilities

pub mod fuel;
pub mod units;
pub mod weather;

pub use fuel::{FuelModel, FuelModelCatalog};
pub use units::*;
pub use weather::WeatherScenario;
