//! Post-processing of behavior layers and spread runs

pub mod grid_analysis;
pub mod risk;
pub mod scenarios;
pub mod stats;

pub use grid_analysis::{
    generate_grid_points, GridAnalysis, GridAnalysisSummary, GridPointResult, RiskLevel,
    DEFAULT_ANALYSIS_DURATION, LANDFIRE_CELL_SIZE,
};
pub use risk::{
    FuelHazard, HazardTable, RiskIndex, RiskIndexField, RiskSummary, RiskZoning,
    DEFAULT_STEEP_SLOPE,
};
pub use scenarios::compare_scenarios;
pub use stats::{area_within, ArrivalSummary, FieldStatistics, IsochroneBands, DEFAULT_ISOCHRONE_EDGES};
