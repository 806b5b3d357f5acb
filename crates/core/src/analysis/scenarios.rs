//! Side-by-side evaluation of weather scenarios over one landscape

use crate::core_types::units::Feet;
use crate::core_types::weather::WeatherScenario;
use crate::error::FireResult;
use crate::grid::raster::Landscape;
use crate::grid::rate_field::{BehaviorStatistics, RateFieldBuilder};
use rayon::prelude::*;
use tracing::info;

/// Build behavior layers for each scenario in parallel and summarize them
///
/// Results keep the order of `scenarios`.
///
/// # Errors
/// The first build error encountered (missing layer, shape mismatch, unknown
/// fuel model)
pub fn compare_scenarios(
    builder: &RateFieldBuilder<'_>,
    landscape: &Landscape,
    scenarios: &[WeatherScenario],
    cell_size: Feet,
) -> FireResult<Vec<BehaviorStatistics>> {
    let stats: Vec<BehaviorStatistics> = scenarios
        .par_iter()
        .map(|scenario| {
            builder
                .build_behavior(landscape, scenario)
                .map(|fields| fields.statistics(cell_size))
        })
        .collect::<FireResult<_>>()?;

    for s in &stats {
        if let Some(ros) = &s.rate_of_spread {
            info!(
                "Scenario '{}': mean ROS {:.1} ch/h, max {:.1} ch/h over {} burnable cells",
                s.scenario.name, ros.mean, ros.max, s.burnable_cells
            );
        } else {
            info!("Scenario '{}': no burnable cells", s.scenario.name);
        }
    }
    Ok(stats)
}
