//! Multi-ignition grid analysis and scenario comparison
//!
//! Run tests with: cargo test --test `grid_analysis`

use fire_spread_core::analysis::{
    compare_scenarios, generate_grid_points, GridAnalysis, GridAnalysisSummary, HazardTable,
    RiskIndex, RiskLevel,
};
use fire_spread_core::core_types::units::{Feet, Hours};
use fire_spread_core::grid::{GeoBounds, GeoTransform, SlopeAggregation, SyntheticLandscape};
use fire_spread_core::{FuelCodeMapper, FuelModelCatalog, RateFieldBuilder, WeatherScenario};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn healdsburg_landscape() -> SyntheticLandscape {
    SyntheticLandscape::generate_with_transform(
        60,
        GeoTransform::north_up(-122.90, 38.63, 0.0003, 0.0003),
    )
}

#[test]
fn test_grid_analysis_over_raster_extent() {
    let land = healdsburg_landscape();
    let catalog = FuelModelCatalog::standard();
    let mapper = FuelCodeMapper::landfire_fbfm40();
    let field = RateFieldBuilder::new(&catalog, &mapper)
        .build(&land.landscape(), &WeatherScenario::red_flag_warning())
        .unwrap();

    let bounds = field.grid().bounds();
    let inner = GeoBounds {
        left: bounds.left + 0.001,
        bottom: bounds.bottom + 0.001,
        right: bounds.right - 0.001,
        top: bounds.top - 0.001,
    };
    let mut points = generate_grid_points(&inner, 4);
    // One point well outside the raster is skipped
    points.push((bounds.top + 1.0, bounds.left - 1.0));
    assert_eq!(points.len(), 17);

    let results = GridAnalysis::new(&field)
        .unwrap()
        .with_duration(Hours::new(3.0))
        .run(&points)
        .unwrap();

    assert_eq!(results.len(), 16);
    assert!(results.windows(2).all(|w| w[0].index < w[1].index));
    for r in &results {
        assert!(r.ignited);
        assert!(r.summary.burned_cells >= 1);
        assert_eq!(r.risk, RiskLevel::from_area(r.burned_area()));
        assert_eq!(r.isochrones.total(), r.summary.spread_cells);
        assert_eq!(r.summary.spread_cells, r.summary.burned_cells - 1);
    }

    let summary = GridAnalysisSummary::from_results(&results).unwrap();
    assert_eq!(summary.points_analyzed, 16);
    assert_eq!(summary.points_unignited, 0);
    assert!(summary.max_burned_area >= summary.mean_burned_area);
}

#[test]
fn test_longer_runs_never_lower_risk() {
    let land = healdsburg_landscape();
    let catalog = FuelModelCatalog::standard();
    let mapper = FuelCodeMapper::landfire_fbfm40();
    let field = RateFieldBuilder::new(&catalog, &mapper)
        .build(&land.landscape(), &WeatherScenario::diablo_extreme())
        .unwrap();
    let points = generate_grid_points(&field.grid().bounds(), 3);

    let analysis = GridAnalysis::new(&field).unwrap();
    let short = analysis.clone().with_duration(Hours::new(1.0)).run(&points).unwrap();
    let long = analysis.with_duration(Hours::new(12.0)).run(&points).unwrap();

    assert_eq!(short.len(), long.len());
    for (s, l) in short.iter().zip(&long) {
        assert!(l.summary.burned_cells >= s.summary.burned_cells);
        assert!(l.risk >= s.risk);
    }
}

#[test]
fn test_scenario_comparison_with_both_aggregations() {
    let land = SyntheticLandscape::generate(40);
    let catalog = FuelModelCatalog::standard();
    let mapper = FuelCodeMapper::landfire_fbfm40();
    let scenarios = WeatherScenario::presets();

    for aggregation in [SlopeAggregation::PerFuelClass, SlopeAggregation::PerCell] {
        let builder = RateFieldBuilder::new(&catalog, &mapper).with_aggregation(aggregation);
        let stats =
            compare_scenarios(&builder, &land.landscape(), &scenarios, Feet::new(98.4)).unwrap();

        assert_eq!(stats.len(), scenarios.len());
        let means: Vec<f32> = stats
            .iter()
            .map(|s| s.rate_of_spread.expect("burnable landscape").mean)
            .collect();
        for pair in means.windows(2) {
            assert!(pair[0] < pair[1], "{aggregation:?}: {means:?}");
        }
    }
}

#[test]
fn test_landscape_risk_zoning() {
    let size = 40;
    let land = SyntheticLandscape::generate(size);

    let zoning = HazardTable::landfire_fbfm40().zone(&land.landscape()).unwrap();
    let summary = &zoning.summary;
    assert_eq!(summary.valid_cells, size * size);
    assert_eq!(summary.counts.iter().sum::<usize>(), size * size);
    // Grass, shrub and timber litter all carry some hazard
    assert_eq!(summary.count(RiskLevel::Low), 0);
    assert!(summary.at_least(RiskLevel::High) > 0);

    let index = RiskIndex::fbfm40_groups();
    let fields: Vec<_> = WeatherScenario::presets()
        .iter()
        .map(|scenario| index.evaluate(&land.landscape(), scenario).unwrap())
        .collect();
    for pair in fields.windows(2) {
        for (mild, harsh) in pair[0].index.data().iter().zip(pair[1].index.data()) {
            assert!(mild <= harsh);
        }
        assert!(
            pair[0].zoning.summary.at_least(RiskLevel::High)
                <= pair[1].zoning.summary.at_least(RiskLevel::High)
        );
    }
}
