//! End-to-end spread pipeline tests
//!
//! Landscape rasters → rate field → spread simulation → arrival statistics,
//! including placement of ignitions through a geotransform.
//!
//! Run tests with: cargo test --test `spread_pipeline`

use approx::assert_relative_eq;
use fire_spread_core::analysis::{area_within, ArrivalSummary, IsochroneBands};
use fire_spread_core::core_types::units::{Feet, Hours};
use fire_spread_core::grid::{GeoTransform, SyntheticLandscape};
use fire_spread_core::solver::{CancelToken, CellState, SpreadRequest};
use fire_spread_core::{
    CoordinateTransform, FireSpreadError, FuelCodeMapper, FuelModelCatalog, Landscape,
    RasterGrid, RateFieldBuilder, SpreadConfig, SpreadSimulator, TraversalOrder,
    WeatherScenario,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const CELL: Feet = Feet::new(98.4);

#[test]
fn test_synthetic_landscape_invariants() {
    let catalog = FuelModelCatalog::standard();
    let mapper = FuelCodeMapper::landfire_fbfm40();
    let land = SyntheticLandscape::generate(60);
    let field = RateFieldBuilder::new(&catalog, &mapper)
        .build(&land.landscape(), &WeatherScenario::red_flag_warning())
        .unwrap();

    assert!(field.values().iter().all(|r| r.is_finite() && *r >= 0.0));

    let sim = SpreadSimulator::default();
    let duration = Hours::new(2.0);
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..10 {
        let row = rng.random_range(0..60_i64);
        let col = rng.random_range(0..60_i64);
        let out = sim.simulate(&field, row, col, duration, CELL).unwrap();

        let (ir, ic) = out.ignition.actual;
        assert_eq!(out.arrival.state(ir, ic), CellState::Ignition);
        assert_eq!(out.arrival.value(ir, ic), 0.0);
        assert!(!out.truncated);

        for r in 0..60 {
            for c in 0..60 {
                if let Some(t) = out.arrival.time_at(r, c) {
                    assert!(t <= duration);
                    if (r, c) != (ir, ic) {
                        assert!(field.is_burnable(r, c));
                        assert!(*t > 0.0);
                    }
                }
            }
        }
    }
}

#[test]
fn test_nonburnable_barrier_blocks_spread() {
    // A water column (code 98) splits the grass landscape in two
    let mut fuel = vec![vec![101; 9]; 9];
    for row in &mut fuel {
        row[4] = 98;
    }
    let landscape = Landscape::from_layers(
        RasterGrid::from_rows(&fuel).unwrap(),
        RasterGrid::filled(9, 9, 10.0),
    );
    let catalog = FuelModelCatalog::standard();
    let mapper = FuelCodeMapper::landfire_fbfm40();
    let field = RateFieldBuilder::new(&catalog, &mapper)
        .build(&landscape, &WeatherScenario::extreme())
        .unwrap();

    let out = SpreadSimulator::default()
        .simulate(&field, 4, 1, Hours::new(48.0), CELL)
        .unwrap();
    for row in 0..9 {
        assert!(out.arrival.is_reached(row, 0));
        assert!(!out.arrival.is_reached(row, 4));
        assert!(!out.arrival.is_reached(row, 7));
    }
    assert_eq!(out.burned_cells(), 9 * 4);
}

#[test]
fn test_ignition_on_water_is_relocated() {
    let mut fuel = vec![vec![98; 7]; 7];
    fuel[6][6] = 145;
    fuel[0][5] = 145;
    let landscape = Landscape::from_layers(
        RasterGrid::from_rows(&fuel).unwrap(),
        RasterGrid::filled(7, 7, 5.0),
    );
    let catalog = FuelModelCatalog::standard();
    let mapper = FuelCodeMapper::landfire_fbfm40();
    let field = RateFieldBuilder::new(&catalog, &mapper)
        .build(&landscape, &WeatherScenario::moderate())
        .unwrap();

    let out = SpreadSimulator::default()
        .simulate(&field, 2, 3, Hours::new(1.0), CELL)
        .unwrap();
    assert!(out.ignition.relocated());
    // (0, 5) is √8 away, (6, 6) is 5 away
    assert_eq!(out.ignition.actual, (0, 5));
    assert_eq!(out.arrival.ignition(), Some((0, 5)));
}

#[test]
fn test_ignition_from_geographic_coordinates() {
    let transform = GeoTransform::north_up(-122.95, 38.70, 0.00027, 0.00027);
    let land = SyntheticLandscape::generate_with_transform(80, transform);
    let catalog = FuelModelCatalog::standard();
    let mapper = FuelCodeMapper::landfire_fbfm40();
    let field = RateFieldBuilder::new(&catalog, &mapper)
        .build(&land.landscape(), &WeatherScenario::tubbs_fire())
        .unwrap();

    let coords = CoordinateTransform::for_raster(field.grid()).unwrap();
    let (row, col) = coords.to_grid(38.69, -122.94);
    let out = SpreadSimulator::default()
        .simulate(&field, row, col, Hours::new(1.0), CELL)
        .unwrap();

    let (ir, ic) = out.ignition.actual;
    let (lat, lon) = coords.to_geo(ir as i64, ic as i64);
    assert!((lat - 38.69).abs() <= 0.00027);
    assert!((lon + 122.94).abs() <= 0.00027);

    // Off the raster entirely
    let (row, col) = coords.to_grid(39.5, -121.0);
    assert!(matches!(
        SpreadSimulator::default().simulate(&field, row, col, Hours::new(1.0), CELL),
        Err(FireSpreadError::OutOfBounds { .. })
    ));
}

#[test]
fn test_arrival_statistics_from_run() {
    let catalog = FuelModelCatalog::standard();
    let mapper = FuelCodeMapper::landfire_fbfm40();
    let land = SyntheticLandscape::generate(50);
    let field = RateFieldBuilder::new(&catalog, &mapper)
        .build(&land.landscape(), &WeatherScenario::extreme())
        .unwrap();

    let out = SpreadSimulator::default()
        .simulate(&field, 25, 25, Hours::new(6.0), CELL)
        .unwrap();
    let summary = ArrivalSummary::from_grid(&out.arrival, CELL);
    assert_eq!(summary.burned_cells, out.burned_cells());
    assert_relative_eq!(
        *summary.burned_area,
        out.burned_cells() as f32 * 98.4 * 98.4 / 43_560.0,
        epsilon = 1e-2
    );

    let bands = IsochroneBands::with_default_edges(&out.arrival);
    assert_eq!(bands.total(), out.burned_cells() - 1);

    let early = area_within(&out.arrival, Hours::new(1.0), CELL);
    let all = area_within(&out.arrival, Hours::new(6.0), CELL);
    assert!(early <= all);
    assert_relative_eq!(*all, *summary.burned_area, epsilon = 1e-3);
}

#[test]
fn test_arrival_time_order_never_slower() {
    let catalog = FuelModelCatalog::standard();
    let mapper = FuelCodeMapper::landfire_fbfm40();
    let land = SyntheticLandscape::generate(40);
    let field = RateFieldBuilder::new(&catalog, &mapper)
        .build(&land.landscape(), &WeatherScenario::moderate())
        .unwrap();

    let duration = Hours::new(200.0);
    let fifo = SpreadSimulator::default()
        .simulate(&field, 20, 20, duration, CELL)
        .unwrap();
    let ordered =
        SpreadSimulator::new(SpreadConfig::default().with_traversal(TraversalOrder::ArrivalTime))
            .simulate(&field, 20, 20, duration, CELL)
            .unwrap();

    assert!(ordered.burned_cells() >= fifo.burned_cells());
    for r in 0..40 {
        for c in 0..40 {
            if let (Some(f), Some(o)) = (fifo.arrival.time_at(r, c), ordered.arrival.time_at(r, c)) {
                assert!(*o <= *f + 1e-4, "({r}, {c}): {o} > {f}");
            }
        }
    }
}

#[test]
fn test_cancellation_and_deadline() {
    let land = SyntheticLandscape::generate(30);
    let catalog = FuelModelCatalog::standard();
    let mapper = FuelCodeMapper::landfire_fbfm40();
    let field = RateFieldBuilder::new(&catalog, &mapper)
        .build(&land.landscape(), &WeatherScenario::moderate())
        .unwrap();
    let sim = SpreadSimulator::new(SpreadConfig::default().with_cancel_check_interval(1));
    let request = SpreadRequest::new(15, 15, Hours::new(24.0), CELL);

    let expired = CancelToken::with_timeout(std::time::Duration::ZERO);
    assert!(matches!(
        sim.simulate_cancellable(&field, &request, &expired),
        Err(FireSpreadError::Cancelled { .. })
    ));

    let token = CancelToken::new();
    let out = sim.simulate_cancellable(&field, &request, &token).unwrap();
    assert_eq!(
        out,
        sim.simulate(&field, 15, 15, Hours::new(24.0), CELL).unwrap()
    );
}
