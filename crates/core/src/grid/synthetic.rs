//! Deterministic synthetic landscape for demonstrations and tests
//!
//! Hills and valleys from two interfering sine surfaces on a 0..10 domain,
//! with fuel zoned by elevation: grass in valleys, shrub on mid slopes and
//! timber litter on ridges.

use crate::grid::raster::{GeoTransform, Landscape, RasterGrid};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Elevation below which cells are grass (m)
const GRASS_CEILING: f32 = 480.0;
/// Elevation below which cells are shrub (m)
const SHRUB_CEILING: f32 = 520.0;
/// Gradient (per cell) to slope percent scaling
const SLOPE_SCALE: f32 = 5.0;

/// FBFM40 code used for valley grass
pub const GRASS_CODE: i32 = 102;
/// FBFM40 code used for mid-slope shrub
pub const SHRUB_CODE: i32 = 145;
/// FBFM40 code used for ridge-top timber litter
pub const TIMBER_CODE: i32 = 183;

/// Synthetic elevation, slope and fuel layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticLandscape {
    /// Elevation in meters
    pub elevation: RasterGrid<f32>,
    /// Slope in percent
    pub slope: RasterGrid<f32>,
    /// FBFM40 fuel codes
    pub fuel: RasterGrid<i32>,
}

impl SyntheticLandscape {
    /// Generate a `size` × `size` landscape with an identity geotransform
    pub fn generate(size: usize) -> Self {
        Self::generate_with_transform(size, GeoTransform::identity())
    }

    /// Generate a `size` × `size` landscape georeferenced by `transform`
    pub fn generate_with_transform(size: usize, transform: GeoTransform) -> Self {
        let step = if size > 1 {
            10.0 / (size - 1) as f32
        } else {
            0.0
        };

        let elevation = RasterGrid::from_fn(size, size, |row, col| {
            let (x, y) = (col as f32 * step, row as f32 * step);
            100.0 * (x * 0.5).sin() * (y * 0.5).cos()
                + 50.0 * (x * 1.2).sin() * (y * 0.8).sin()
                + 500.0
        })
        .with_transform(transform);

        let slope = slope_from_elevation(&elevation);
        let fuel = elevation.map(|z| {
            if z < GRASS_CEILING {
                GRASS_CODE
            } else if z < SHRUB_CEILING {
                SHRUB_CODE
            } else {
                TIMBER_CODE
            }
        });

        info!("Created {}x{} synthetic landscape", size, size);
        Self {
            elevation,
            slope,
            fuel,
        }
    }

    /// Fuel and slope layers packaged for the rate field builder
    pub fn landscape(&self) -> Landscape {
        Landscape::from_layers(self.fuel.clone(), self.slope.clone())
    }
}

/// Per-cell gradient magnitude × `SLOPE_SCALE`
///
/// Central differences in the interior and one-sided differences on the
/// edges, with unit spacing.
fn slope_from_elevation(elevation: &RasterGrid<f32>) -> RasterGrid<f32> {
    let (rows, cols) = elevation.shape();
    let z = |row: usize, col: usize| elevation.data()[elevation.index(row, col)];

    RasterGrid::from_fn(rows, cols, |row, col| {
        let dx = if cols < 2 {
            0.0
        } else if col == 0 {
            z(row, 1) - z(row, 0)
        } else if col == cols - 1 {
            z(row, col) - z(row, col - 1)
        } else {
            (z(row, col + 1) - z(row, col - 1)) / 2.0
        };
        let dy = if rows < 2 {
            0.0
        } else if row == 0 {
            z(1, col) - z(0, col)
        } else if row == rows - 1 {
            z(row, col) - z(row - 1, col)
        } else {
            (z(row + 1, col) - z(row - 1, col)) / 2.0
        };
        (dx * dx + dy * dy).sqrt() * SLOPE_SCALE
    })
    .with_transform(*elevation.transform())
}
