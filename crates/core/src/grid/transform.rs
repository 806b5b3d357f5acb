//! Geographic ↔ grid coordinate conversion
//!
//! Pure affine application and inversion. No bounds checking happens here:
//! callers validate indices against the raster shape (the spread simulator
//! reports `OutOfBounds` for ignition points off the grid).

use crate::error::{FireResult, FireSpreadError};
use crate::grid::raster::{GeoTransform, RasterGrid};
use nalgebra::{Matrix3, Vector3};

/// Converts between (lat, lon) and (row, col) using a raster's geotransform
#[derive(Debug, Clone, Copy)]
pub struct CoordinateTransform {
    forward: GeoTransform,
    inverse: Matrix3<f64>,
}

impl CoordinateTransform {
    /// Create from a geotransform
    ///
    /// # Errors
    /// Returns `DegenerateTransform` if the affine matrix is singular
    pub fn new(forward: GeoTransform) -> FireResult<Self> {
        let matrix = Matrix3::new(
            forward.a, forward.b, forward.c, //
            forward.d, forward.e, forward.f, //
            0.0, 0.0, 1.0,
        );
        let inverse = matrix
            .try_inverse()
            .ok_or(FireSpreadError::DegenerateTransform)?;
        Ok(Self { forward, inverse })
    }

    /// Create from the transform attached to a raster
    ///
    /// # Errors
    /// Returns `DegenerateTransform` if the raster's transform is singular
    pub fn for_raster<T: Copy + PartialEq>(raster: &RasterGrid<T>) -> FireResult<Self> {
        Self::new(*raster.transform())
    }

    /// Forward transform
    pub fn geotransform(&self) -> &GeoTransform {
        &self.forward
    }

    /// Fractional (row, col) for a geographic point
    pub fn to_grid_fractional(&self, lat: f64, lon: f64) -> (f64, f64) {
        let p = self.inverse * Vector3::new(lon, lat, 1.0);
        (p.y, p.x)
    }

    /// Nearest (row, col) for a geographic point; may lie outside the raster
    pub fn to_grid(&self, lat: f64, lon: f64) -> (i64, i64) {
        let (row, col) = self.to_grid_fractional(lat, lon);
        (row.round() as i64, col.round() as i64)
    }

    /// Geographic (lat, lon) of a cell's reference corner
    pub fn to_geo(&self, row: i64, col: i64) -> (f64, f64) {
        let (lon, lat) = self.forward.apply(col as f64, row as f64);
        (lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Roughly 30 m cells near Healdsburg, CA
    const CELL: f64 = 0.00027;

    fn healdsburg() -> CoordinateTransform {
        CoordinateTransform::new(GeoTransform::north_up(-122.92, 38.68, CELL, CELL)).unwrap()
    }

    #[test]
    fn test_origin_maps_to_zero() {
        let t = healdsburg();
        assert_eq!(t.to_grid(38.68, -122.92), (0, 0));
        let (lat, lon) = t.to_geo(0, 0);
        assert_relative_eq!(lat, 38.68, epsilon = 1e-12);
        assert_relative_eq!(lon, -122.92, epsilon = 1e-12);
    }

    #[test]
    fn test_rows_increase_southward() {
        let t = healdsburg();
        let (row, col) = t.to_grid(38.68 - 10.0 * CELL, -122.92 + 5.0 * CELL);
        assert_eq!((row, col), (10, 5));
    }

    #[test]
    fn test_round_trip_within_one_cell() {
        let t = healdsburg();
        for &(lat, lon) in &[(38.6102, -122.8694), (38.64, -122.84), (38.58, -122.91)] {
            let (row, col) = t.to_grid(lat, lon);
            let (lat2, lon2) = t.to_geo(row, col);
            assert!((lat - lat2).abs() <= CELL);
            assert!((lon - lon2).abs() <= CELL);
        }
    }

    #[test]
    fn test_no_bounds_checking() {
        let t = healdsburg();
        let (row, col) = t.to_grid(39.0, -123.0);
        assert!(row < 0);
        assert!(col < 0);
    }

    #[test]
    fn test_singular_transform_rejected() {
        let flat = GeoTransform::new(0.0, 0.0, 1.0, 0.0, 0.0, 1.0);
        assert!(matches!(
            CoordinateTransform::new(flat),
            Err(FireSpreadError::DegenerateTransform)
        ));
    }
}
