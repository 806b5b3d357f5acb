//! Georeferenced raster grids
//!
//! A `RasterGrid<T>` is a row-major 2D array plus the affine geotransform,
//! nodata sentinel and derived bounds that came with it. The core never
//! mutates caller rasters; derived layers are fresh allocations.

use crate::error::{FireResult, FireSpreadError, LayerKind};
use serde::{Deserialize, Serialize};

/// Affine mapping from (col, row) pixel space to (x, y) map space
///
/// Coefficients follow the usual raster convention:
/// ```text
/// x = a × col + b × row + c
/// y = d × col + e × row + f
/// ```
/// For north-up rasters `b = d = 0`, `a` is the cell width and `e` is the
/// negated cell height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// x step per column
    pub a: f64,
    /// x step per row (rotation)
    pub b: f64,
    /// x of the upper-left corner
    pub c: f64,
    /// y step per column (rotation)
    pub d: f64,
    /// y step per row
    pub e: f64,
    /// y of the upper-left corner
    pub f: f64,
}

impl GeoTransform {
    /// Create from all six coefficients
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// North-up transform from the upper-left corner and cell size
    pub const fn north_up(origin_x: f64, origin_y: f64, cell_width: f64, cell_height: f64) -> Self {
        Self::new(cell_width, 0.0, origin_x, 0.0, -cell_height, origin_y)
    }

    /// Pixel space equals map space
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    /// Map (col, row) to (x, y)
    #[inline]
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Geographic extent of a raster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Minimum x (west)
    pub left: f64,
    /// Minimum y (south)
    pub bottom: f64,
    /// Maximum x (east)
    pub right: f64,
    /// Maximum y (north)
    pub top: f64,
}

impl GeoBounds {
    /// Whether a map-space point lies within the bounds (inclusive)
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.bottom && y <= self.top
    }
}

/// Row-major 2D grid with georeferencing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterGrid<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
    transform: GeoTransform,
    nodata: Option<T>,
}

impl<T: Copy + PartialEq> RasterGrid<T> {
    /// Wrap a row-major buffer
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if `data.len() != rows * cols`
    pub fn new(
        rows: usize,
        cols: usize,
        data: Vec<T>,
        transform: GeoTransform,
        nodata: Option<T>,
    ) -> FireResult<Self> {
        if data.len() != rows * cols {
            return Err(FireSpreadError::ShapeMismatch {
                expected: (rows, cols),
                found: (data.len() / cols.max(1), cols),
            });
        }
        Ok(Self {
            data,
            rows,
            cols,
            transform,
            nodata,
        })
    }

    /// Grid with every cell set to `value` and an identity transform
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
            transform: GeoTransform::identity(),
            nodata: None,
        }
    }

    /// Grid whose cells are produced by `f(row, col)` in row-major order
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self {
            data,
            rows,
            cols,
            transform: GeoTransform::identity(),
            nodata: None,
        }
    }

    /// Build from nested rows (convenient for small hand-written grids)
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the rows are ragged
    pub fn from_rows(rows: &[Vec<T>]) -> FireResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(FireSpreadError::ShapeMismatch {
                expected: (rows.len(), cols),
                found: (rows.len(), bad.len()),
            });
        }
        let data = rows.iter().flatten().copied().collect();
        Self::new(rows.len(), cols, data, GeoTransform::identity(), None)
    }

    /// Replace the geotransform
    pub fn with_transform(mut self, transform: GeoTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Replace the nodata sentinel
    pub fn with_nodata(mut self, nodata: Option<T>) -> Self {
        self.nodata = nodata;
        self
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total cell count
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid has no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major cell values
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Flat index of (row, col)
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Value at (row, col), or `None` outside the grid
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.rows && col < self.cols {
            Some(self.data[self.index(row, col)])
        } else {
            None
        }
    }

    /// Whether signed indices fall inside the grid
    #[inline]
    pub fn contains(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Geotransform supplied with the raster
    #[inline]
    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Nodata sentinel, if any
    #[inline]
    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    /// Whether `value` equals the nodata sentinel
    #[inline]
    pub fn is_nodata(&self, value: T) -> bool {
        self.nodata == Some(value)
    }

    /// Geographic extent derived from the four corners
    pub fn bounds(&self) -> GeoBounds {
        let (rows, cols) = (self.rows as f64, self.cols as f64);
        let corners = [
            self.transform.apply(0.0, 0.0),
            self.transform.apply(cols, 0.0),
            self.transform.apply(0.0, rows),
            self.transform.apply(cols, rows),
        ];
        let mut bounds = GeoBounds {
            left: f64::INFINITY,
            bottom: f64::INFINITY,
            right: f64::NEG_INFINITY,
            top: f64::NEG_INFINITY,
        };
        for (x, y) in corners {
            bounds.left = bounds.left.min(x);
            bounds.right = bounds.right.max(x);
            bounds.bottom = bounds.bottom.min(y);
            bounds.top = bounds.top.max(y);
        }
        bounds
    }

    /// New grid of the same shape and transform with every value mapped
    ///
    /// The nodata sentinel is not carried over.
    pub fn map<U, F>(&self, f: F) -> RasterGrid<U>
    where
        U: Copy + PartialEq,
        F: Fn(T) -> U,
    {
        RasterGrid {
            data: self.data.iter().map(|&v| f(v)).collect(),
            rows: self.rows,
            cols: self.cols,
            transform: self.transform,
            nodata: None,
        }
    }

    /// Ensure `other` has the same shape as `self`
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if rows or columns differ
    pub fn check_same_shape<U>(&self, other: &RasterGrid<U>) -> FireResult<()> {
        if self.shape() == (other.rows, other.cols) {
            Ok(())
        } else {
            Err(FireSpreadError::ShapeMismatch {
                expected: self.shape(),
                found: (other.rows, other.cols),
            })
        }
    }
}

impl RasterGrid<f32> {
    /// Convert a slope-in-degrees raster to percent rise
    ///
    /// Nodata cells keep the sentinel value.
    pub fn degrees_to_percent(&self) -> Self {
        let nodata = self.nodata;
        let data = self
            .data
            .iter()
            .map(|&deg| {
                if nodata == Some(deg) {
                    deg
                } else {
                    deg.to_radians().tan() * 100.0
                }
            })
            .collect();
        Self {
            data,
            rows: self.rows,
            cols: self.cols,
            transform: self.transform,
            nodata,
        }
    }
}

/// The raster layers a rate field is derived from
///
/// Layers are optional so partially loaded inputs can be represented; the
/// builder reports whichever required layer is absent.
#[derive(Debug, Clone, Default)]
pub struct Landscape {
    fuel: Option<RasterGrid<i32>>,
    slope: Option<RasterGrid<f32>>,
}

impl Landscape {
    /// Empty landscape with no layers loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Landscape with both required layers
    pub fn from_layers(fuel: RasterGrid<i32>, slope: RasterGrid<f32>) -> Self {
        Self {
            fuel: Some(fuel),
            slope: Some(slope),
        }
    }

    /// Attach the fuel code layer
    pub fn with_fuel(mut self, fuel: RasterGrid<i32>) -> Self {
        self.fuel = Some(fuel);
        self
    }

    /// Attach the slope layer (percent)
    pub fn with_slope(mut self, slope: RasterGrid<f32>) -> Self {
        self.slope = Some(slope);
        self
    }

    /// Fuel code layer
    ///
    /// # Errors
    /// Returns `MissingRasterLayer` if no fuel layer was supplied
    pub fn fuel(&self) -> FireResult<&RasterGrid<i32>> {
        self.fuel.as_ref().ok_or(FireSpreadError::MissingRasterLayer {
            layer: LayerKind::FuelModel,
        })
    }

    /// Slope layer
    ///
    /// # Errors
    /// Returns `MissingRasterLayer` if no slope layer was supplied
    pub fn slope(&self) -> FireResult<&RasterGrid<f32>> {
        self.slope.as_ref().ok_or(FireSpreadError::MissingRasterLayer {
            layer: LayerKind::Slope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_rejects_wrong_length() {
        let result = RasterGrid::new(3, 3, vec![0_i32; 8], GeoTransform::identity(), None);
        assert!(matches!(
            result,
            Err(FireSpreadError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_rows_and_access() {
        let grid = RasterGrid::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.get(1, 2), Some(6));
        assert_eq!(grid.get(2, 0), None);
        assert!(grid.contains(1, 2));
        assert!(!grid.contains(-1, 0));
        assert!(!grid.contains(0, 3));
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let grid = RasterGrid::from_fn(2, 3, |row, col| (row * 10 + col) as i32);
        assert_eq!(grid.data(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(grid.get(1, 0), Some(10));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = RasterGrid::from_rows(&[vec![1, 2], vec![3]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bounds_north_up() {
        let transform = GeoTransform::north_up(-122.9, 38.7, 0.001, 0.001);
        let grid = RasterGrid::filled(100, 200, 0_i32).with_transform(transform);
        let b = grid.bounds();
        assert_relative_eq!(b.left, -122.9, epsilon = 1e-9);
        assert_relative_eq!(b.right, -122.7, epsilon = 1e-9);
        assert_relative_eq!(b.top, 38.7, epsilon = 1e-9);
        assert_relative_eq!(b.bottom, 38.6, epsilon = 1e-9);
        assert!(b.contains(-122.8, 38.65));
        assert!(!b.contains(-122.6, 38.65));
    }

    #[test]
    fn test_degrees_to_percent_keeps_nodata() {
        let grid = RasterGrid::from_rows(&[vec![45.0_f32, -9999.0]])
            .unwrap()
            .with_nodata(Some(-9999.0));
        let pct = grid.degrees_to_percent();
        assert_relative_eq!(pct.data()[0], 100.0, epsilon = 1e-3);
        assert_eq!(pct.data()[1], -9999.0);
        assert_eq!(pct.nodata(), Some(-9999.0));
    }

    #[test]
    fn test_landscape_reports_missing_layer() {
        let landscape = Landscape::new().with_fuel(RasterGrid::filled(2, 2, 101));
        assert!(landscape.fuel().is_ok());
        assert_eq!(
            landscape.slope().unwrap_err(),
            FireSpreadError::MissingRasterLayer {
                layer: LayerKind::Slope
            }
        );
    }
}
