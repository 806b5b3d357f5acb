//! Fuel code mapping from classified rasters
//!
//! Maps the fine-grained integer codes of a landscape fuel classification onto
//! the canonical fuel models held by a `FuelModelCatalog`. The mapping is pure
//! data: supporting another classification scheme means building another
//! table, not writing another branch.
//!
//! # LANDFIRE FBFM40 Codes
//!
//! The default table follows the Scott & Burgan 40 fuel model raster:
//! - 91-99: Non-burnable (urban, snow/ice, agriculture, water, barren)
//! - 101-109: Grass (GR1-GR9)
//! - 121-124: Grass-shrub (GS1-GS4)
//! - 141-149: Shrub (SH1-SH9)
//! - 161-165: Timber-understory (TU1-TU5)
//! - 181-189: Timber litter (TL1-TL9)
//! - 201-204: Slash-blowdown (SB1-SB4)

use crate::core_types::fuel::FuelModelCatalog;
use crate::error::FireResult;
use rustc_hash::FxHashMap;

/// Outcome of resolving one raster fuel code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelAssignment<'a> {
    /// Burns as the named catalog fuel model
    Model(&'a str),
    /// Never burns (explicitly non-burnable or unmapped)
    NonBurnable,
}

impl FuelAssignment<'_> {
    /// Whether the code resolves to a burnable model
    pub fn is_burnable(&self) -> bool {
        matches!(self, FuelAssignment::Model(_))
    }
}

/// Many-to-one lookup from raster fuel codes to catalog fuel model codes
///
/// Codes absent from the table resolve to `NonBurnable`; raster inputs are not
/// guaranteed to cover the whole classification space.
#[derive(Debug, Clone, Default)]
pub struct FuelCodeMapper {
    /// `None` marks an explicit non-burnable entry
    table: FxHashMap<i32, Option<String>>,
}

impl FuelCodeMapper {
    /// Table for LANDFIRE FBFM40 rasters
    pub fn landfire_fbfm40() -> Self {
        let mut entries: Vec<(i32, Option<&str>)> = Vec::new();

        // Grass: the two sparsest grass models behave like GR1
        entries.extend((101..=102).map(|c| (c, Some("GR1"))));
        entries.extend((103..=109).map(|c| (c, Some("GR2"))));

        // Grass-shrub
        entries.extend((121..=124).map(|c| (c, Some("GR2"))));

        // Shrub
        entries.extend((141..=149).map(|c| (c, Some("SH5"))));

        // Timber understory
        entries.extend((161..=165).map(|c| (c, Some("TU1"))));

        // Timber litter and slash-blowdown
        entries.extend((181..=189).map(|c| (c, Some("TL5"))));
        entries.extend((201..=204).map(|c| (c, Some("TL5"))));

        // Urban, snow/ice, agriculture, water, barren
        entries.extend([91, 92, 93, 98, 99].map(|c| (c, None)));

        Self::from_entries(entries)
    }

    /// Build a custom table
    ///
    /// # Arguments
    /// * `entries` - `(raster code, Some(model code))` for burnable codes,
    ///   `(raster code, None)` for explicit non-burnable codes
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (i32, Option<&'a str>)>) -> Self {
        let table = entries
            .into_iter()
            .map(|(code, model)| (code, model.map(str::to_string)))
            .collect();
        Self { table }
    }

    /// Resolve a raster code; never fails
    pub fn resolve(&self, code: i32) -> FuelAssignment<'_> {
        match self.table.get(&code) {
            Some(Some(model)) => FuelAssignment::Model(model.as_str()),
            _ => FuelAssignment::NonBurnable,
        }
    }

    /// Set or replace the assignment for one code
    pub fn set_code(&mut self, code: i32, model: Option<&str>) {
        self.table.insert(code, model.map(str::to_string));
    }

    /// Number of codes with an explicit entry
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Check that every mapped model code exists in `catalog`
    ///
    /// # Errors
    /// Returns `UnknownFuelModel` for the first model code the catalog lacks
    pub fn validate(&self, catalog: &FuelModelCatalog) -> FireResult<()> {
        let mut models: Vec<&str> = self.table.values().flatten().map(String::as_str).collect();
        models.sort_unstable();
        models.dedup();
        for model in models {
            catalog.get(model)?;
        }
        Ok(())
    }
}

/// Checkerboard of grass (101) and shrub (145) codes for tests
#[cfg(test)]
pub(crate) fn create_test_fuel_grid(rows: usize, cols: usize) -> Vec<i32> {
    let mut grid = vec![0_i32; rows * cols];
    for row in 0..rows {
        for col in 0..cols {
            grid[row * cols + col] = if (row + col) % 2 == 0 { 101 } else { 145 };
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FireSpreadError;

    #[test]
    fn test_fbfm40_mapping() {
        let mapper = FuelCodeMapper::landfire_fbfm40();

        assert_eq!(mapper.resolve(101), FuelAssignment::Model("GR1"));
        assert_eq!(mapper.resolve(102), FuelAssignment::Model("GR1"));
        assert_eq!(mapper.resolve(103), FuelAssignment::Model("GR2"));
        assert_eq!(mapper.resolve(122), FuelAssignment::Model("GR2"));
        assert_eq!(mapper.resolve(145), FuelAssignment::Model("SH5"));
        assert_eq!(mapper.resolve(165), FuelAssignment::Model("TU1"));
        assert_eq!(mapper.resolve(183), FuelAssignment::Model("TL5"));
        assert_eq!(mapper.resolve(204), FuelAssignment::Model("TL5"));

        // Explicit non-burnable: urban, water, barren
        assert_eq!(mapper.resolve(91), FuelAssignment::NonBurnable);
        assert_eq!(mapper.resolve(98), FuelAssignment::NonBurnable);
        assert_eq!(mapper.resolve(99), FuelAssignment::NonBurnable);
    }

    #[test]
    fn test_unmapped_codes_are_non_burnable() {
        let mapper = FuelCodeMapper::landfire_fbfm40();
        assert_eq!(mapper.resolve(0), FuelAssignment::NonBurnable);
        assert_eq!(mapper.resolve(-9999), FuelAssignment::NonBurnable);
        assert_eq!(mapper.resolve(150), FuelAssignment::NonBurnable);
        assert!(!mapper.resolve(150).is_burnable());
    }

    #[test]
    fn test_fbfm40_models_exist_in_standard_catalog() {
        let mapper = FuelCodeMapper::landfire_fbfm40();
        assert!(mapper.validate(&FuelModelCatalog::standard()).is_ok());
    }

    #[test]
    fn test_custom_mapping() {
        let mut mapper = FuelCodeMapper::from_entries([(1, Some("GR2")), (8, None)]);
        assert_eq!(mapper.resolve(1), FuelAssignment::Model("GR2"));
        assert_eq!(mapper.resolve(8), FuelAssignment::NonBurnable);

        mapper.set_code(3, Some("XX1"));
        assert_eq!(mapper.len(), 3);
        let err = mapper.validate(&FuelModelCatalog::standard()).unwrap_err();
        assert_eq!(
            err,
            FireSpreadError::UnknownFuelModel {
                code: "XX1".to_string()
            }
        );
    }

    #[test]
    fn test_create_test_fuel_grid() {
        let grid = create_test_fuel_grid(10, 10);
        assert_eq!(grid.len(), 100);
        assert_eq!(grid[0], 101);
        assert_eq!(grid[1], 145);
        assert_eq!(grid[10], 145);
        assert_eq!(grid[11], 101);
    }
}
