//! Fuel models and the catalog that holds them
//!
//! Parameters are a simplified subset of the Scott & Burgan (2005) standard
//! fire behavior fuel models (FBFM40). The catalog is an explicitly constructed,
//! immutable table: build one at startup and hand a reference to every
//! component that needs it.

use crate::error::{FireResult, FireSpreadError};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Parameterized description of a vegetation type's burning characteristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelModel {
    /// Identity code (e.g. "GR2")
    pub code: String,
    /// Display name
    pub name: String,
    /// Fuel load (tons/acre)
    pub fuel_load: f32,
    /// Surface-area-to-volume ratio (1/ft)
    pub sav_ratio: f32,
    /// Fuel bed depth (ft)
    pub fuel_bed_depth: f32,
    /// Dead fuel moisture above which combustion ceases (percent)
    pub moisture_of_extinction: f32,
}

impl FuelModel {
    /// Create a fuel model from its parameters
    pub fn new(
        code: &str,
        name: &str,
        fuel_load: f32,
        sav_ratio: f32,
        fuel_bed_depth: f32,
        moisture_of_extinction: f32,
    ) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            fuel_load,
            sav_ratio,
            fuel_bed_depth,
            moisture_of_extinction,
        }
    }

    /// GR1 - Short, sparse dry climate grass
    pub fn gr1() -> Self {
        Self::new("GR1", "Short, sparse dry climate grass", 0.1, 2200.0, 0.4, 15.0)
    }

    /// GR2 - Low load, dry climate grass
    pub fn gr2() -> Self {
        Self::new("GR2", "Low load, dry climate grass", 0.2, 2000.0, 1.0, 15.0)
    }

    /// SH5 - High load, dry climate shrub
    pub fn sh5() -> Self {
        Self::new("SH5", "High load, dry climate shrub", 3.5, 750.0, 6.0, 15.0)
    }

    /// TU1 - Light load, dry climate timber-grass-shrub
    pub fn tu1() -> Self {
        Self::new(
            "TU1",
            "Light load, dry climate timber-grass-shrub",
            0.6,
            1800.0,
            0.6,
            20.0,
        )
    }

    /// TL5 - Moderate load conifer litter
    pub fn tl5() -> Self {
        Self::new("TL5", "Moderate load conifer litter", 1.2, 1400.0, 0.3, 25.0)
    }
}

/// Immutable lookup table of fuel models keyed by code
#[derive(Debug, Clone)]
pub struct FuelModelCatalog {
    models: FxHashMap<String, FuelModel>,
}

impl FuelModelCatalog {
    /// The five canonical models used by the reference fuel mapping
    pub fn standard() -> Self {
        Self::from_models([
            FuelModel::gr1(),
            FuelModel::gr2(),
            FuelModel::sh5(),
            FuelModel::tu1(),
            FuelModel::tl5(),
        ])
    }

    /// Build a catalog from an arbitrary set of models
    ///
    /// A later model with a duplicate code replaces the earlier one.
    pub fn from_models(models: impl IntoIterator<Item = FuelModel>) -> Self {
        let models = models
            .into_iter()
            .map(|m| (m.code.clone(), m))
            .collect::<FxHashMap<_, _>>();
        Self { models }
    }

    /// Look up a fuel model by code
    ///
    /// # Errors
    /// Returns `UnknownFuelModel` if the code is not in the catalog
    pub fn get(&self, code: &str) -> FireResult<&FuelModel> {
        self.models
            .get(code)
            .ok_or_else(|| FireSpreadError::UnknownFuelModel {
                code: code.to_string(),
            })
    }

    /// Whether the catalog holds this code
    pub fn contains(&self, code: &str) -> bool {
        self.models.contains_key(code)
    }

    /// All codes, sorted for stable presentation
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.models.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Number of models in the catalog
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for FuelModelCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog() {
        let catalog = FuelModelCatalog::standard();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.codes(), vec!["GR1", "GR2", "SH5", "TL5", "TU1"]);

        let gr2 = catalog.get("GR2").unwrap();
        assert_eq!(gr2.fuel_load, 0.2);
        assert_eq!(gr2.sav_ratio, 2000.0);
        assert_eq!(gr2.moisture_of_extinction, 15.0);
    }

    #[test]
    fn test_unknown_code() {
        let catalog = FuelModelCatalog::standard();
        let err = catalog.get("FB4").unwrap_err();
        assert_eq!(
            err,
            FireSpreadError::UnknownFuelModel {
                code: "FB4".to_string()
            }
        );
    }

    #[test]
    fn test_custom_catalog_replaces_duplicates() {
        let mut heavy = FuelModel::gr1();
        heavy.fuel_load = 0.5;
        let catalog = FuelModelCatalog::from_models([FuelModel::gr1(), heavy]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("GR1").unwrap().fuel_load, 0.5);
    }
}
