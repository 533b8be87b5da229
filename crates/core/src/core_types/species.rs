//! Tree species reference data
//!
//! Species parameters are an external, read-only table as far as the
//! simulation is concerned. The [`SpeciesCatalog`] trait is the seam the
//! pipeline consumes; [`InMemoryCatalog`] is the stock implementation with a
//! set of common urban street-tree presets.
//!
//! # Scientific References
//! - Nowak, D.J. et al. (2006). "Air pollution removal by urban trees and
//!   shrubs in the United States." Urban Forestry & Urban Greening, 4, 115-123.
//! - Nowak, D.J. et al. (2013). "Modeled PM2.5 removal by trees in ten U.S.
//!   cities and associated health effects." Environmental Pollution, 178, 395-402.
//! - Janhäll, S. (2015). "Review on urban vegetation and particle air
//!   pollution - Deposition and dispersion." Atmospheric Environment, 105, 130-137.

use crate::core_types::units::Meters;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Meteorological season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    /// Northern-hemisphere meteorological season for a calendar month (1-12)
    pub fn from_month(month: u32) -> Option<Season> {
        match month {
            12 | 1 | 2 => Some(Season::Winter),
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Autumn),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        if lower == "fall" {
            return Ok(Season::Autumn);
        }
        Season::ALL
            .into_iter()
            .find(|season| season.name() == lower)
            .ok_or_else(|| {
                let names = Season::ALL.map(Season::name).join(", ");
                format!("unknown season '{lower}', expected one of {names}")
            })
    }
}

/// Foliage-driven absorption multiplier per season (1.0 = full leaf)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalEfficiency {
    pub winter: f64,
    pub spring: f64,
    pub summer: f64,
    pub autumn: f64,
}

impl SeasonalEfficiency {
    /// Broadleaf evergreen - small dip during the dry/cold months
    pub const EVERGREEN: SeasonalEfficiency = SeasonalEfficiency {
        winter: 0.85,
        spring: 1.0,
        summer: 0.95,
        autumn: 0.9,
    };

    /// Semi-deciduous - sheds a large part of the canopy in winter
    pub const SEMI_DECIDUOUS: SeasonalEfficiency = SeasonalEfficiency {
        winter: 0.4,
        spring: 0.8,
        summer: 1.0,
        autumn: 0.7,
    };

    /// Deciduous - effectively leafless in winter
    pub const DECIDUOUS: SeasonalEfficiency = SeasonalEfficiency {
        winter: 0.05,
        spring: 0.7,
        summer: 1.0,
        autumn: 0.6,
    };

    #[inline]
    pub fn for_season(&self, season: Season) -> f64 {
        match season {
            Season::Winter => self.winter,
            Season::Spring => self.spring,
            Season::Summer => self.summer,
            Season::Autumn => self.autumn,
        }
    }
}

/// Fixed physical and absorption parameters of a species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesParameters {
    pub id: String,
    pub name: String,
    pub scientific_name: String,

    // Absorption
    pub pm25_absorption: f64, // g/tree/year at full leaf
    pub pm10_absorption: f64, // g/tree/year at full leaf
    pub leaf_area_index: f64, // m²/m² (one-sided)
    pub seasonal_efficiency: SeasonalEfficiency,

    // Geometry
    pub canopy_diameter: Meters, // mature crown spread

    // Reporting only
    pub co2_absorption_kg_per_year: f64,
    pub cost_per_tree: f64,
}

impl SpeciesParameters {
    /// Neem (Azadirachta indica) - hardy evergreen, the default street tree
    pub fn neem() -> Self {
        SpeciesParameters {
            id: "neem".into(),
            name: "Neem".into(),
            scientific_name: "Azadirachta indica".into(),
            pm25_absorption: 28.4,
            pm10_absorption: 45.2,
            leaf_area_index: 4.5,
            seasonal_efficiency: SeasonalEfficiency::EVERGREEN,
            canopy_diameter: Meters::new(12.0),
            co2_absorption_kg_per_year: 22.0,
            cost_per_tree: 450.0,
        }
    }

    /// Peepal (Ficus religiosa) - large, dense crown
    pub fn peepal() -> Self {
        SpeciesParameters {
            id: "peepal".into(),
            name: "Peepal".into(),
            scientific_name: "Ficus religiosa".into(),
            pm25_absorption: 32.1,
            pm10_absorption: 51.0,
            leaf_area_index: 5.2,
            seasonal_efficiency: SeasonalEfficiency::EVERGREEN,
            canopy_diameter: Meters::new(15.0),
            co2_absorption_kg_per_year: 28.5,
            cost_per_tree: 600.0,
        }
    }

    /// Banyan (Ficus benghalensis) - widest crown of the presets
    pub fn banyan() -> Self {
        SpeciesParameters {
            id: "banyan".into(),
            name: "Banyan".into(),
            scientific_name: "Ficus benghalensis".into(),
            pm25_absorption: 35.7,
            pm10_absorption: 58.3,
            leaf_area_index: 6.1,
            seasonal_efficiency: SeasonalEfficiency::EVERGREEN,
            canopy_diameter: Meters::new(20.0),
            co2_absorption_kg_per_year: 31.0,
            cost_per_tree: 800.0,
        }
    }

    /// Ashoka (Saraca asoca) - narrow columnar form for tight verges
    pub fn ashoka() -> Self {
        SpeciesParameters {
            id: "ashoka".into(),
            name: "Ashoka".into(),
            scientific_name: "Saraca asoca".into(),
            pm25_absorption: 18.2,
            pm10_absorption: 29.5,
            leaf_area_index: 3.8,
            seasonal_efficiency: SeasonalEfficiency::EVERGREEN,
            canopy_diameter: Meters::new(6.0),
            co2_absorption_kg_per_year: 12.5,
            cost_per_tree: 350.0,
        }
    }

    /// Jamun (Syzygium cumini)
    pub fn jamun() -> Self {
        SpeciesParameters {
            id: "jamun".into(),
            name: "Jamun".into(),
            scientific_name: "Syzygium cumini".into(),
            pm25_absorption: 24.6,
            pm10_absorption: 39.8,
            leaf_area_index: 4.6,
            seasonal_efficiency: SeasonalEfficiency::EVERGREEN,
            canopy_diameter: Meters::new(10.0),
            co2_absorption_kg_per_year: 19.0,
            cost_per_tree: 400.0,
        }
    }

    /// Gulmohar (Delonix regia) - semi-deciduous ornamental
    pub fn gulmohar() -> Self {
        SpeciesParameters {
            id: "gulmohar".into(),
            name: "Gulmohar".into(),
            scientific_name: "Delonix regia".into(),
            pm25_absorption: 15.3,
            pm10_absorption: 24.1,
            leaf_area_index: 3.2,
            seasonal_efficiency: SeasonalEfficiency::SEMI_DECIDUOUS,
            canopy_diameter: Meters::new(10.0),
            co2_absorption_kg_per_year: 11.0,
            cost_per_tree: 380.0,
        }
    }

    /// London plane (Platanus × acerifolia) - deciduous, leafless in winter
    pub fn london_plane() -> Self {
        SpeciesParameters {
            id: "london_plane".into(),
            name: "London Plane".into(),
            scientific_name: "Platanus × acerifolia".into(),
            pm25_absorption: 26.0,
            pm10_absorption: 41.0,
            leaf_area_index: 5.0,
            seasonal_efficiency: SeasonalEfficiency::DECIDUOUS,
            canopy_diameter: Meters::new(14.0),
            co2_absorption_kg_per_year: 24.0,
            cost_per_tree: 700.0,
        }
    }

    /// All built-in presets
    pub fn presets() -> Vec<SpeciesParameters> {
        vec![
            Self::neem(),
            Self::peepal(),
            Self::banyan(),
            Self::ashoka(),
            Self::jamun(),
            Self::gulmohar(),
            Self::london_plane(),
        ]
    }

    /// Crown radius (half the mature canopy diameter)
    #[inline]
    pub fn canopy_radius(&self) -> Meters {
        self.canopy_diameter / 2.0
    }
}

/// Read-only species lookup
pub trait SpeciesCatalog: Send + Sync {
    fn get(&self, id: &str) -> Option<&SpeciesParameters>;
}

/// Hash-map backed catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    species: FxHashMap<String, SpeciesParameters>,
}

impl InMemoryCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-populated with [`SpeciesParameters::presets`]
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for species in SpeciesParameters::presets() {
            catalog.insert(species);
        }
        catalog
    }

    /// Insert or replace a species, keyed by its id
    pub fn insert(&mut self, species: SpeciesParameters) {
        self.species.insert(species.id.clone(), species);
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Species ids in sorted order
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.species.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl SpeciesCatalog for InMemoryCatalog {
    fn get(&self, id: &str) -> Option<&SpeciesParameters> {
        self.species.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_to_season() {
        assert_eq!(Season::from_month(1), Some(Season::Winter));
        assert_eq!(Season::from_month(12), Some(Season::Winter));
        assert_eq!(Season::from_month(4), Some(Season::Spring));
        assert_eq!(Season::from_month(7), Some(Season::Summer));
        assert_eq!(Season::from_month(10), Some(Season::Autumn));
        assert_eq!(Season::from_month(0), None);
        assert_eq!(Season::from_month(13), None);
    }

    #[test]
    fn test_season_parse() {
        assert_eq!("Fall".parse::<Season>(), Ok(Season::Autumn));
        assert_eq!("SUMMER".parse::<Season>(), Ok(Season::Summer));
        assert_eq!(
            "monsoon".parse::<Season>(),
            Err("unknown season 'monsoon', expected one of winter, spring, summer, autumn".into())
        );
    }

    #[test]
    fn test_deciduous_nearly_zero_in_winter() {
        let plane = SpeciesParameters::london_plane();
        assert!(plane.seasonal_efficiency.for_season(Season::Winter) < 0.1);
        assert_eq!(plane.seasonal_efficiency.for_season(Season::Summer), 1.0);
    }

    #[test]
    fn test_default_catalog_lookup() {
        let catalog = InMemoryCatalog::with_defaults();
        assert_eq!(catalog.len(), SpeciesParameters::presets().len());

        let neem = catalog.get("neem").expect("neem preset");
        assert_eq!(neem.pm25_absorption, 28.4);
        assert_eq!(*neem.canopy_radius(), 6.0);
        assert!(catalog.get("baobab").is_none());
        assert!(catalog.ids().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut catalog = InMemoryCatalog::with_defaults();
        let mut custom = SpeciesParameters::neem();
        custom.pm25_absorption = 40.0;
        catalog.insert(custom);
        assert_eq!(catalog.get("neem").map(|s| s.pm25_absorption), Some(40.0));
    }
}
