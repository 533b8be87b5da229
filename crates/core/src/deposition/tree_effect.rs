//! Per-tree deposition parameters for one run
//!
//! Removal scales with foliage: the species' full-leaf absorption rate is
//! multiplied by its seasonal efficiency, and the PM2.5 deposition velocity is
//! normalised linearly against a reference leaf area index:
//!
//! ```text
//! rate = absorption_pm25 · efficiency(season)
//! v_d  = v_d,base · (LAI / LAI_ref)
//! r    = canopy_diameter / 2
//! ```

use crate::core_types::geo::GeoPoint;
use crate::core_types::species::{Season, SpeciesCatalog};
use crate::core_types::tree::Tree;
use crate::core_types::units::{Meters, MetersPerSecond};
use crate::simulation::config::DepositionConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Deposition characteristics of one placed tree in the current season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEffect {
    pub tree_id: String,
    pub species_id: String,
    pub location: GeoPoint,
    /// PM2.5 removal after seasonal adjustment (g/tree/year)
    pub effective_removal_rate: f64,
    /// PM10 removal after seasonal adjustment (g/tree/year)
    pub pm10_removal_rate: f64,
    pub deposition_velocity: MetersPerSecond,
    pub canopy_radius: Meters,
}

/// Turns placed trees into [`TreeEffect`]s using an injected catalog
pub struct TreeEffectModel<'a> {
    catalog: &'a dyn SpeciesCatalog,
    config: DepositionConfig,
}

impl<'a> TreeEffectModel<'a> {
    pub fn new(catalog: &'a dyn SpeciesCatalog, config: DepositionConfig) -> Self {
        Self { catalog, config }
    }

    /// Effect of a single tree, `None` when its species is unknown
    pub fn effect_for(&self, tree: &Tree, season: Season) -> Option<TreeEffect> {
        let species = self.catalog.get(&tree.species_id)?;
        let efficiency = species.seasonal_efficiency.for_season(season);

        let lai_ratio = species.leaf_area_index / self.config.reference_lai;
        let deposition_velocity =
            MetersPerSecond::new(self.config.base_deposition_velocity * lai_ratio);

        Some(TreeEffect {
            tree_id: tree.id.clone(),
            species_id: species.id.clone(),
            location: tree.location,
            effective_removal_rate: species.pm25_absorption * efficiency,
            pm10_removal_rate: species.pm10_absorption * efficiency,
            deposition_velocity,
            canopy_radius: species.canopy_radius(),
        })
    }

    /// Effects for every tree with a known species, in input order.
    ///
    /// Trees referencing an unknown species are dropped; one bad reference
    /// never fails the run.
    pub fn compute_effects(&self, trees: &[Tree], season: Season) -> Vec<TreeEffect> {
        let effects: Vec<TreeEffect> = trees
            .iter()
            .filter_map(|tree| {
                let effect = self.effect_for(tree, season);
                if effect.is_none() {
                    warn!(
                        "Dropping tree '{}': unknown species '{}'",
                        tree.id, tree.species_id
                    );
                }
                effect
            })
            .collect();

        debug!(
            "Computed {} tree effect(s) for {} tree(s) in {}",
            effects.len(),
            trees.len(),
            season
        );
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::species::InMemoryCatalog;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn tree(id: &str, species: &str) -> Tree {
        Tree::new(
            id,
            GeoPoint::new(28.6, 77.2),
            species,
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_neem_in_spring() {
        let catalog = InMemoryCatalog::with_defaults();
        let model = TreeEffectModel::new(&catalog, DepositionConfig::default());
        let effect = model
            .effect_for(&tree("t1", "neem"), Season::Spring)
            .expect("neem is a preset");

        assert_eq!(effect.tree_id, "t1");
        assert_eq!(effect.effective_removal_rate, 28.4);
        // 0.002 · 4.5 / 5
        assert_relative_eq!(*effect.deposition_velocity, 0.0018, max_relative = 1e-12);
        assert_eq!(*effect.canopy_radius, 6.0);
    }

    #[test]
    fn test_deciduous_winter_rate_near_zero() {
        let catalog = InMemoryCatalog::with_defaults();
        let model = TreeEffectModel::new(&catalog, DepositionConfig::default());
        let winter = model
            .effect_for(&tree("p", "london_plane"), Season::Winter)
            .expect("preset");
        let summer = model
            .effect_for(&tree("p", "london_plane"), Season::Summer)
            .expect("preset");
        assert!(winter.effective_removal_rate < 0.1 * summer.effective_removal_rate);
        // Geometry does not change with the season
        assert_eq!(winter.canopy_radius, summer.canopy_radius);
    }

    #[test]
    fn test_unknown_species_dropped() {
        let catalog = InMemoryCatalog::with_defaults();
        let model = TreeEffectModel::new(&catalog, DepositionConfig::default());
        let trees = vec![tree("a", "neem"), tree("b", "triffid"), tree("c", "banyan")];
        let effects = model.compute_effects(&trees, Season::Summer);

        let ids: Vec<&str> = effects.iter().map(|e| e.tree_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
