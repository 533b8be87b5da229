//! City-level KPIs from a baseline/projected field pair
//!
//! ```text
//! reduction %  = (mean(C_base) - mean(C_proj)) / mean(C_base) · 100
//! coverage     = Σ π r²                       (km²)
//! beneficiaries = coverage · density · m      (m = 2)
//! removed      = Σ seasonal removal rate      (g/year, per pollutant)
//! ```

use crate::core_types::species::SpeciesCatalog;
use crate::core_types::tree::Tree;
use crate::core_types::units::Percent;
use crate::deposition::TreeEffect;
use crate::grid::{CityProfile, PollutionField};
use crate::interpolation::pm25_to_aqi;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;

/// Per-species counts and reporting totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesBreakdown {
    pub species_id: String,
    pub name: String,
    pub count: usize,
    pub co2_absorbed_kg_per_year: f64,
    pub cost: f64,
}

/// Scalar KPIs of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Trees handed to the run
    pub tree_count: usize,
    /// Trees with a known species
    pub effective_tree_count: usize,

    pub avg_baseline_pm25: f64,
    pub avg_projected_pm25: f64,
    pub avg_baseline_pm10: f64,
    pub avg_projected_pm10: f64,
    pub reduction_percentage: Percent,
    pub baseline_aqi: u16,
    pub projected_aqi: u16,

    /// Largest single-cell reduction
    pub max_cell_reduction: Percent,
    pub cells_improved: usize,

    /// Seasonally adjusted PM2.5 removal of all modeled trees
    pub pm25_removed_g_per_year: f64,
    pub pm10_removed_g_per_year: f64,

    pub coverage_area_km2: f64,
    pub population_benefited: f64,
    pub co2_absorbed_kg_per_year: f64,
    pub total_cost: f64,
    /// Sorted by species id
    pub species: Vec<SpeciesBreakdown>,
}

pub struct SummaryAggregator<'a> {
    catalog: &'a dyn SpeciesCatalog,
    population_multiplier: f64,
}

impl<'a> SummaryAggregator<'a> {
    pub fn new(catalog: &'a dyn SpeciesCatalog, population_multiplier: f64) -> Self {
        Self {
            catalog,
            population_multiplier,
        }
    }

    pub fn summarize(
        &self,
        baseline: &PollutionField,
        projected: &PollutionField,
        trees: &[Tree],
        effects: &[TreeEffect],
        city: &CityProfile,
    ) -> Summary {
        let avg_baseline_pm25 = baseline.mean_pm25();
        let avg_projected_pm25 = projected.mean_pm25();
        let reduction_percentage = if avg_baseline_pm25 > 0.0 {
            Percent::from_fraction((avg_baseline_pm25 - avg_projected_pm25) / avg_baseline_pm25)
        } else {
            Percent::ZERO
        };

        let max_cell_reduction = projected
            .iter()
            .filter_map(|c| c.reduction)
            .max()
            .unwrap_or(Percent::ZERO);
        let cells_improved = projected
            .iter()
            .filter(|c| c.reduction.is_some_and(|r| *r > 0.0))
            .count();

        let footprint_m2: f64 = effects
            .iter()
            .map(|e| PI * *e.canopy_radius * *e.canopy_radius)
            .sum();
        let coverage_area_km2 = footprint_m2 / 1_000_000.0;
        let population_benefited =
            coverage_area_km2 * city.population_density * self.population_multiplier;

        let pm25_removed_g_per_year = effects.iter().map(|e| e.effective_removal_rate).sum();
        let pm10_removed_g_per_year = effects.iter().map(|e| e.pm10_removal_rate).sum();

        let species = self.species_breakdown(effects);
        let co2_absorbed_kg_per_year = species.iter().map(|s| s.co2_absorbed_kg_per_year).sum();
        let total_cost = species.iter().map(|s| s.cost).sum();

        Summary {
            tree_count: trees.len(),
            effective_tree_count: effects.len(),
            avg_baseline_pm25,
            avg_projected_pm25,
            avg_baseline_pm10: baseline.mean_pm10(),
            avg_projected_pm10: projected.mean_pm10(),
            reduction_percentage,
            baseline_aqi: pm25_to_aqi(avg_baseline_pm25),
            projected_aqi: pm25_to_aqi(avg_projected_pm25),
            max_cell_reduction,
            cells_improved,
            pm25_removed_g_per_year,
            pm10_removed_g_per_year,
            coverage_area_km2,
            population_benefited,
            co2_absorbed_kg_per_year,
            total_cost,
            species,
        }
    }

    fn species_breakdown(&self, effects: &[TreeEffect]) -> Vec<SpeciesBreakdown> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for effect in effects {
            *counts.entry(effect.species_id.as_str()).or_default() += 1;
        }

        counts
            .into_iter()
            .filter_map(|(id, count)| {
                let species = self.catalog.get(id)?;
                Some(SpeciesBreakdown {
                    species_id: species.id.clone(),
                    name: species.name.clone(),
                    count,
                    co2_absorbed_kg_per_year: species.co2_absorption_kg_per_year * count as f64,
                    cost: species.cost_per_tree * count as f64,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::geo::GeoPoint;
    use crate::core_types::species::{InMemoryCatalog, SpeciesParameters};
    use crate::core_types::units::MetersPerSecond;
    use crate::grid::{CityBounds, GridCell, GridGeometry};
    use approx::assert_relative_eq;

    fn city() -> CityProfile {
        CityProfile {
            id: "test".into(),
            name: "Test".into(),
            bounds: CityBounds::new(0.002, 0.0, 0.002, 0.0),
            population_density: 10_000.0,
        }
    }

    fn field(values: &[f64], reduction: Option<f64>) -> PollutionField {
        let geometry = GridGeometry::new(city().bounds, 100.0).expect("geometry");
        assert_eq!(geometry.cell_count(), values.len());
        let cells = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let (row, col) = geometry.row_col(i);
                let mut cell =
                    GridCell::new(geometry.location(row, col), v, v * 1.4, pm25_to_aqi(v));
                cell.reduction = reduction.map(Percent::new);
                cell
            })
            .collect();
        PollutionField::from_cells(geometry, cells)
    }

    fn effect(id: &str, species: &SpeciesParameters) -> TreeEffect {
        TreeEffect {
            tree_id: id.into(),
            species_id: species.id.clone(),
            location: GeoPoint::new(0.001, 0.001),
            effective_removal_rate: species.pm25_absorption,
            pm10_removal_rate: species.pm10_absorption,
            deposition_velocity: MetersPerSecond::new(0.002),
            canopy_radius: species.canopy_radius(),
        }
    }

    #[test]
    fn test_reduction_percentage() {
        let catalog = InMemoryCatalog::with_defaults();
        let aggregator = SummaryAggregator::new(&catalog, 2.0);
        let baseline = field(&[100.0; 9], None);
        let projected = field(&[90.0; 9], Some(10.0));

        let summary = aggregator.summarize(&baseline, &projected, &[], &[], &city());
        assert_relative_eq!(*summary.reduction_percentage, 10.0, max_relative = 1e-12);
        assert_eq!(summary.cells_improved, 9);
        assert_eq!(*summary.max_cell_reduction, 10.0);
        assert_eq!(summary.baseline_aqi, pm25_to_aqi(100.0));
    }

    #[test]
    fn test_coverage_population_and_costs() {
        let catalog = InMemoryCatalog::with_defaults();
        let aggregator = SummaryAggregator::new(&catalog, 2.0);
        let neem = SpeciesParameters::neem();
        let effects = vec![effect("a", &neem), effect("b", &neem)];
        let baseline = field(&[50.0; 9], None);

        let summary = aggregator.summarize(&baseline, &baseline, &[], &effects, &city());

        // 2 · π · 6² m²
        let coverage = 2.0 * PI * 36.0 / 1_000_000.0;
        assert_relative_eq!(summary.coverage_area_km2, coverage, max_relative = 1e-12);
        assert_relative_eq!(
            summary.population_benefited,
            coverage * 10_000.0 * 2.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(summary.pm25_removed_g_per_year, 2.0 * neem.pm25_absorption);
        assert_relative_eq!(summary.pm10_removed_g_per_year, 2.0 * neem.pm10_absorption);
        assert_relative_eq!(summary.co2_absorbed_kg_per_year, 44.0);
        assert_relative_eq!(summary.total_cost, 900.0);
        assert_eq!(summary.species.len(), 1);
        assert_eq!(summary.species[0].count, 2);
        assert_eq!(*summary.reduction_percentage, 0.0);
    }

    #[test]
    fn test_zero_baseline_reports_no_reduction() {
        let catalog = InMemoryCatalog::new();
        let aggregator = SummaryAggregator::new(&catalog, 2.0);
        let baseline = field(&[0.0; 9], None);
        let summary = aggregator.summarize(&baseline, &baseline, &[], &[], &city());
        assert_eq!(summary.reduction_percentage, Percent::ZERO);
        assert_eq!(summary.max_cell_reduction, Percent::ZERO);
    }
}
