//! Projected pollution field after tree deposition
//!
//! For every cell the contributions of all trees are summed and applied with
//! diminishing returns:
//!
//! ```text
//! f     = min(ΣR / C, f_max)              (f_max = 0.6)
//! C'    = max(C · (1 - f), min(C_floor, C))
//! PM10' = 1.4 · C'
//! reduction = f · 100 %
//! ```
//!
//! The floor never lifts a cell above its own baseline, so a cell that was
//! already cleaner than the floor is left untouched instead of being raised.
//!
//! # Complexity
//!
//! `O(cells × trees)`. Cells are processed in parallel with rayon; the inner
//! per-cell sum over trees is sequential, so results are bit-for-bit
//! reproducible. Planning grids (hundreds to a few hundred thousand cells,
//! tens of trees) are well within budget. Dense city-wide plantings would call
//! for bucketing trees into a coarse spatial grid and skipping buckets beyond
//! a cutoff where `exp(-d / L)` is negligible; the per-pair math would not
//! change.

use crate::atmosphere::StabilityClass;
use crate::core_types::units::{MetersPerSecond, MicrogramsPerCubicMeter, Percent};
use crate::core_types::wind::WindSample;
use crate::deposition::TreeEffect;
use crate::dispersion::plume::{tree_contribution, PlumeFrame};
use crate::grid::{GridCell, PollutionField};
use crate::interpolation::pm25_to_aqi;
use crate::simulation::config::{DepositionConfig, DispersionConfig};
use rayon::prelude::*;
use tracing::debug;

/// Applies tree effects to a baseline field
#[derive(Debug, Clone, Copy)]
pub struct DispersionEngine {
    config: DispersionConfig,
    stability: StabilityClass,
    reference_deposition_velocity: MetersPerSecond,
}

impl DispersionEngine {
    pub fn new(config: DispersionConfig, stability: StabilityClass) -> Self {
        Self {
            config,
            stability,
            reference_deposition_velocity: MetersPerSecond::new(
                DepositionConfig::default().base_deposition_velocity,
            ),
        }
    }

    /// Deposition velocity that maps to a unit source-strength multiplier
    pub fn with_reference_deposition_velocity(mut self, velocity: MetersPerSecond) -> Self {
        self.reference_deposition_velocity = velocity;
        self
    }

    /// Projected field with a reduction percentage on every cell
    pub fn project(
        &self,
        baseline: &PollutionField,
        effects: &[TreeEffect],
        wind: &WindSample,
    ) -> PollutionField {
        let frame = PlumeFrame::new(wind, self.stability, &self.config);

        debug!(
            "Dispersion: {} cells x {} trees, stability {}, u={:.2} m/s",
            baseline.len(),
            effects.len(),
            self.stability,
            *frame.wind_speed
        );

        let cells: Vec<GridCell> = baseline
            .cells()
            .par_iter()
            .map(|cell| {
                let total: f64 = effects
                    .iter()
                    .map(|effect| {
                        tree_contribution(
                            effect,
                            &cell.location,
                            &frame,
                            &self.config,
                            self.reference_deposition_velocity,
                        )
                    })
                    .sum();
                self.apply_reduction(cell, total)
            })
            .collect();

        PollutionField::from_cells(*baseline.geometry(), cells)
    }

    /// Apply a summed reduction (µg/m³) to one baseline cell
    pub fn apply_reduction(&self, cell: &GridCell, total_reduction: f64) -> GridCell {
        if total_reduction <= 0.0 {
            return GridCell {
                reduction: Some(Percent::ZERO),
                ..*cell
            };
        }

        let baseline = *cell.pm25;
        // baseline == 0 gives +inf here, which the cap turns into f_max
        let fraction = (total_reduction / baseline).min(self.config.max_reduction_fraction);
        let floor = self.config.concentration_floor.min(baseline);
        let projected = (baseline * (1.0 - fraction)).max(floor);

        GridCell {
            location: cell.location,
            pm25: MicrogramsPerCubicMeter::new(projected),
            pm10: MicrogramsPerCubicMeter::new(projected * self.config.pm10_ratio),
            aqi: pm25_to_aqi(projected),
            reduction: Some(Percent::from_fraction(fraction)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::geo::GeoPoint;

    fn engine() -> DispersionEngine {
        DispersionEngine::new(DispersionConfig::default(), StabilityClass::D)
    }

    fn cell(pm25: f64) -> GridCell {
        GridCell::new(GeoPoint::new(28.6, 77.2), pm25, pm25 * 1.4, pm25_to_aqi(pm25))
    }

    #[test]
    fn test_zero_reduction_leaves_cell_untouched() {
        let base = GridCell::new(GeoPoint::new(28.6, 77.2), 88.0, 131.0, 168);
        let out = engine().apply_reduction(&base, 0.0);
        assert_eq!(out.pm25, base.pm25);
        assert_eq!(out.pm10, base.pm10);
        assert_eq!(out.reduction, Some(Percent::ZERO));
    }

    #[test]
    fn test_partial_reduction() {
        let out = engine().apply_reduction(&cell(100.0), 8.52);
        assert!((*out.pm25 - 91.48).abs() < 1e-9);
        assert!((*out.pm10 - 91.48 * 1.4).abs() < 1e-9);
        assert!((*out.reduction.expect("processed") - 8.52).abs() < 1e-9);
    }

    #[test]
    fn test_reduction_capped_at_sixty_percent() {
        let out = engine().apply_reduction(&cell(100.0), 1.0e6);
        assert!((*out.pm25 - 40.0).abs() < 1e-9);
        assert!((*out.reduction.expect("processed") - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_floor_applied() {
        let out = engine().apply_reduction(&cell(20.0), 1.0e6);
        assert_eq!(*out.pm25, 10.0);
    }

    #[test]
    fn test_floor_never_raises_clean_cell() {
        let out = engine().apply_reduction(&cell(6.0), 3.0);
        assert_eq!(*out.pm25, 6.0);
    }

    #[test]
    fn test_zero_baseline_stays_finite() {
        let out = engine().apply_reduction(&cell(0.0), 5.0);
        assert_eq!(*out.pm25, 0.0);
        assert!((*out.reduction.expect("processed") - 60.0).abs() < 1e-9);
    }
}
