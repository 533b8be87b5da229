//! Single-tree contribution to the reduction at one grid cell
//!
//! Each tree is treated as a sink whose "deposition shadow" is carried
//! downwind like a ground-level Gaussian plume:
//!
//! ```text
//! inside canopy (d ≤ r):   R = k_near · rate
//! upwind        (x < 0):   R = 0
//! downwind:                R = Q / (2π · u · σ'y) · exp(-y² / (2 σ'y²))
//!                              · exp(-d / L) · s
//!
//!   σ'y = σy(x, class) + 1      Q = rate · (v_d / v_d,ref) · q_scale
//! ```
//!
//! `x` and `y` are the downwind and crosswind components of the tree→cell
//! offset, `d` its length, `u` the floored wind speed in m/s.

use crate::atmosphere::StabilityClass;
use crate::core_types::geo::GeoPoint;
use crate::core_types::units::{KilometersPerHour, MetersPerSecond};
use crate::core_types::wind::WindSample;
use crate::deposition::TreeEffect;
use crate::simulation::config::DispersionConfig;
use nalgebra::Vector2;
use std::f64::consts::PI;

/// Wind-aligned frame shared by every tree/cell pair of a run
#[derive(Debug, Clone, Copy)]
pub struct PlumeFrame {
    pub downwind: Vector2<f64>,
    pub crosswind: Vector2<f64>,
    pub wind_speed: MetersPerSecond,
    pub stability: StabilityClass,
}

impl PlumeFrame {
    pub fn new(wind: &WindSample, stability: StabilityClass, config: &DispersionConfig) -> Self {
        Self {
            downwind: wind.downwind_unit(),
            crosswind: wind.crosswind_unit(),
            wind_speed: wind.floored_speed(KilometersPerHour::new(config.min_wind_kmh)),
            stability,
        }
    }

    /// Split an offset into `(downwind, |crosswind|)` components
    #[inline]
    pub fn decompose(&self, offset: &Vector2<f64>) -> (f64, f64) {
        (offset.dot(&self.downwind), offset.dot(&self.crosswind).abs())
    }
}

/// Reduction (µg/m³) credited to `cell` by one tree
pub fn tree_contribution(
    effect: &TreeEffect,
    cell: &GeoPoint,
    frame: &PlumeFrame,
    config: &DispersionConfig,
    reference_deposition_velocity: MetersPerSecond,
) -> f64 {
    let offset = effect.location.offset_to(cell);
    let distance = offset.norm();

    if distance <= *effect.canopy_radius {
        return config.near_field_credit * effect.effective_removal_rate;
    }

    let (downwind, crosswind) = frame.decompose(&offset);
    if downwind < 0.0 {
        return 0.0;
    }

    let sigma_y = *frame.stability.dispersion_coefficients(downwind).sigma_y + 1.0;
    let source_strength = effect.effective_removal_rate
        * (*effect.deposition_velocity / *reference_deposition_velocity)
        * config.source_strength_scale;

    let plume = source_strength / (2.0 * PI * *frame.wind_speed * sigma_y)
        * (-(crosswind * crosswind) / (2.0 * sigma_y * sigma_y)).exp();
    let decay = (-distance.max(config.min_distance_m) / config.decay_length_m).exp();

    plume * decay * config.plume_scale
}
