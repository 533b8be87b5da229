//! Tunable constants for every pipeline stage
//!
//! The plume constants (near-field credit, decay length, scale factors) are
//! empirical calibration knobs for a bounded decision-support approximation.
//! They are exposed here so planners can calibrate against local monitoring
//! data; the defaults reproduce the reference behaviour.

use serde::{Deserialize, Serialize};

/// Empirical PM10 : PM2.5 mass ratio used wherever PM10 is not measured
pub const PM10_TO_PM25_RATIO: f64 = 1.4;

/// Inverse-distance-weighting parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Distance exponent (2 = inverse square)
    pub power: f64,
    /// Stations closer than this (km) get the pinned weight
    pub near_threshold_km: f64,
    /// Weight assigned to near-colocated stations
    pub near_weight: f64,
    /// PM2.5 returned when no usable station exists (µg/m³).
    /// Deliberately high: an empty station list must never read as clean air.
    pub default_pm25: f64,
    pub pm10_ratio: f64,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            power: 2.0,
            near_threshold_km: 0.1,
            near_weight: 1000.0,
            default_pm25: 150.0,
            pm10_ratio: PM10_TO_PM25_RATIO,
        }
    }
}

/// Per-tree deposition parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepositionConfig {
    /// PM2.5 deposition velocity at the reference LAI (m/s)
    pub base_deposition_velocity: f64,
    /// Leaf area index the base velocity is quoted for
    pub reference_lai: f64,
}

impl Default for DepositionConfig {
    fn default() -> Self {
        Self {
            base_deposition_velocity: 0.002,
            reference_lai: 5.0,
        }
    }
}

/// Plume / reduction model parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispersionConfig {
    /// Fraction of the removal rate credited to cells under the canopy
    pub near_field_credit: f64,
    /// Characteristic length of the `exp(-d / L)` attenuation (m)
    pub decay_length_m: f64,
    /// Final scale applied to the plume term
    pub plume_scale: f64,
    /// Multiplier turning a removal rate into plume source strength `Q`
    pub source_strength_scale: f64,
    /// Upper bound on the per-cell reduction fraction
    pub max_reduction_fraction: f64,
    /// Minimum residual PM2.5 (µg/m³)
    pub concentration_floor: f64,
    /// Wind speed floor before division (km/h)
    pub min_wind_kmh: f64,
    /// Distance floor before division (m)
    pub min_distance_m: f64,
    pub pm10_ratio: f64,
}

impl Default for DispersionConfig {
    fn default() -> Self {
        Self {
            near_field_credit: 0.3,
            decay_length_m: 500.0,
            plume_scale: 0.001,
            source_strength_scale: 1000.0,
            max_reduction_fraction: 0.6,
            concentration_floor: 10.0,
            min_wind_kmh: 1.0,
            min_distance_m: 1.0,
            pm10_ratio: PM10_TO_PM25_RATIO,
        }
    }
}

/// Impact-zone polygon parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactZoneConfig {
    /// Zone length in canopy radii at calm wind
    pub length_factor: f64,
    /// Wind speed (km/h) that doubles the zone length
    pub wind_reference_kmh: f64,
    /// Far-edge width as a fraction of the canopy radius
    pub far_width_factor: f64,
}

impl Default for ImpactZoneConfig {
    fn default() -> Self {
        Self {
            length_factor: 10.0,
            wind_reference_kmh: 30.0,
            far_width_factor: 0.5,
        }
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Grid resolution in meters
    pub grid_resolution_m: f64,
    /// Refuse grids larger than this many cells
    pub max_cells: usize,
    /// First daytime hour (inclusive, local time)
    pub daytime_start_hour: u8,
    /// First nighttime hour (exclusive end of daytime)
    pub daytime_end_hour: u8,
    /// Footprint-to-beneficiary multiplier for the population KPI
    pub population_benefit_multiplier: f64,

    pub interpolation: InterpolationConfig,
    pub deposition: DepositionConfig,
    pub dispersion: DispersionConfig,
    pub impact_zone: ImpactZoneConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_resolution_m: 100.0,
            max_cells: 1_000_000,
            daytime_start_hour: 6,
            daytime_end_hour: 18,
            population_benefit_multiplier: 2.0,
            interpolation: InterpolationConfig::default(),
            deposition: DepositionConfig::default(),
            dispersion: DispersionConfig::default(),
            impact_zone: ImpactZoneConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Whether `hour` (0-23) falls in the configured daytime window
    pub fn is_daytime(&self, hour: u8) -> bool {
        (self.daytime_start_hour..self.daytime_end_hour).contains(&hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daytime_window() {
        let config = SimulationConfig::default();
        assert!(!config.is_daytime(5));
        assert!(config.is_daytime(6));
        assert!(config.is_daytime(17));
        assert!(!config.is_daytime(18));
        assert!(!config.is_daytime(0));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{ "grid_resolution_m": 250.0, "dispersion": { "decay_length_m": 800.0 } }"#;
        let config: SimulationConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(config.grid_resolution_m, 250.0);
        assert_eq!(config.dispersion.decay_length_m, 800.0);
        assert_eq!(config.dispersion.near_field_credit, 0.3);
        assert_eq!(config.interpolation, InterpolationConfig::default());
    }
}
