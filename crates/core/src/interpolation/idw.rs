//! Inverse-distance-weighted interpolation of station readings
//!
//! ```text
//! w_i = 1 / d_i^p            (d_i ≥ near threshold)
//! w_i = W_near               (d_i <  near threshold)
//! C(x) = Σ w_i·C_i / Σ w_i
//! ```
//!
//! `d_i` is the Haversine distance in kilometres. Pinning the weight of
//! near-colocated stations removes the `1/0` singularity and lets a station
//! sitting on the query point dominate the average.
//!
//! The result is a convex combination of the station values, so it always lies
//! between the smallest and largest reading.

use crate::core_types::geo::GeoPoint;
use crate::core_types::station::StationReading;
use crate::grid::{CityBounds, GridCell, GridError, GridGeometry, PollutionField};
use crate::interpolation::aqi::pm25_to_aqi;
use crate::simulation::config::InterpolationConfig;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while building a baseline field
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("station '{0}' has a non-finite coordinate")]
    NonFiniteStation(String),
}

/// Interpolated concentrations at one point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpolatedReading {
    pub pm25: f64,
    pub pm10: f64,
    pub aqi: u16,
}

/// IDW interpolator over a borrowed station snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldInterpolator {
    config: InterpolationConfig,
}

impl FieldInterpolator {
    pub fn new(config: InterpolationConfig) -> Self {
        Self { config }
    }

    /// Weight of a station `distance_km` away
    #[inline]
    fn weight(&self, distance_km: f64) -> f64 {
        if distance_km < self.config.near_threshold_km {
            self.config.near_weight
        } else {
            1.0 / distance_km.powf(self.config.power)
        }
    }

    /// Reading to fall back on when no usable station exists
    pub fn default_reading(&self) -> InterpolatedReading {
        let pm25 = self.config.default_pm25;
        InterpolatedReading {
            pm25,
            pm10: pm25 * self.config.pm10_ratio,
            aqi: pm25_to_aqi(pm25),
        }
    }

    /// Interpolate PM2.5 / PM10 / AQI at `point`.
    ///
    /// Stations without a usable PM2.5 value or coordinate are ignored.
    /// Stations without PM10 contribute `pm10_ratio × PM2.5` to the PM10
    /// average.
    pub fn interpolate(
        &self,
        point: &GeoPoint,
        stations: &[StationReading],
    ) -> InterpolatedReading {
        let mut weight_sum = 0.0;
        let mut pm25_sum = 0.0;
        let mut pm10_sum = 0.0;

        for station in stations.iter().filter(|s| s.is_usable()) {
            let distance = *point.haversine_distance(&station.location);
            let w = self.weight(distance);
            let pm25 = *station.pm25;
            let pm10 = station
                .pm10
                .filter(|v| v.is_finite())
                .map_or(pm25 * self.config.pm10_ratio, f64::from);

            weight_sum += w;
            pm25_sum += w * pm25;
            pm10_sum += w * pm10;
        }

        if weight_sum <= 0.0 {
            return self.default_reading();
        }

        let pm25 = pm25_sum / weight_sum;
        InterpolatedReading {
            pm25,
            pm10: pm10_sum / weight_sum,
            aqi: pm25_to_aqi(pm25),
        }
    }

    /// Reject stations whose coordinate is not a finite number
    ///
    /// # Errors
    /// Returns [`FieldError::NonFiniteStation`] naming the first such station
    pub fn check_stations(stations: &[StationReading]) -> Result<(), FieldError> {
        match stations.iter().find(|s| !s.location.is_finite()) {
            Some(station) => Err(FieldError::NonFiniteStation(station.id.clone())),
            None => Ok(()),
        }
    }

    /// Interpolate over every cell of `bounds` at `step_m` resolution
    ///
    /// # Errors
    /// Returns [`FieldError`] when the bounds or step are invalid or a station
    /// has a non-finite coordinate
    pub fn build_field(
        &self,
        bounds: &CityBounds,
        stations: &[StationReading],
        step_m: f64,
    ) -> Result<PollutionField, FieldError> {
        Self::check_stations(stations)?;
        let geometry = GridGeometry::new(*bounds, step_m)?;
        Ok(self.build_field_on(&geometry, stations))
    }

    /// Interpolate over every cell of an already validated layout
    pub fn build_field_on(
        &self,
        geometry: &GridGeometry,
        stations: &[StationReading],
    ) -> PollutionField {
        let usable = stations.iter().filter(|s| s.is_usable()).count();
        if usable == 0 {
            warn!(
                "No usable station readings ({} supplied); baseline falls back to {:.1} µg/m³",
                stations.len(),
                self.config.default_pm25
            );
        } else if usable < stations.len() {
            warn!(
                "Ignoring {} station reading(s) without a usable PM2.5 value or coordinate",
                stations.len() - usable
            );
        }

        let cells: Vec<GridCell> = (0..geometry.cell_count())
            .into_par_iter()
            .map(|index| {
                let (row, col) = geometry.row_col(index);
                let location = geometry.location(row, col);
                let reading = self.interpolate(&location, stations);
                GridCell::new(location, reading.pm25, reading.pm10, reading.aqi)
            })
            .collect();

        debug!(
            "Baseline field built: {}x{} cells from {} station(s)",
            geometry.rows, geometry.cols, usable
        );

        PollutionField::from_cells(*geometry, cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn interpolator() -> FieldInterpolator {
        FieldInterpolator::new(InterpolationConfig::default())
    }

    #[test]
    fn test_station_on_point_returns_its_reading() {
        let here = GeoPoint::new(28.6139, 77.2090);
        let stations = vec![
            StationReading::new("on-site", here, 180.0).with_pm10(260.0),
            StationReading::new("far", GeoPoint::new(28.70, 77.10), 90.0),
        ];
        let reading = interpolator().interpolate(&here, &stations);
        // Pinned weight 1000 against 1/d² ≈ 0.005 for the ~14 km station
        assert_relative_eq!(reading.pm25, 180.0, max_relative = 1e-4);
        assert_relative_eq!(reading.pm10, 260.0, max_relative = 1e-3);
    }

    #[test]
    fn test_single_station_exact() {
        let here = GeoPoint::new(28.6, 77.2);
        let stations = vec![StationReading::new("only", here, 73.5)];
        let reading = interpolator().interpolate(&here, &stations);
        assert_eq!(reading.pm25, 73.5);
        assert_relative_eq!(reading.pm10, 73.5 * 1.4);
    }

    #[test]
    fn test_equidistant_stations_average() {
        let here = GeoPoint::new(0.0, 0.0);
        let stations = vec![
            StationReading::new("n", GeoPoint::new(0.05, 0.0), 100.0),
            StationReading::new("s", GeoPoint::new(-0.05, 0.0), 50.0),
        ];
        let reading = interpolator().interpolate(&here, &stations);
        assert_relative_eq!(reading.pm25, 75.0, max_relative = 1e-9);
    }

    #[test]
    fn test_no_stations_fails_high() {
        let reading = interpolator().interpolate(&GeoPoint::new(0.0, 0.0), &[]);
        assert_eq!(reading.pm25, 150.0);
        assert_eq!(reading.pm10, 210.0);
        assert!(reading.aqi > 150);
    }

    #[test]
    fn test_unusable_stations_ignored() {
        let here = GeoPoint::new(0.0, 0.0);
        let stations = vec![
            StationReading::new("nan", GeoPoint::new(0.01, 0.0), f64::NAN),
            StationReading::new("neg", GeoPoint::new(0.02, 0.0), -5.0),
            StationReading::new("ok", GeoPoint::new(0.03, 0.0), 42.0),
        ];
        let reading = interpolator().interpolate(&here, &stations);
        assert_relative_eq!(reading.pm25, 42.0, max_relative = 1e-12);
    }

    #[test]
    fn test_build_field_dimensions() {
        let bounds = CityBounds::new(0.005, 0.0, 0.005, 0.0);
        let stations = vec![StationReading::new("a", GeoPoint::new(0.0025, 0.0025), 60.0)];
        let field = interpolator()
            .build_field(&bounds, &stations, 100.0)
            .expect("valid layout");
        assert_eq!(field.rows(), 6);
        assert_eq!(field.cols(), 6);
        assert!(field.iter().all(|c| (*c.pm25 - 60.0).abs() < 1e-9));
        assert!(field.iter().all(|c| c.reduction.is_none()));
    }

    #[test]
    fn test_build_field_rejects_non_finite_station() {
        let bounds = CityBounds::new(28.7, 28.6, 77.3, 77.2);
        let stations = vec![
            StationReading::new("ok", GeoPoint::new(28.65, 77.25), 80.0),
            StationReading::new("broken", GeoPoint::new(f64::NAN, 77.2), 300.0),
        ];
        assert_eq!(
            interpolator().build_field(&bounds, &stations, 500.0),
            Err(FieldError::NonFiniteStation("broken".into()))
        );
    }

    #[test]
    fn test_non_finite_station_skipped_by_point_query() {
        let here = GeoPoint::new(28.65, 77.25);
        let stations = vec![
            StationReading::new("ok", here, 80.0),
            StationReading::new("broken", GeoPoint::new(f64::NAN, 77.2), 300.0),
        ];
        let reading = interpolator().interpolate(&here, &stations);
        assert_eq!(reading.pm25, 80.0);
    }

    #[test]
    fn test_build_field_grid_errors_pass_through() {
        let bounds = CityBounds::new(28.7, 28.6, 77.3, 77.2);
        assert_eq!(
            interpolator().build_field(&bounds, &[], 0.0),
            Err(FieldError::Grid(GridError::InvalidStep(0.0)))
        );
    }
}
