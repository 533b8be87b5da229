//! Geographic coordinates and the two distance approximations used by the pipeline
//!
//! - **Haversine** great-circle distance for station-to-point weighting, where
//!   stations can be tens of kilometres apart.
//! - **Equirectangular** planar offsets for tree-to-cell geometry, where every
//!   distance of interest is a few hundred metres and the flat-earth error is
//!   negligible.

use crate::core_types::units::Kilometers;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Mean Earth radius (km) for the Haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Meters per degree of latitude (and of longitude at the equator)
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// A WGS84 latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[inline]
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components are finite numbers
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Great-circle distance to `other`
    #[must_use]
    pub fn haversine_distance(&self, other: &GeoPoint) -> Kilometers {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        // `clamp` keeps NaN, so a non-finite coordinate gives a NaN distance
        let c = 2.0 * a.sqrt().clamp(0.0, 1.0).asin();

        Kilometers::from(EARTH_RADIUS_KM * c)
    }

    /// Planar offset from `self` to `other` in meters as `(east, north)`.
    ///
    /// Longitude is scaled by `cos(self.lat)`; `self` is the reference point
    /// of the local tangent plane.
    #[must_use]
    pub fn offset_to(&self, other: &GeoPoint) -> Vector2<f64> {
        let dx = (other.lng - self.lng) * METERS_PER_DEGREE * self.lat.to_radians().cos();
        let dy = (other.lat - self.lat) * METERS_PER_DEGREE;
        Vector2::new(dx, dy)
    }

    /// Inverse of [`GeoPoint::offset_to`]: move by `(east, north)` meters
    #[must_use]
    pub fn translate(&self, offset: Vector2<f64>) -> GeoPoint {
        let lat = self.lat + offset.y / METERS_PER_DEGREE;
        let lng = self.lng + offset.x / (METERS_PER_DEGREE * self.lat.to_radians().cos());
        GeoPoint::new(lat, lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = GeoPoint::new(28.0, 77.0);
        let b = GeoPoint::new(29.0, 77.0);
        // 2πR/360 ≈ 111.195 km
        assert_relative_eq!(*a.haversine_distance(&b), 111.195, epsilon = 0.01);
    }

    #[test]
    fn test_haversine_zero_distance() {
        let a = GeoPoint::new(28.6139, 77.209);
        assert_eq!(*a.haversine_distance(&a), 0.0);
    }

    #[test]
    fn test_haversine_non_finite_is_nan() {
        let a = GeoPoint::new(f64::NAN, 77.2);
        let b = GeoPoint::new(28.6, 77.2);
        assert!(a.haversine_distance(&b).is_nan());
    }

    #[test]
    fn test_offset_translate_inverse() {
        let origin = GeoPoint::new(28.6, 77.2);
        let moved = origin.translate(Vector2::new(150.0, -80.0));
        let offset = origin.offset_to(&moved);
        assert_relative_eq!(offset.x, 150.0, epsilon = 1e-6);
        assert_relative_eq!(offset.y, -80.0, epsilon = 1e-6);
    }

    #[test]
    fn test_longitude_scaled_by_latitude() {
        let origin = GeoPoint::new(60.0, 10.0);
        let east = GeoPoint::new(60.0, 11.0);
        // cos(60°) = 0.5
        assert_relative_eq!(origin.offset_to(&east).x, METERS_PER_DEGREE * 0.5, epsilon = 1e-6);
    }
}
