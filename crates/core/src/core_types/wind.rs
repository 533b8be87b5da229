//! Wind sample and the downwind/crosswind frame derived from it

use crate::core_types::station::DataProvenance;
use crate::core_types::units::{Degrees, KilometersPerHour, MetersPerSecond};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Current wind conditions for one simulation run.
///
/// `direction` follows the meteorological convention: the bearing the wind
/// blows **from** (0 = from the north, 90 = from the east).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindSample {
    pub speed: KilometersPerHour,
    pub direction: Degrees,
    #[serde(default)]
    pub gust: Option<KilometersPerHour>,
    #[serde(default)]
    pub provenance: DataProvenance,
}

impl WindSample {
    /// Measured wind, no gust information
    pub fn new(speed_kmh: f64, direction_deg: f64) -> Self {
        Self {
            speed: KilometersPerHour::new(speed_kmh),
            direction: Degrees::new(direction_deg),
            gust: None,
            provenance: DataProvenance::Measured,
        }
    }

    #[must_use]
    pub fn with_gust(mut self, gust_kmh: f64) -> Self {
        self.gust = Some(KilometersPerHour::new(gust_kmh));
        self
    }

    #[must_use]
    pub fn estimated(mut self) -> Self {
        self.provenance = DataProvenance::Estimated;
        self
    }

    /// Speed and direction are finite and speed is non-negative
    pub fn is_valid(&self) -> bool {
        self.speed.is_finite()
            && *self.speed >= 0.0
            && self.direction.is_finite()
            && self.gust.is_none_or(|g| g.is_finite())
    }

    /// Bearing the wind blows **towards**
    #[inline]
    pub fn downwind_bearing(&self) -> Degrees {
        (self.direction + Degrees::new(180.0)).normalized()
    }

    /// Unit vector pointing downwind in `(east, north)` components
    pub fn downwind_unit(&self) -> Vector2<f64> {
        let bearing = self.downwind_bearing().to_radians();
        Vector2::new(bearing.sin(), bearing.cos())
    }

    /// Unit vector perpendicular to [`WindSample::downwind_unit`] (rotated 90° clockwise)
    pub fn crosswind_unit(&self) -> Vector2<f64> {
        let bearing = self.downwind_bearing().to_radians();
        Vector2::new(bearing.cos(), -bearing.sin())
    }

    /// Speed clamped to `min_speed` before conversion, for use as a divisor
    pub fn floored_speed(&self, min_speed: KilometersPerHour) -> MetersPerSecond {
        self.speed.max(min_speed).to_mps()
    }
}
