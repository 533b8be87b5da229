//! Monitoring-station readings consumed by the baseline interpolation

use crate::core_types::geo::GeoPoint;
use crate::core_types::units::MicrogramsPerCubicMeter;
use serde::{Deserialize, Serialize};

/// Where an input value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataProvenance {
    /// Reported by a live sensor or provider
    #[default]
    Measured,
    /// Substituted by the caller (seasonal typical values, model output, ...)
    Estimated,
}

/// A single air-quality station snapshot.
///
/// PM2.5 is the minimum contract; the remaining pollutants are carried through
/// for reporting when the provider has them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReading {
    pub id: String,
    pub location: GeoPoint,
    pub pm25: MicrogramsPerCubicMeter,
    #[serde(default)]
    pub pm10: Option<MicrogramsPerCubicMeter>,
    /// Nitrogen dioxide (ppb)
    #[serde(default)]
    pub no2: Option<f64>,
    /// Ozone (ppb)
    #[serde(default)]
    pub o3: Option<f64>,
    #[serde(default)]
    pub provenance: DataProvenance,
}

impl StationReading {
    /// Measured PM2.5-only reading
    pub fn new(id: impl Into<String>, location: GeoPoint, pm25: f64) -> Self {
        Self {
            id: id.into(),
            location,
            pm25: MicrogramsPerCubicMeter::new(pm25),
            pm10: None,
            no2: None,
            o3: None,
            provenance: DataProvenance::Measured,
        }
    }

    #[must_use]
    pub fn with_pm10(mut self, pm10: f64) -> Self {
        self.pm10 = Some(MicrogramsPerCubicMeter::new(pm10));
        self
    }

    /// Attach NO2 and O3 (ppb) for reporting
    #[must_use]
    pub fn with_gases(mut self, no2: f64, o3: f64) -> Self {
        self.no2 = Some(no2);
        self.o3 = Some(o3);
        self
    }

    #[must_use]
    pub fn estimated(mut self) -> Self {
        self.provenance = DataProvenance::Estimated;
        self
    }

    /// A reading is usable for interpolation when its PM2.5 is a finite,
    /// non-negative number
    #[inline]
    pub fn has_usable_pm25(&self) -> bool {
        self.pm25.is_finite() && *self.pm25 >= 0.0
    }

    /// Finite coordinate and usable PM2.5
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.location.is_finite() && self.has_usable_pm25()
    }
}
