//! Semantic unit types for type-safe physical quantity handling
//!
//! Newtype wrappers keep distances, speeds, angles and concentrations from
//! being mixed up as they flow through the pipeline (a wind speed in km/h must
//! never reach the plume term without being converted to m/s first).
//!
//! # Design
//! - All quantities are `f64`: geographic math on degree offsets loses too much
//!   precision in `f32` at 100 m grid resolution
//! - `Deref` to the raw value for arithmetic in hot loops
//! - Total ordering via `total_cmp`, so units can be used with `min`/`max`
//! - Serde support (serialized as the bare number)
//!
//! # Usage
//! ```
//! use canopy_sim_core::core_types::units::{KilometersPerHour, Meters};
//!
//! let wind = KilometersPerHour::new(36.0);
//! assert!((*wind.to_mps() - 10.0).abs() < 1e-9);
//!
//! let radius = Meters::new(6.0);
//! assert_eq!(radius.min(Meters::new(10.0)), Meters::new(6.0));
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Sub};

/// Shared trait implementations for every `f64` unit newtype.
macro_rules! unit_common {
    ($name:ident, $fmt:literal) => {
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl From<f64> for $name {
            fn from(v: f64) -> Self {
                $name(v)
            }
        }

        impl From<$name> for f64 {
            fn from(v: $name) -> f64 {
                v.0
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = $name;
            fn mul(self, rhs: f64) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl Div<f64> for $name {
            type Output = $name;
            fn div(self, rhs: f64) -> $name {
                $name(self.0 / rhs)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, $fmt, self.0)
            }
        }

        impl $name {
            /// Get the raw value
            #[inline]
            #[must_use]
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

// ============================================================================
// DISTANCE
// ============================================================================

/// Distance in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(f64);

unit_common!(Meters, "{:.2} m");

impl Meters {
    /// Create a new distance in meters. Asserts value >= 0.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Meters::new: negative distance is invalid");
        Meters(value)
    }
}

/// Distance in kilometers
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilometers(f64);

unit_common!(Kilometers, "{:.3} km");

// ============================================================================
// SPEED
// ============================================================================

/// Speed in meters per second
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MetersPerSecond(f64);

unit_common!(MetersPerSecond, "{:.4} m/s");

impl MetersPerSecond {
    /// Create a new speed in m/s
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MetersPerSecond(value)
    }
}

/// Speed in kilometers per hour (the unit wind providers report in)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KilometersPerHour(f64);

unit_common!(KilometersPerHour, "{:.1} km/h");

impl KilometersPerHour {
    /// Create a new speed in km/h
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        KilometersPerHour(value)
    }

    /// Convert to m/s
    #[inline]
    #[must_use]
    pub fn to_mps(self) -> MetersPerSecond {
        MetersPerSecond(self.0 / 3.6)
    }
}

// ============================================================================
// ANGLES
// ============================================================================

/// Angle in degrees (compass bearings: 0 = north, 90 = east)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(f64);

unit_common!(Degrees, "{:.1}°");

impl Degrees {
    /// Create a new angle in degrees
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Degrees(value)
    }

    /// Wrap into `[0, 360)`
    #[inline]
    #[must_use]
    pub fn normalized(self) -> Degrees {
        Degrees(self.0.rem_euclid(360.0))
    }

    /// Convert to radians
    #[inline]
    #[must_use]
    pub fn to_radians(self) -> Radians {
        Radians(self.0.to_radians())
    }
}

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Radians(f64);

unit_common!(Radians, "{:.4} rad");


// ============================================================================
// RATIOS / CONCENTRATIONS
// ============================================================================

/// Percentage (0-100 scale)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Percent(f64);

unit_common!(Percent, "{:.2}%");

impl Percent {
    /// Zero percent
    pub const ZERO: Percent = Percent(0.0);

    /// Create a new percentage
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Percent(value)
    }

    /// Build from a 0-1 fraction
    #[inline]
    #[must_use]
    pub fn from_fraction(fraction: f64) -> Self {
        Percent(fraction * 100.0)
    }
}

/// Particulate mass concentration in µg/m³
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MicrogramsPerCubicMeter(f64);

unit_common!(MicrogramsPerCubicMeter, "{:.1} µg/m³");

impl MicrogramsPerCubicMeter {
    /// Create a new concentration
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MicrogramsPerCubicMeter(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_conversion() {
        let kmh = KilometersPerHour::new(18.0);
        assert!((*kmh.to_mps() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_degrees_normalized() {
        assert_eq!(Degrees::new(540.0).normalized(), Degrees::new(180.0));
        assert_eq!(Degrees::new(-90.0).normalized(), Degrees::new(270.0));
    }

    #[test]
    fn test_total_ordering_handles_nan() {
        let a = Meters::from(f64::NAN);
        let b = Meters::new(1.0);
        // NaN sorts above every finite value under total_cmp
        assert!(a.max(b).value().is_nan());
    }

    #[test]
    #[should_panic(expected = "negative distance")]
    fn test_negative_meters_rejected() {
        let _ = Meters::new(-1.0);
    }
}
