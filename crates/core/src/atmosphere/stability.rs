//! Pasquill-Gifford stability classification and plume spread coefficients
//!
//! # Scientific Background
//!
//! Turbulence in the surface layer controls how quickly a plume widens. The
//! Pasquill scheme bins it into six classes from wind speed and insolation;
//! each class carries an empirical `(a, b)` pair for the horizontal (`σy`) and
//! vertical (`σz`) spread:
//!
//! ```text
//! σ = a · x · (1 + b · x)^(-1/2)     x = downwind distance (m), x ≥ 1
//! ```
//!
//! # References
//!
//! - Pasquill, F. (1961). "The estimation of the dispersion of windborne
//!   material." Meteorological Magazine, 90, 33-49.
//! - Briggs, G.A. (1973). "Diffusion estimation for small emissions."
//!   ATDL Contribution No. 79, NOAA.

use crate::core_types::units::{KilometersPerHour, Meters};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pasquill-Gifford atmospheric stability classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StabilityClass {
    /// A: Very unstable (strong solar heating, light winds)
    A,
    /// B: Moderately unstable
    B,
    /// C: Slightly unstable
    C,
    /// D: Neutral (overcast or high winds)
    D,
    /// E: Slightly stable
    E,
    /// F: Very stable (nighttime, light winds)
    F,
}

/// Empirical spread coefficients for one class
#[derive(Debug, Clone, Copy, PartialEq)]
struct SpreadCoefficients {
    a_y: f64,
    b_y: f64,
    a_z: f64,
    b_z: f64,
}

/// Plume spread at a given downwind distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispersionCoefficients {
    /// Horizontal (crosswind) standard deviation
    pub sigma_y: Meters,
    /// Vertical standard deviation
    pub sigma_z: Meters,
}

impl StabilityClass {
    pub const ALL: [StabilityClass; 6] = [
        StabilityClass::A,
        StabilityClass::B,
        StabilityClass::C,
        StabilityClass::D,
        StabilityClass::E,
        StabilityClass::F,
    ];

    /// Classify from wind speed and daylight.
    ///
    /// The thresholds apply to the km/h value as supplied. Light daytime winds
    /// give convective (unstable) classes, light night winds give stable
    /// classes, anything stronger is neutral.
    #[must_use]
    pub fn classify(wind_speed: KilometersPerHour, is_daytime: bool) -> StabilityClass {
        let speed = *wind_speed;
        if is_daytime {
            if speed < 2.0 {
                StabilityClass::A
            } else if speed < 5.0 {
                StabilityClass::B
            } else if speed < 6.0 {
                StabilityClass::C
            } else {
                StabilityClass::D
            }
        } else if speed < 3.0 {
            StabilityClass::F
        } else if speed < 5.0 {
            StabilityClass::E
        } else {
            StabilityClass::D
        }
    }

    // Briggs (1973) open-country fits
    fn spread(self) -> SpreadCoefficients {
        let (a_y, b_y, a_z, b_z) = match self {
            StabilityClass::A => (0.22, 0.0001, 0.20, 0.0),
            StabilityClass::B => (0.16, 0.0001, 0.12, 0.0),
            StabilityClass::C => (0.11, 0.0001, 0.08, 0.0002),
            StabilityClass::D => (0.08, 0.0001, 0.06, 0.0015),
            StabilityClass::E => (0.06, 0.0001, 0.03, 0.0003),
            StabilityClass::F => (0.04, 0.0001, 0.016, 0.0003),
        };
        SpreadCoefficients { a_y, b_y, a_z, b_z }
    }

    /// `σy` and `σz` at `downwind_distance` metres (clamped to at least 1 m)
    #[must_use]
    pub fn dispersion_coefficients(self, downwind_distance: f64) -> DispersionCoefficients {
        let x = downwind_distance.max(1.0);
        let c = self.spread();
        DispersionCoefficients {
            sigma_y: Meters::new(c.a_y * x / (1.0 + c.b_y * x).sqrt()),
            sigma_z: Meters::new(c.a_z * x / (1.0 + c.b_z * x).sqrt()),
        }
    }

    /// True for A-C
    pub fn is_unstable(self) -> bool {
        matches!(self, StabilityClass::A | StabilityClass::B | StabilityClass::C)
    }

    pub fn description(self) -> &'static str {
        match self {
            StabilityClass::A => "very unstable",
            StabilityClass::B => "moderately unstable",
            StabilityClass::C => "slightly unstable",
            StabilityClass::D => "neutral",
            StabilityClass::E => "slightly stable",
            StabilityClass::F => "very stable",
        }
    }
}

impl fmt::Display for StabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            StabilityClass::A => "A",
            StabilityClass::B => "B",
            StabilityClass::C => "C",
            StabilityClass::D => "D",
            StabilityClass::E => "E",
            StabilityClass::F => "F",
        };
        write!(f, "{letter} ({})", self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn kmh(v: f64) -> KilometersPerHour {
        KilometersPerHour::new(v)
    }

    #[test]
    fn test_daytime_classification() {
        assert_eq!(StabilityClass::classify(kmh(0.0), true), StabilityClass::A);
        assert_eq!(StabilityClass::classify(kmh(1.99), true), StabilityClass::A);
        assert_eq!(StabilityClass::classify(kmh(2.0), true), StabilityClass::B);
        assert_eq!(StabilityClass::classify(kmh(4.9), true), StabilityClass::B);
        assert_eq!(StabilityClass::classify(kmh(5.5), true), StabilityClass::C);
        assert_eq!(StabilityClass::classify(kmh(6.0), true), StabilityClass::D);
        assert_eq!(StabilityClass::classify(kmh(40.0), true), StabilityClass::D);
    }

    #[test]
    fn test_nighttime_classification() {
        assert_eq!(StabilityClass::classify(kmh(0.0), false), StabilityClass::F);
        assert_eq!(StabilityClass::classify(kmh(3.0), false), StabilityClass::E);
        assert_eq!(StabilityClass::classify(kmh(4.99), false), StabilityClass::E);
        assert_eq!(StabilityClass::classify(kmh(5.0), false), StabilityClass::D);
    }

    #[test]
    fn test_sigma_formula() {
        let d = StabilityClass::D.dispersion_coefficients(1000.0);
        assert_relative_eq!(*d.sigma_y, 0.08 * 1000.0 / 1.1_f64.sqrt(), max_relative = 1e-12);
        assert_relative_eq!(*d.sigma_z, 0.06 * 1000.0 / 2.5_f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn test_zero_distance_clamped() {
        for class in StabilityClass::ALL {
            let at_zero = class.dispersion_coefficients(0.0);
            let at_one = class.dispersion_coefficients(1.0);
            assert_eq!(at_zero, at_one);
            assert!(*at_zero.sigma_y > 0.0);
        }
    }

    #[test]
    fn test_spread_grows_sublinearly() {
        for class in StabilityClass::ALL {
            let near = class.dispersion_coefficients(100.0);
            let far = class.dispersion_coefficients(1000.0);
            assert!(far.sigma_y > near.sigma_y);
            // Ten times the distance, strictly less than ten times the spread
            assert!(*far.sigma_y < *near.sigma_y * 10.0);
        }
    }

    #[test]
    fn test_unstable_spreads_wider() {
        let a = StabilityClass::A.dispersion_coefficients(500.0);
        let f = StabilityClass::F.dispersion_coefficients(500.0);
        assert!(a.sigma_y > f.sigma_y);
        assert!(StabilityClass::A.is_unstable());
        assert!(!StabilityClass::D.is_unstable());
    }
}
