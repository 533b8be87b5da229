//! PM2.5 Air Quality Index (US EPA breakpoints)
//!
//! ```text
//! AQI = (I_hi - I_lo) / (C_hi - C_lo) · (C - C_lo) + I_lo
//! ```
//!
//! Concentrations are truncated to 0.1 µg/m³ before the lookup, as the EPA
//! technical assistance document prescribes.
//!
//! # References
//! - US EPA (2018). "Technical Assistance Document for the Reporting of Daily
//!   Air Quality - the Air Quality Index (AQI)." EPA 454/B-18-007.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `(C_lo, C_hi, I_lo, I_hi)`
const PM25_BREAKPOINTS: [(f64, f64, f64, f64); 7] = [
    (0.0, 12.0, 0.0, 50.0),
    (12.1, 35.4, 51.0, 100.0),
    (35.5, 55.4, 101.0, 150.0),
    (55.5, 150.4, 151.0, 200.0),
    (150.5, 250.4, 201.0, 300.0),
    (250.5, 350.4, 301.0, 400.0),
    (350.5, 500.4, 401.0, 500.0),
];

/// Top of the scale
pub const AQI_MAX: u16 = 500;

/// AQI for a PM2.5 concentration in µg/m³ (capped at 500, 0 for invalid input)
pub fn pm25_to_aqi(pm25: f64) -> u16 {
    if !pm25.is_finite() || pm25 <= 0.0 {
        return 0;
    }
    let c = (pm25 * 10.0).floor() / 10.0;

    for &(c_lo, c_hi, i_lo, i_hi) in &PM25_BREAKPOINTS {
        // Breakpoint gaps (12.0 → 12.1) belong to the upper bracket
        if c <= c_hi {
            let c = c.max(c_lo);
            let aqi = (i_hi - i_lo) / (c_hi - c_lo) * (c - c_lo) + i_lo;
            return aqi.round() as u16;
        }
    }
    AQI_MAX
}

/// Health category of an AQI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub fn from_aqi(aqi: u16) -> AqiCategory {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthyForSensitiveGroups,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_edges() {
        assert_eq!(pm25_to_aqi(0.0), 0);
        assert_eq!(pm25_to_aqi(12.0), 50);
        assert_eq!(pm25_to_aqi(12.1), 51);
        assert_eq!(pm25_to_aqi(35.4), 100);
        assert_eq!(pm25_to_aqi(55.5), 151);
        assert_eq!(pm25_to_aqi(500.4), 500);
    }

    #[test]
    fn test_interior_value() {
        // (100-51)/(35.4-12.1) * (25.0-12.1) + 51 = 78.13
        assert_eq!(pm25_to_aqi(25.0), 78);
    }

    #[test]
    fn test_gap_between_brackets() {
        // 12.05 truncates to 12.0 → still Good
        assert_eq!(pm25_to_aqi(12.05), 50);
    }

    #[test]
    fn test_capped_and_invalid() {
        assert_eq!(pm25_to_aqi(900.0), AQI_MAX);
        assert_eq!(pm25_to_aqi(f64::NAN), 0);
        assert_eq!(pm25_to_aqi(-4.0), 0);
    }

    #[test]
    fn test_categories() {
        assert_eq!(AqiCategory::from_aqi(42), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(151), AqiCategory::Unhealthy);
        assert_eq!(AqiCategory::from_aqi(499), AqiCategory::Hazardous);
        assert_eq!(AqiCategory::Hazardous.to_string(), "Hazardous");
    }
}
