//! Atmospheric turbulence for plume dispersion.
//!
//! Stability drives how fast a tree's deposition "shadow" widens downwind:
//! unstable daytime air spreads it wide and shallow, stable night air keeps it
//! narrow.

mod stability;

pub use stability::{DispersionCoefficients, StabilityClass};
