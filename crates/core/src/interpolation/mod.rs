//! Baseline pollution field from sparse monitoring stations

pub mod aqi;
mod idw;

pub use aqi::{pm25_to_aqi, AqiCategory, AQI_MAX};
pub use idw::{FieldError, FieldInterpolator, InterpolatedReading};
