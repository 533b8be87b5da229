//! Core types and utilities

pub mod geo;
pub mod species;
pub mod station;
pub mod tree;
pub mod units;
pub mod wind;

pub use geo::{GeoPoint, EARTH_RADIUS_KM, METERS_PER_DEGREE};
pub use species::{InMemoryCatalog, Season, SeasonalEfficiency, SpeciesCatalog, SpeciesParameters};
pub use station::{DataProvenance, StationReading};
pub use tree::Tree;
pub use units::*;
pub use wind::WindSample;
