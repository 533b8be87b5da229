//! Impact-zone geometry

mod zone;

pub use zone::{ImpactZone, ImpactZoneBuilder};
