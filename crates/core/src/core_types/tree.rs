//! Planted trees as handed over by the placement layer

use crate::core_types::geo::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tree placed on the map. The core only ever sees an immutable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub id: String,
    pub location: GeoPoint,
    pub species_id: String,
    pub planted_at: DateTime<Utc>,
}

impl Tree {
    pub fn new(
        id: impl Into<String>,
        location: GeoPoint,
        species_id: impl Into<String>,
        planted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            location,
            species_id: species_id.into(),
            planted_at,
        }
    }

    /// Tree placed at the current wall-clock time
    pub fn planted_now(
        id: impl Into<String>,
        location: GeoPoint,
        species_id: impl Into<String>,
    ) -> Self {
        Self::new(id, location, species_id, Utc::now())
    }
}
