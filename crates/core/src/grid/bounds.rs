//! City bounding rectangles and the static city registry

use crate::core_types::geo::{GeoPoint, METERS_PER_DEGREE};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Axis-aligned lat/lng rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CityBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl CityBounds {
    pub const fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Finite edges with `north > south` and `east > west`
    pub fn is_valid(&self) -> bool {
        [self.north, self.south, self.east, self.west]
            .iter()
            .all(|v| v.is_finite())
            && self.north > self.south
            && self.east > self.west
            && self.north <= 90.0
            && self.south >= -90.0
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new((self.north + self.south) / 2.0, (self.east + self.west) / 2.0)
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }

    /// Approximate area (equirectangular, centre-latitude scaling)
    pub fn area_km2(&self) -> f64 {
        let height_m = (self.north - self.south) * METERS_PER_DEGREE;
        let width_m =
            (self.east - self.west) * METERS_PER_DEGREE * self.center().lat.to_radians().cos();
        height_m * width_m / 1_000_000.0
    }
}

/// Static per-city metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityProfile {
    pub id: String,
    pub name: String,
    pub bounds: CityBounds,
    /// Residents per km²
    pub population_density: f64,
}

/// Read-only city lookup
pub trait CityRegistry: Send + Sync {
    fn city(&self, id: &str) -> Option<&CityProfile>;
}

/// Hash-map backed registry
#[derive(Debug, Clone, Default)]
pub struct StaticCityRegistry {
    cities: FxHashMap<String, CityProfile>,
}

impl StaticCityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a few metro areas and a small demo district
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert(CityProfile {
            id: "delhi".into(),
            name: "Delhi".into(),
            bounds: CityBounds::new(28.88, 28.40, 77.35, 76.84),
            population_density: 11_320.0,
        });
        registry.insert(CityProfile {
            id: "mumbai".into(),
            name: "Mumbai".into(),
            bounds: CityBounds::new(19.27, 18.89, 72.99, 72.77),
            population_density: 20_680.0,
        });
        registry.insert(CityProfile {
            id: "bengaluru".into(),
            name: "Bengaluru".into(),
            bounds: CityBounds::new(13.14, 12.83, 77.78, 77.46),
            population_density: 4_380.0,
        });
        registry.insert(CityProfile {
            id: "delhi_central".into(),
            name: "Delhi (Central District)".into(),
            bounds: CityBounds::new(28.645, 28.615, 77.235, 77.200),
            population_density: 25_000.0,
        });
        registry
    }

    pub fn insert(&mut self, city: CityProfile) {
        self.cities.insert(city.id.clone(), city);
    }
}

impl CityRegistry for StaticCityRegistry {
    fn city(&self, id: &str) -> Option<&CityProfile> {
        self.cities.get(id)
    }
}
