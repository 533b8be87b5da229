//! Downwind impact-zone polygons for map rendering
//!
//! Each zone is a trapezoid anchored at the tree:
//!
//! ```text
//!   near edge   width 2·r, centred on the tree
//!   far edge    width f·r, at L = r · k · (1 + U / U_ref) downwind
//! ```
//!
//! The far edge is narrower than the near edge: the polygon visualises where
//! the deposition shadow is felt, which thins out with dilution. It is not a
//! plume outline.

use crate::core_types::geo::GeoPoint;
use crate::core_types::units::Meters;
use crate::core_types::wind::WindSample;
use crate::deposition::TreeEffect;
use crate::simulation::config::ImpactZoneConfig;
use serde::{Deserialize, Serialize};

/// Polygon plus the tree it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactZone {
    pub tree_id: String,
    pub species_id: String,
    /// Open ring: near-left, far-left, far-right, near-right
    pub polygon: Vec<GeoPoint>,
}

impl ImpactZone {
    /// Polygon with the first vertex repeated at the end (`GeoJSON` linear ring)
    pub fn closed_ring(&self) -> Vec<GeoPoint> {
        let mut ring = self.polygon.clone();
        if let Some(first) = self.polygon.first() {
            ring.push(*first);
        }
        ring
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImpactZoneBuilder {
    config: ImpactZoneConfig,
}

impl ImpactZoneBuilder {
    pub fn new(config: ImpactZoneConfig) -> Self {
        Self { config }
    }

    /// Downwind extent of the zone
    pub fn zone_length(&self, canopy_radius: Meters, wind: &WindSample) -> Meters {
        let wind_stretch = 1.0 + *wind.speed / self.config.wind_reference_kmh;
        Meters::new(*canopy_radius * self.config.length_factor * wind_stretch.max(0.0))
    }

    pub fn build_zone(
        &self,
        origin: &GeoPoint,
        canopy_radius: Meters,
        wind: &WindSample,
    ) -> Vec<GeoPoint> {
        let downwind = wind.downwind_unit();
        let crosswind = wind.crosswind_unit();

        let near_half = *canopy_radius;
        let far_half = *canopy_radius * self.config.far_width_factor / 2.0;
        let far_centre = downwind * *self.zone_length(canopy_radius, wind);

        // crosswind points to the right of the downwind direction
        vec![
            origin.translate(-crosswind * near_half),
            origin.translate(far_centre - crosswind * far_half),
            origin.translate(far_centre + crosswind * far_half),
            origin.translate(crosswind * near_half),
        ]
    }

    /// One zone per effect, in effect order
    pub fn build_zones(&self, effects: &[TreeEffect], wind: &WindSample) -> Vec<ImpactZone> {
        effects
            .iter()
            .map(|effect| ImpactZone {
                tree_id: effect.tree_id.clone(),
                species_id: effect.species_id.clone(),
                polygon: self.build_zone(&effect.location, effect.canopy_radius, wind),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zone_length_grows_with_wind() {
        let builder = ImpactZoneBuilder::default();
        let r = Meters::new(6.0);
        let calm = builder.zone_length(r, &WindSample::new(0.0, 0.0));
        let breezy = builder.zone_length(r, &WindSample::new(30.0, 0.0));
        assert_abs_diff_eq!(*calm, 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(*breezy, 120.0, epsilon = 1e-9);
    }

    #[test]
    fn test_north_wind_zone_points_south() {
        let builder = ImpactZoneBuilder::default();
        let origin = GeoPoint::new(28.63, 77.21);
        let polygon = builder.build_zone(&origin, Meters::new(6.0), &WindSample::new(15.0, 0.0));
        assert_eq!(polygon.len(), 4);

        let offsets: Vec<_> = polygon.iter().map(|p| origin.offset_to(p)).collect();

        // Near edge straddles the tree, 2r wide
        assert_abs_diff_eq!(offsets[0].y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!((offsets[3] - offsets[0]).norm(), 12.0, epsilon = 1e-6);

        // Far edge 90 m south (6 · 10 · 1.5), 3 m wide
        assert_abs_diff_eq!(offsets[1].y, -90.0, epsilon = 1e-6);
        assert_abs_diff_eq!(offsets[2].y, -90.0, epsilon = 1e-6);
        assert_abs_diff_eq!((offsets[2] - offsets[1]).norm(), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_closed_ring() {
        let builder = ImpactZoneBuilder::default();
        let polygon = builder.build_zone(
            &GeoPoint::new(0.0, 0.0),
            Meters::new(5.0),
            &WindSample::new(5.0, 90.0),
        );
        let zone = ImpactZone {
            tree_id: "t".into(),
            species_id: "neem".into(),
            polygon,
        };
        let ring = zone.closed_ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }
}
