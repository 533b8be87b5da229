//! Rectangular pollution grid over a city's bounds
//!
//! Cells are stored in a flat row-major buffer `[row * cols + col]`, rows
//! running south → north and columns west → east. The metric grid resolution
//! is converted to degrees once per field: the latitude step is constant and
//! the longitude step is widened by `1 / cos(centre latitude)` so cells stay
//! roughly square on the ground.

use crate::core_types::geo::{GeoPoint, METERS_PER_DEGREE};
use crate::core_types::units::{MicrogramsPerCubicMeter, Percent};
use crate::grid::bounds::CityBounds;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Slack when deciding whether the last row/column lands on the far edge
const EDGE_EPSILON: f64 = 1e-9;

/// Errors raised while laying out a grid
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("invalid bounds: {0:?}")]
    InvalidBounds(CityBounds),
    #[error("grid step must be finite and positive, got {0} m")]
    InvalidStep(f64),
    #[error("grid would contain {cells} cells, limit is {limit}")]
    TooManyCells { cells: usize, limit: usize },
}

/// Grid layout: bounds, step sizes and dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub bounds: CityBounds,
    /// Nominal resolution (m)
    pub step_m: f64,
    /// Latitude step (degrees)
    pub lat_step: f64,
    /// Longitude step (degrees), corrected for latitude
    pub lng_step: f64,
    pub rows: usize,
    pub cols: usize,
}

impl GridGeometry {
    /// Lay out a grid covering `bounds` at `step_m` metres
    ///
    /// # Errors
    /// Returns [`GridError`] for invalid bounds or a non-positive step
    pub fn new(bounds: CityBounds, step_m: f64) -> Result<Self, GridError> {
        if !bounds.is_valid() {
            return Err(GridError::InvalidBounds(bounds));
        }
        if !step_m.is_finite() || step_m <= 0.0 {
            return Err(GridError::InvalidStep(step_m));
        }

        let lat_step = step_m / METERS_PER_DEGREE;
        let lng_step = step_m / (METERS_PER_DEGREE * bounds.center().lat.to_radians().cos());

        // `as` saturates, so a tiny step yields usize::MAX rather than wrapping
        let rows = (((bounds.north - bounds.south) / lat_step + EDGE_EPSILON).floor() as usize)
            .saturating_add(1);
        let cols = (((bounds.east - bounds.west) / lng_step + EDGE_EPSILON).floor() as usize)
            .saturating_add(1);

        Ok(Self {
            bounds,
            step_m,
            lat_step,
            lng_step,
            rows,
            cols,
        })
    }

    /// Reject layouts larger than `limit` cells
    ///
    /// # Errors
    /// Returns [`GridError::TooManyCells`] when the grid exceeds `limit`
    pub fn ensure_within(&self, limit: usize) -> Result<(), GridError> {
        let cells = self.cell_count();
        if cells > limit {
            return Err(GridError::TooManyCells { cells, limit });
        }
        Ok(())
    }

    /// `rows × cols`, saturating at `usize::MAX` for degenerate layouts
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Flat index of `(row, col)`
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// `(row, col)` of a flat index
    #[inline]
    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Coordinate of the cell at `(row, col)`
    #[inline]
    pub fn location(&self, row: usize, col: usize) -> GeoPoint {
        GeoPoint::new(
            self.bounds.south + row as f64 * self.lat_step,
            self.bounds.west + col as f64 * self.lng_step,
        )
    }

    /// Nearest cell to a coordinate, if it falls inside the bounds
    pub fn nearest(&self, point: &GeoPoint) -> Option<(usize, usize)> {
        if !point.is_finite() || !self.bounds.contains(point) {
            return None;
        }
        let row = ((point.lat - self.bounds.south) / self.lat_step).round() as usize;
        let col = ((point.lng - self.bounds.west) / self.lng_step).round() as usize;
        Some((row.min(self.rows - 1), col.min(self.cols - 1)))
    }
}

/// One grid sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub location: GeoPoint,
    pub pm25: MicrogramsPerCubicMeter,
    pub pm10: MicrogramsPerCubicMeter,
    /// US EPA AQI of `pm25`
    pub aqi: u16,
    /// Set once the cell has been through dispersion
    pub reduction: Option<Percent>,
}

impl GridCell {
    pub fn new(location: GeoPoint, pm25: f64, pm10: f64, aqi: u16) -> Self {
        Self {
            location,
            pm25: MicrogramsPerCubicMeter::new(pm25),
            pm10: MicrogramsPerCubicMeter::new(pm10),
            aqi,
            reduction: None,
        }
    }
}

/// Pollution grid: geometry plus row-major cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutionField {
    geometry: GridGeometry,
    cells: Vec<GridCell>,
}

impl PollutionField {
    /// Wrap a cell buffer laid out per `geometry`
    ///
    /// # Panics
    /// Panics when `cells.len()` does not match the geometry
    pub fn from_cells(geometry: GridGeometry, cells: Vec<GridCell>) -> Self {
        assert_eq!(
            cells.len(),
            geometry.cell_count(),
            "PollutionField::from_cells: cell buffer does not match geometry"
        );
        Self { geometry, cells }
    }

    #[inline]
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.geometry.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.geometry.cols
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in row-major order
    #[inline]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GridCell> {
        self.cells.iter()
    }

    /// Get cell at grid indices (bounds-checked)
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&GridCell> {
        if row < self.geometry.rows && col < self.geometry.cols {
            Some(&self.cells[self.geometry.index(row, col)])
        } else {
            None
        }
    }

    /// Get the cell nearest to a coordinate
    pub fn cell_near(&self, point: &GeoPoint) -> Option<&GridCell> {
        let (row, col) = self.geometry.nearest(point)?;
        self.cell_at(row, col)
    }

    /// Arithmetic mean PM2.5 over all cells (0 for an empty field)
    pub fn mean_pm25(&self) -> f64 {
        self.mean_of(|c| *c.pm25)
    }

    /// Arithmetic mean PM10 over all cells (0 for an empty field)
    pub fn mean_pm10(&self) -> f64 {
        self.mean_of(|c| *c.pm10)
    }

    pub fn min_pm25(&self) -> Option<f64> {
        self.cells.iter().map(|c| c.pm25).min().map(f64::from)
    }

    pub fn max_pm25(&self) -> Option<f64> {
        self.cells.iter().map(|c| c.pm25).max().map(f64::from)
    }

    // Sequential sum keeps the mean bit-for-bit reproducible across runs
    fn mean_of(&self, value: impl Fn(&GridCell) -> f64) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.cells.iter().map(value).sum();
        sum / self.cells.len() as f64
    }
}

impl<'a> IntoIterator for &'a PollutionField {
    type Item = &'a GridCell;
    type IntoIter = std::slice::Iter<'a, GridCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn one_km_box() -> CityBounds {
        // ~1.1 km tall at the equator
        CityBounds::new(0.01, 0.0, 0.01, 0.0)
    }

    #[test]
    fn test_geometry_dimensions() {
        let geometry = GridGeometry::new(one_km_box(), 100.0).expect("valid geometry");
        // 0.01° * 111320 m/° = 1113.2 m → 11 full steps + origin row
        assert_eq!(geometry.rows, 12);
        assert_eq!(geometry.cols, 12);
        assert_eq!(geometry.cell_count(), 144);
    }

    #[test]
    fn test_longitude_step_widens_with_latitude() {
        let geometry = GridGeometry::new(CityBounds::new(60.01, 59.99, 10.1, 10.0), 100.0)
            .expect("valid geometry");
        assert_relative_eq!(geometry.lng_step, geometry.lat_step * 2.0, max_relative = 1e-3);
    }

    #[test]
    fn test_index_round_trip() {
        let geometry = GridGeometry::new(one_km_box(), 100.0).expect("valid geometry");
        let idx = geometry.index(3, 7);
        assert_eq!(geometry.row_col(idx), (3, 7));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(matches!(
            GridGeometry::new(CityBounds::new(0.0, 1.0, 1.0, 0.0), 100.0),
            Err(GridError::InvalidBounds(_))
        ));
        assert_eq!(
            GridGeometry::new(one_km_box(), 0.0),
            Err(GridError::InvalidStep(0.0))
        );
        assert!(GridGeometry::new(one_km_box(), f64::NAN).is_err());
    }

    #[test]
    fn test_cell_limit() {
        let geometry = GridGeometry::new(one_km_box(), 100.0).expect("valid geometry");
        assert!(geometry.ensure_within(144).is_ok());
        assert_eq!(
            geometry.ensure_within(100),
            Err(GridError::TooManyCells {
                cells: 144,
                limit: 100
            })
        );
    }

    #[test]
    fn test_sub_nanometre_step_saturates_instead_of_overflowing() {
        // Delhi-sized box: ~5e13 rows and columns at 1e-9 m
        let bounds = CityBounds::new(28.88, 28.40, 77.35, 76.84);
        let geometry = GridGeometry::new(bounds, 1e-9).expect("step is positive");
        assert_eq!(geometry.cell_count(), usize::MAX);
        assert_eq!(
            geometry.ensure_within(250_000),
            Err(GridError::TooManyCells {
                cells: usize::MAX,
                limit: 250_000
            })
        );

        let geometry = GridGeometry::new(bounds, f64::MIN_POSITIVE).expect("step is positive");
        assert_eq!(geometry.rows, usize::MAX);
        assert!(geometry.ensure_within(250_000).is_err());
    }

    #[test]
    fn test_nearest_cell() {
        let geometry = GridGeometry::new(one_km_box(), 100.0).expect("valid geometry");
        let target = geometry.location(4, 9);
        assert_eq!(geometry.nearest(&target), Some((4, 9)));
        assert_eq!(geometry.nearest(&GeoPoint::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_field_statistics() {
        let geometry = GridGeometry::new(CityBounds::new(0.001, 0.0, 0.001, 0.0), 100.0)
            .expect("valid geometry");
        let cells: Vec<GridCell> = (0..geometry.cell_count())
            .map(|i| {
                let (r, c) = geometry.row_col(i);
                GridCell::new(geometry.location(r, c), 10.0 * (i + 1) as f64, 0.0, 0)
            })
            .collect();
        let n = cells.len();
        let field = PollutionField::from_cells(geometry, cells);

        assert_eq!(field.min_pm25(), Some(10.0));
        assert_eq!(field.max_pm25(), Some(10.0 * n as f64));
        assert_relative_eq!(field.mean_pm25(), 10.0 * (n as f64 + 1.0) / 2.0);
    }
}
