use canopy_sim_core::{GridCell, Season, StabilityClass, Summary};
use std::os::raw::c_char;

/// A placed tree.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CanopyTree {
    /// Null-terminated UTF-8 tree id.
    pub id: *const c_char,
    /// Null-terminated UTF-8 species id (e.g. `"neem"`).
    pub species_id: *const c_char,
    pub lat: f64,
    pub lng: f64,
}

/// A monitoring-station reading.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CanopyStation {
    /// Null-terminated UTF-8 station id.
    pub id: *const c_char,
    pub lat: f64,
    pub lng: f64,
    /// PM2.5 in µg/m³.
    pub pm25: f64,
    /// PM10 in µg/m³, `NaN` when not measured.
    pub pm10: f64,
    /// True when the reading was substituted rather than measured.
    pub estimated: bool,
}

/// Wind conditions (meteorological "from" direction).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CanopyWind {
    pub speed_kmh: f64,
    pub direction_deg: f64,
    /// Gust speed in km/h, `NaN` when unknown.
    pub gust_kmh: f64,
    pub estimated: bool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanopySeason {
    Winter = 0,
    Spring = 1,
    Summer = 2,
    Autumn = 3,
}

impl From<CanopySeason> for Season {
    fn from(season: CanopySeason) -> Self {
        match season {
            CanopySeason::Winter => Season::Winter,
            CanopySeason::Spring => Season::Spring,
            CanopySeason::Summer => Season::Summer,
            CanopySeason::Autumn => Season::Autumn,
        }
    }
}

/// Everything `canopy_sim_run` needs.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CanopySimRequest {
    /// Null-terminated UTF-8 city id from the built-in registry.
    pub city_id: *const c_char,
    /// May be null when `tree_count` is 0.
    pub trees: *const CanopyTree,
    pub tree_count: usize,
    /// May be null when `station_count` is 0.
    pub stations: *const CanopyStation,
    pub station_count: usize,
    pub wind: CanopyWind,
    pub season: CanopySeason,
    /// Local hour 0-23.
    pub hour_of_day: u8,
    /// Grid resolution in meters, `<= 0` for the default (100 m).
    pub grid_resolution_m: f64,
}

/// Which field `canopy_sim_get_cell` reads from.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanopyFieldLayer {
    Baseline = 0,
    Projected = 1,
}

/// One grid cell.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CanopyCellData {
    pub lat: f64,
    pub lng: f64,
    pub pm25: f64,
    pub pm10: f64,
    pub aqi: u16,
    /// Reduction in percent, `NaN` for baseline cells.
    pub reduction_percent: f64,
}

impl From<&GridCell> for CanopyCellData {
    fn from(cell: &GridCell) -> Self {
        Self {
            lat: cell.location.lat,
            lng: cell.location.lng,
            pm25: *cell.pm25,
            pm10: *cell.pm10,
            aqi: cell.aqi,
            reduction_percent: cell.reduction.map_or(f64::NAN, f64::from),
        }
    }
}

/// Polygon vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CanopyPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Scalar KPIs of a run (the per-species breakdown is not exposed).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CanopySummaryData {
    pub tree_count: usize,
    pub effective_tree_count: usize,
    pub avg_baseline_pm25: f64,
    pub avg_projected_pm25: f64,
    pub avg_baseline_pm10: f64,
    pub avg_projected_pm10: f64,
    pub reduction_percentage: f64,
    pub baseline_aqi: u16,
    pub projected_aqi: u16,
    pub max_cell_reduction: f64,
    pub cells_improved: usize,
    pub pm25_removed_g_per_year: f64,
    pub pm10_removed_g_per_year: f64,
    pub coverage_area_km2: f64,
    pub population_benefited: f64,
    pub co2_absorbed_kg_per_year: f64,
    pub total_cost: f64,
    /// Pasquill-Gifford class as an ASCII letter (`'A'`..=`'F'`).
    pub stability_class: c_char,
}

impl CanopySummaryData {
    pub(crate) fn new(summary: &Summary, stability: StabilityClass) -> Self {
        let letter = match stability {
            StabilityClass::A => b'A',
            StabilityClass::B => b'B',
            StabilityClass::C => b'C',
            StabilityClass::D => b'D',
            StabilityClass::E => b'E',
            StabilityClass::F => b'F',
        };
        Self {
            tree_count: summary.tree_count,
            effective_tree_count: summary.effective_tree_count,
            avg_baseline_pm25: summary.avg_baseline_pm25,
            avg_projected_pm25: summary.avg_projected_pm25,
            avg_baseline_pm10: summary.avg_baseline_pm10,
            avg_projected_pm10: summary.avg_projected_pm10,
            reduction_percentage: *summary.reduction_percentage,
            baseline_aqi: summary.baseline_aqi,
            projected_aqi: summary.projected_aqi,
            max_cell_reduction: *summary.max_cell_reduction,
            cells_improved: summary.cells_improved,
            pm25_removed_g_per_year: summary.pm25_removed_g_per_year,
            pm10_removed_g_per_year: summary.pm10_removed_g_per_year,
            coverage_area_km2: summary.coverage_area_km2,
            population_benefited: summary.population_benefited,
            co2_absorbed_kg_per_year: summary.co2_absorbed_kg_per_year,
            total_cost: summary.total_cost,
            stability_class: letter as c_char,
        }
    }
}
