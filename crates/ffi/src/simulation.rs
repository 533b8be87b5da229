use canopy_sim_core::{
    GeoPoint, InMemoryCatalog, NoProgress, SimulationConfig, SimulationInput, SimulationResult,
    Simulator, StaticCityRegistry, StationReading, Tree, WindSample,
};
use std::ptr;
use std::sync::LazyLock;

use crate::error::{CanopySimErrorCode, DefaultCanopySimError};
use crate::helpers::{clear_last_error, slice_from_c, string_from_c, track_error};
use crate::types::{CanopySimRequest, CanopyStation, CanopyTree, CanopyWind};

// Read-only reference data shared by every run
static CATALOG: LazyLock<InMemoryCatalog> = LazyLock::new(InMemoryCatalog::with_defaults);
static CITIES: LazyLock<StaticCityRegistry> = LazyLock::new(StaticCityRegistry::with_defaults);

/// Opaque handle to a completed simulation run.
///
/// Immutable once created, so every query function may be called from any
/// thread concurrently. Free with `canopy_sim_result_free`.
pub struct CanopySimResult {
    pub(crate) result: SimulationResult,
}

unsafe fn tree_from_c(tree: &CanopyTree) -> Result<Tree, DefaultCanopySimError> {
    let id = unsafe { string_from_c(tree.id, "trees[].id") }?;
    let species_id = unsafe { string_from_c(tree.species_id, "trees[].species_id") }?;
    Ok(Tree::planted_now(id, GeoPoint::new(tree.lat, tree.lng), species_id))
}

unsafe fn station_from_c(station: &CanopyStation) -> Result<StationReading, DefaultCanopySimError> {
    let id = unsafe { string_from_c(station.id, "stations[].id") }?;
    let location = GeoPoint::new(station.lat, station.lng);
    let mut reading = StationReading::new(id, location, station.pm25);
    if station.pm10.is_finite() {
        reading = reading.with_pm10(station.pm10);
    }
    if station.estimated {
        reading = reading.estimated();
    }
    Ok(reading)
}

fn wind_from_c(wind: &CanopyWind) -> WindSample {
    let mut sample = WindSample::new(wind.speed_kmh, wind.direction_deg);
    if wind.gust_kmh.is_finite() {
        sample = sample.with_gust(wind.gust_kmh);
    }
    if wind.estimated {
        sample = sample.estimated();
    }
    sample
}

unsafe fn run_request(
    request: &CanopySimRequest,
) -> Result<Box<CanopySimResult>, DefaultCanopySimError> {
    let city_id = unsafe { string_from_c(request.city_id, "city_id") }?;
    let trees = unsafe { slice_from_c(request.trees, request.tree_count, "trees") }?
        .iter()
        .map(|t| unsafe { tree_from_c(t) })
        .collect::<Result<Vec<_>, _>>()?;
    let stations = unsafe { slice_from_c(request.stations, request.station_count, "stations") }?
        .iter()
        .map(|s| unsafe { station_from_c(s) })
        .collect::<Result<Vec<_>, _>>()?;

    let mut config = SimulationConfig::default();
    if request.grid_resolution_m > 0.0 {
        config.grid_resolution_m = request.grid_resolution_m;
    } else if request.grid_resolution_m.is_nan() {
        return Err(DefaultCanopySimError::invalid_parameter(
            "grid_resolution_m",
            "must be a number",
        ));
    }

    let input = SimulationInput::new(
        trees,
        city_id,
        stations,
        wind_from_c(&request.wind),
        request.season.into(),
    )
    .at_hour(request.hour_of_day);

    let result = Simulator::new(&*CATALOG, &*CITIES)
        .with_config(config)
        .run(input, &NoProgress)?;

    Ok(Box::new(CanopySimResult { result }))
}

/// Run a full simulation and return an owned result handle.
///
/// Blocks until the run completes. On error `*out_result` is set to null and
/// the message is available through `canopy_sim_get_last_error`.
///
/// Returns
/// - `Ok` on success with a handle in `out_result`
/// - `NullPointer` if `request`, `out_result` or a required string/array is null
/// - `InvalidParameter` for non-UTF-8 strings or a NaN resolution
/// - `UnknownCity`, `InvalidInput`, `GridTooLarge` from the simulation itself
///
/// # Safety
///
/// - `request` must point to a valid `CanopySimRequest`; its arrays must hold
///   `tree_count` / `station_count` elements and every string must be
///   null-terminated.
/// - `out_result` must be a valid pointer to write the handle to.
///
/// Example (C)
/// ```c
/// CanopyTree trees[] = {{"t1", "neem", 28.630, 77.215}};
/// CanopySimRequest request = {
///     .city_id = "delhi_central",
///     .trees = trees, .tree_count = 1,
///     .stations = stations, .station_count = station_count,
///     .wind = {12.0, 315.0, NAN, false},
///     .season = Winter, .hour_of_day = 9, .grid_resolution_m = 0.0,
/// };
/// CanopySimResult* result = NULL;
/// if (canopy_sim_run(&request, &result) == Ok) {
///     // ... query ...
///     canopy_sim_result_free(result);
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn canopy_sim_run(
    request: *const CanopySimRequest,
    out_result: *mut *mut CanopySimResult,
) -> CanopySimErrorCode {
    if out_result.is_null() {
        return track_error(&DefaultCanopySimError::null_pointer("out_result"));
    }

    // SAFETY: caller guarantees `request` is null or valid
    let Some(request) = (unsafe { request.as_ref() }) else {
        unsafe {
            *out_result = ptr::null_mut();
        }
        return track_error(&DefaultCanopySimError::null_pointer("request"));
    };

    match unsafe { run_request(request) } {
        Ok(result) => {
            unsafe {
                *out_result = Box::into_raw(result);
            }
            clear_last_error();
            CanopySimErrorCode::Ok
        }
        Err(error) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_result = ptr::null_mut();
            }
            track_error(&error)
        }
    }
}

/// Free a result handle returned by `canopy_sim_run`. Null is a no-op.
///
/// # Safety
/// `ptr` must be null or a handle from `canopy_sim_run` that has not been freed.
#[no_mangle]
pub unsafe extern "C" fn canopy_sim_result_free(ptr: *mut CanopySimResult) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: created by `Box::into_raw` in `canopy_sim_run` and not freed yet
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
