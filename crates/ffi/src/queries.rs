use crate::error::{CanopySimErrorCode, DefaultCanopySimError};
use crate::helpers::{handle_ffi_result_error, result_from_ptr, track_error};
use crate::simulation::CanopySimResult;
use crate::types::{CanopyCellData, CanopyFieldLayer, CanopyPoint, CanopySummaryData};

/// Grid dimensions shared by the baseline and projected fields.
///
/// Cells are row-major, rows south → north, columns west → east.
///
/// # Safety
/// `result` must be null or a live handle; `out_rows` and `out_cols` must be
/// valid for writes.
#[no_mangle]
pub unsafe extern "C" fn canopy_sim_grid_dimensions(
    result: *const CanopySimResult,
    out_rows: *mut usize,
    out_cols: *mut usize,
) -> CanopySimErrorCode {
    if out_rows.is_null() {
        return track_error(&DefaultCanopySimError::null_pointer("out_rows"));
    }
    if out_cols.is_null() {
        return track_error(&DefaultCanopySimError::null_pointer("out_cols"));
    }

    handle_ffi_result_error(|| {
        let handle = unsafe { result_from_ptr(result) }?;
        let field = &handle.result.baseline;
        unsafe {
            *out_rows = field.rows();
            *out_cols = field.cols();
        }
        Ok(())
    })
}

/// Copy one cell of the baseline or projected field into `out_cell`.
///
/// # Safety
/// `result` must be null or a live handle; `out_cell` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn canopy_sim_get_cell(
    result: *const CanopySimResult,
    layer: CanopyFieldLayer,
    row: usize,
    col: usize,
    out_cell: *mut CanopyCellData,
) -> CanopySimErrorCode {
    if out_cell.is_null() {
        return track_error(&DefaultCanopySimError::null_pointer("out_cell"));
    }

    handle_ffi_result_error(|| {
        let handle = unsafe { result_from_ptr(result) }?;
        let field = match layer {
            CanopyFieldLayer::Baseline => &handle.result.baseline,
            CanopyFieldLayer::Projected => &handle.result.projected,
        };
        if row >= field.rows() {
            return Err(DefaultCanopySimError::out_of_range("row", row, field.rows()));
        }
        let cell = field
            .cell_at(row, col)
            .ok_or_else(|| DefaultCanopySimError::out_of_range("column", col, field.cols()))?;
        unsafe {
            *out_cell = CanopyCellData::from(cell);
        }
        Ok(())
    })
}

/// Number of impact zones (one per tree with a known species).
///
/// # Safety
/// `result` must be null or a live handle; `out_count` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn canopy_sim_zone_count(
    result: *const CanopySimResult,
    out_count: *mut usize,
) -> CanopySimErrorCode {
    if out_count.is_null() {
        return track_error(&DefaultCanopySimError::null_pointer("out_count"));
    }

    handle_ffi_result_error(|| {
        let handle = unsafe { result_from_ptr(result) }?;
        unsafe {
            *out_count = handle.result.impact_zones.len();
        }
        Ok(())
    })
}

/// Copy the vertices of impact zone `index` into a caller-owned buffer.
///
/// `*out_len` always receives the vertex count. Pass `out_points = NULL` (or a
/// `capacity` of 0) to query the size first; a non-null buffer that is too
/// small is rejected with `InvalidParameter`.
///
/// # Safety
/// `result` must be null or a live handle; `out_points` must be null or valid
/// for `capacity` writes; `out_len` must be valid for writes.
///
/// Example (C)
/// ```c
/// uintptr_t len = 0;
/// canopy_sim_get_zone_vertices(result, 0, NULL, 0, &len);
/// CanopyPoint* points = malloc(len * sizeof(CanopyPoint));
/// canopy_sim_get_zone_vertices(result, 0, points, len, &len);
/// ```
#[no_mangle]
pub unsafe extern "C" fn canopy_sim_get_zone_vertices(
    result: *const CanopySimResult,
    index: usize,
    out_points: *mut CanopyPoint,
    capacity: usize,
    out_len: *mut usize,
) -> CanopySimErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultCanopySimError::null_pointer("out_len"));
    }

    handle_ffi_result_error(|| {
        let handle = unsafe { result_from_ptr(result) }?;
        let zones = &handle.result.impact_zones;
        let zone = zones
            .get(index)
            .ok_or_else(|| DefaultCanopySimError::out_of_range("zone", index, zones.len()))?;

        let polygon = &zone.polygon;
        unsafe {
            *out_len = polygon.len();
        }
        if out_points.is_null() || capacity == 0 {
            return Ok(());
        }
        if capacity < polygon.len() {
            return Err(DefaultCanopySimError::invalid_parameter(
                "capacity",
                &format!("buffer holds {capacity} points, zone has {}", polygon.len()),
            ));
        }

        // SAFETY: non-null and valid for `capacity >= polygon.len()` writes
        let out = unsafe { std::slice::from_raw_parts_mut(out_points, polygon.len()) };
        for (slot, vertex) in out.iter_mut().zip(polygon) {
            *slot = CanopyPoint {
                lat: vertex.lat,
                lng: vertex.lng,
            };
        }
        Ok(())
    })
}

/// Copy the run's KPIs into `out_summary`.
///
/// # Safety
/// `result` must be null or a live handle; `out_summary` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn canopy_sim_get_summary(
    result: *const CanopySimResult,
    out_summary: *mut CanopySummaryData,
) -> CanopySimErrorCode {
    if out_summary.is_null() {
        return track_error(&DefaultCanopySimError::null_pointer("out_summary"));
    }

    handle_ffi_result_error(|| {
        let handle = unsafe { result_from_ptr(result) }?;
        unsafe {
            *out_summary = CanopySummaryData::new(&handle.result.summary, handle.result.stability);
        }
        Ok(())
    })
}
