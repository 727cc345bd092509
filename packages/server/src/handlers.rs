//! HTTP handler functions for the crash map API.

use actix_web::{HttpResponse, web};
use crash_map_analytics::filter_records;
use crash_map_crash_models::{FilterState, InjuryMode, YearScope};
use crash_map_dashboard::{Dashboard, DerivedViews, compute_views};
use crash_map_geography::WardSelection;
use crash_map_render::{
    MARKER_PANE, POLYGON_PANE, boundary_layer, grid_clusters, marker_layer,
};
use crash_map_server_models::{
    ApiError, ApiFilterOptions, ApiHealth, ApiWardSelection, ClickQueryParams,
    FilterQueryParams, PointQueryParams, ZoomQueryParams,
};
use serde_json::json;

use crate::AppState;

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Converts query parameters, or builds the `400` response.
fn filter_state(params: &FilterQueryParams) -> Result<FilterState, HttpResponse> {
    params.to_filter_state().map_err(|e| {
        log::warn!("Rejected filter query: {e}");
        HttpResponse::BadRequest().json(ApiError::new(e.to_string()))
    })
}

fn ward_selection(selection: WardSelection, filter: FilterState) -> ApiWardSelection {
    let filter = filter.with_ward(Some(selection.ward.clone()));
    ApiWardSelection {
        ward: selection.ward,
        frame: selection.frame,
        filter,
    }
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        records: state.data.working_set.len(),
        boundaries: state.data.boundaries.len(),
    })
}

/// `GET /api/filters`
///
/// Returns the options for every filter control.
pub async fn filters(state: web::Data<AppState>) -> HttpResponse {
    let working_set = &state.data.working_set;

    HttpResponse::Ok().json(ApiFilterOptions {
        years: working_set.years().to_vec(),
        wards: working_set.wards().to_vec(),
        injury_modes: InjuryMode::all().to_vec(),
        default_year: Dashboard::initial_state(&state.data).year,
        record_count: working_set.len(),
        excluded_count: working_set.excluded_count(),
    })
}

/// `GET /api/view`
///
/// Returns the initial map view, the panes and the marker presentation.
pub async fn view(state: web::Data<AppState>) -> HttpResponse {
    let settings = &state.settings;

    HttpResponse::Ok().json(json!({
        "originalView": settings.original_view,
        "focusZoom": settings.focus_zoom,
        "markers": settings.markers,
        "panes": [POLYGON_PANE, MARKER_PANE],
    }))
}

/// `GET /api/views`
///
/// Recomputes every view (markers, severity donut, yearly trend) for the
/// requested filter state.
pub async fn views(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let filter = match filter_state(&params) {
        Ok(filter) => filter,
        Err(response) => return response,
    };

    HttpResponse::Ok().json(compute_views(&state.data, &filter, &state.settings))
}

/// `GET /api/crashes`
///
/// Returns the marker layer for the requested filter state.
pub async fn crashes(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let filter = match filter_state(&params) {
        Ok(filter) => filter,
        Err(response) => return response,
    };

    let records = filter_records(state.data.working_set.records(), &filter, YearScope::Apply);
    HttpResponse::Ok().json(marker_layer(&records, &state.settings.markers))
}

/// `GET /api/clusters`
///
/// Groups the filtered markers into grid clusters for the given zoom
/// level (the initial zoom when omitted).
pub async fn clusters(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
    zoom: web::Query<ZoomQueryParams>,
) -> HttpResponse {
    let filter = match filter_state(&params) {
        Ok(filter) => filter,
        Err(response) => return response,
    };

    let settings = &state.settings;
    let zoom = zoom.zoom.unwrap_or(settings.original_view.zoom);
    let records = filter_records(state.data.working_set.records(), &filter, YearScope::Apply);
    let layer = marker_layer(&records, &settings.markers);

    HttpResponse::Ok().json(grid_clusters(
        layer.positions(),
        zoom,
        settings.markers.cluster_radius,
    ))
}

/// `GET /api/boundaries`
///
/// Returns the ward polygon layer with the filtered ward marked selected.
pub async fn boundaries(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let filter = match filter_state(&params) {
        Ok(filter) => filter,
        Err(response) => return response,
    };

    HttpResponse::Ok().json(boundary_layer(
        &state.data.boundaries,
        filter.ward.as_deref(),
    ))
}

/// `GET /api/boundaries/select`
///
/// Selects the ward under a clicked point. Responds `404` when no
/// identified ward contains the point.
pub async fn select_at(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
    point: web::Query<PointQueryParams>,
) -> HttpResponse {
    let filter = match filter_state(&params) {
        Ok(filter) => filter,
        Err(response) => return response,
    };

    match state.data.boundaries.select_at(point.into_inner().into()) {
        Some(selection) => {
            log::debug!("Selected ward {} by click", selection.ward);
            HttpResponse::Ok().json(ward_selection(selection, filter))
        }
        None => HttpResponse::NotFound().json(ApiError::new("No ward at this point")),
    }
}

/// `GET /api/wards/{ward}/select`
///
/// Selects a ward by identifier. The optional `lat`/`lng` click is used as
/// the new centre when the ward has no extent.
pub async fn select_ward(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<FilterQueryParams>,
    click: web::Query<ClickQueryParams>,
) -> HttpResponse {
    let filter = match filter_state(&params) {
        Ok(filter) => filter,
        Err(response) => return response,
    };
    let ward = path.into_inner();

    match state.data.boundaries.select_ward(&ward, click.point()) {
        Some(selection) => HttpResponse::Ok().json(ward_selection(selection, filter)),
        None => HttpResponse::NotFound().json(ApiError::new(format!("Unknown ward '{ward}'"))),
    }
}

/// Recomputes the views for the query's filter state, or builds the
/// `400` response. The chart endpoints serve parts of the same bundle as
/// `/api/views`.
fn query_views(state: &AppState, params: &FilterQueryParams) -> Result<DerivedViews, HttpResponse> {
    let filter = filter_state(params)?;
    Ok(compute_views(&state.data, &filter, &state.settings))
}

fn svg_response(svg: String) -> HttpResponse {
    HttpResponse::Ok().content_type(SVG_CONTENT_TYPE).body(svg)
}

/// `GET /api/charts/severity`
///
/// Returns the severity donut for the requested filter state.
pub async fn severity_chart(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    match query_views(&state, &params) {
        Ok(views) => HttpResponse::Ok().json(views.donut),
        Err(response) => response,
    }
}

/// `GET /api/charts/severity.svg`
pub async fn severity_svg(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    match query_views(&state, &params) {
        Ok(views) => svg_response(views.donut.to_svg()),
        Err(response) => response,
    }
}

/// `GET /api/charts/years`
///
/// Returns the yearly trend chart. The year control is ignored so every
/// year stays visible.
pub async fn years_chart(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    match query_views(&state, &params) {
        Ok(views) => HttpResponse::Ok().json(views.bar),
        Err(response) => response,
    }
}

/// `GET /api/charts/years.svg`
pub async fn years_svg(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    match query_views(&state, &params) {
        Ok(views) => svg_response(views.bar.to_svg()),
        Err(response) => response,
    }
}
