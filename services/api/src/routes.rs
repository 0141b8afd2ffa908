use std::io::Cursor;
use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use kpi_board::reporting::{KpiReportingService, KpiRepository, ReportingError};
use serde::Deserialize;
use serde_json::json;

use crate::infra::AppState;

#[derive(Debug, Deserialize)]
pub(crate) struct SheetImportRequest {
    pub(crate) csv: String,
}

pub(crate) fn with_reporting_routes<R>(service: Arc<KpiReportingService<R>>) -> Router
where
    R: KpiRepository + 'static,
{
    kpi_board::reporting::reporting_router(service.clone())
        .merge(
            Router::new()
                .route("/api/v1/kpi/import", post(import_endpoint::<R>))
                .with_state(service),
        )
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Apply a results-sheet export pasted or synced from the department
/// spreadsheet. Rows for KPIs outside the catalog are skipped, not fatal.
pub(crate) async fn import_endpoint<R>(
    axum::extract::State(service): axum::extract::State<Arc<KpiReportingService<R>>>,
    Json(payload): Json<SheetImportRequest>,
) -> impl IntoResponse
where
    R: KpiRepository + 'static,
{
    let reader = Cursor::new(payload.csv.into_bytes());
    match service.import_sheet(reader) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error @ ReportingError::Import(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(other) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": other.to_string() })),
        )
            .into_response(),
    }
}
