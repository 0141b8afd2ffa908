use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{FiscalYear, KpiId};
use super::repository::KpiRepository;
use super::service::{KpiReportingService, ReportingError};
use super::views::MonthlySubmission;

/// Router builder exposing the reporting endpoints over a shared service.
pub fn reporting_router<R>(service: Arc<KpiReportingService<R>>) -> Router
where
    R: KpiRepository + 'static,
{
    Router::new()
        .route("/api/v1/kpi/reports", post(submit_handler::<R>))
        .route(
            "/api/v1/kpi/scoreboard/:fiscal_year",
            get(scoreboard_handler::<R>),
        )
        .route(
            "/api/v1/kpi/summary/:fiscal_year",
            get(summary_handler::<R>),
        )
        .route(
            "/api/v1/kpi/:kpi_id/detail/:fiscal_year",
            get(detail_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<KpiReportingService<R>>>,
    axum::Json(submission): axum::Json<MonthlySubmission>,
) -> Response
where
    R: KpiRepository + 'static,
{
    match service.submit(submission) {
        Ok(card) => (StatusCode::OK, axum::Json(card)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn scoreboard_handler<R>(
    State(service): State<Arc<KpiReportingService<R>>>,
    Path(fiscal_year): Path<u16>,
) -> Response
where
    R: KpiRepository + 'static,
{
    match service.scoreboard(FiscalYear(fiscal_year)) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<KpiReportingService<R>>>,
    Path(fiscal_year): Path<u16>,
) -> Response
where
    R: KpiRepository + 'static,
{
    match service.summary(FiscalYear(fiscal_year)) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<KpiReportingService<R>>>,
    Path((kpi_id, fiscal_year)): Path<(String, u16)>,
) -> Response
where
    R: KpiRepository + 'static,
{
    let id = KpiId(kpi_id);
    match service.kpi_detail(&id, FiscalYear(fiscal_year)) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ReportingError) -> Response {
    let status = match &error {
        ReportingError::UnknownKpi(_) => StatusCode::NOT_FOUND,
        ReportingError::Import(_) => StatusCode::BAD_REQUEST,
        ReportingError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
