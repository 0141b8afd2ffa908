use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use kpi_board::config::AppConfig;
use kpi_board::error::AppError;
use kpi_board::reporting::KpiReportingService;
use kpi_board::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{seeded_repository, AppState};
use crate::routes::with_reporting_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = seeded_repository().map_err(kpi_board::reporting::ReportingError::from)?;
    let service = Arc::new(KpiReportingService::new(repository));

    let app = with_reporting_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "kpi scoreboard service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
