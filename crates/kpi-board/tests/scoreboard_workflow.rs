//! Integration specifications for the monthly reporting workflow.
//!
//! Scenarios run through the public service facade and HTTP router so
//! submission, evaluation, rollup, and routing behavior is validated without
//! reaching into private modules.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use kpi_board::reporting::{
        AreaLevel, AreaReport, ComparisonOp, ExcellenceCategory, FiscalMonth, FiscalYear,
        KpiDefinition, KpiId, KpiReportingService, KpiRepository, MonthlySeries,
        MonthlySubmission, RepositoryError,
    };

    pub(super) const YEAR: FiscalYear = FiscalYear(2569);

    #[derive(Default, Clone)]
    pub(super) struct MemoryRepository {
        definitions: Arc<Mutex<HashMap<KpiId, KpiDefinition>>>,
        reports: Arc<Mutex<HashMap<(KpiId, FiscalYear, String), AreaReport>>>,
    }

    impl KpiRepository for MemoryRepository {
        fn upsert_definition(&self, definition: KpiDefinition) -> Result<(), RepositoryError> {
            let mut guard = self.definitions.lock().expect("lock");
            guard.insert(definition.id.clone(), definition);
            Ok(())
        }

        fn definition(&self, id: &KpiId) -> Result<Option<KpiDefinition>, RepositoryError> {
            let guard = self.definitions.lock().expect("lock");
            Ok(guard.get(id).cloned())
        }

        fn definitions(&self) -> Result<Vec<KpiDefinition>, RepositoryError> {
            let guard = self.definitions.lock().expect("lock");
            let mut definitions: Vec<_> = guard.values().cloned().collect();
            definitions.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(definitions)
        }

        fn upsert_report(&self, report: AreaReport) -> Result<AreaReport, RepositoryError> {
            let mut guard = self.reports.lock().expect("lock");
            let key = (
                report.kpi_id.clone(),
                report.fiscal_year,
                report.area_name.clone(),
            );
            guard.insert(key, report.clone());
            Ok(report)
        }

        fn report(
            &self,
            id: &KpiId,
            fiscal_year: FiscalYear,
            area_name: &str,
        ) -> Result<Option<AreaReport>, RepositoryError> {
            let guard = self.reports.lock().expect("lock");
            Ok(guard
                .get(&(id.clone(), fiscal_year, area_name.to_string()))
                .cloned())
        }

        fn reports_for_kpi(
            &self,
            id: &KpiId,
            fiscal_year: FiscalYear,
        ) -> Result<Vec<AreaReport>, RepositoryError> {
            let guard = self.reports.lock().expect("lock");
            Ok(guard
                .values()
                .filter(|report| report.kpi_id == *id && report.fiscal_year == fiscal_year)
                .cloned()
                .collect())
        }

        fn reports_for_year(
            &self,
            fiscal_year: FiscalYear,
        ) -> Result<Vec<AreaReport>, RepositoryError> {
            let guard = self.reports.lock().expect("lock");
            Ok(guard
                .values()
                .filter(|report| report.fiscal_year == fiscal_year)
                .cloned()
                .collect())
        }
    }

    pub(super) fn catalog() -> Vec<KpiDefinition> {
        vec![
            KpiDefinition {
                id: KpiId("KPI-PP-01".to_string()),
                name: "Full vaccination coverage (%)".to_string(),
                area_level: AreaLevel::District,
                condition: Some(ComparisonOp::GreaterOrEqual),
                target_threshold: 90.0,
                divide_number: 100.0,
                excellence: ExcellenceCategory::PreventionPromotion,
            },
            KpiDefinition {
                id: KpiId("KPI-SV-02".to_string()),
                name: "Emergency referrals within 30 minutes (%)".to_string(),
                area_level: AreaLevel::Province,
                condition: Some(ComparisonOp::GreaterOrEqual),
                target_threshold: 80.0,
                divide_number: 100.0,
                excellence: ExcellenceCategory::Service,
            },
            KpiDefinition {
                id: KpiId("KPI-GV-01".to_string()),
                name: "Drug stockout incidents per facility".to_string(),
                area_level: AreaLevel::District,
                condition: Some(ComparisonOp::LessOrEqual),
                target_threshold: 2.0,
                divide_number: 1.0,
                excellence: ExcellenceCategory::Governance,
            },
            // Legacy row whose condition token never parsed; stays Pending
            // no matter what gets submitted.
            KpiDefinition {
                id: KpiId("KPI-LG-01".to_string()),
                name: "Legacy indicator with unsupported condition".to_string(),
                area_level: AreaLevel::Province,
                condition: None,
                target_threshold: 50.0,
                divide_number: 100.0,
                excellence: ExcellenceCategory::DigitalHealth,
            },
        ]
    }

    pub(super) fn build_service() -> (
        KpiReportingService<MemoryRepository>,
        Arc<MemoryRepository>,
    ) {
        let repository = Arc::new(MemoryRepository::default());
        for definition in catalog() {
            repository
                .upsert_definition(definition)
                .expect("seed definition");
        }
        let service = KpiReportingService::new(repository.clone());
        (service, repository)
    }

    pub(super) fn submission(
        kpi_id: &str,
        area: &str,
        target: f64,
        values: &[f64],
    ) -> MonthlySubmission {
        let mut months = MonthlySeries::empty();
        for (month, value) in FiscalMonth::ordered().into_iter().zip(values) {
            months.set(month, Some(*value));
        }

        MonthlySubmission {
            kpi_id: KpiId(kpi_id.to_string()),
            fiscal_year: YEAR,
            area_name: area.to_string(),
            target: Some(target),
            months,
        }
    }
}

mod evaluation {
    use super::common::*;
    use kpi_board::reporting::{FiscalMonth, KpiId, ReportingError, Status};

    #[test]
    fn passing_submission_returns_a_pass_card() {
        let (service, _) = build_service();
        let card = service
            .submit(submission("KPI-PP-01", "Chun", 100.0, &[45.0, 50.0]))
            .expect("submission succeeds");

        assert_eq!(card.total, 95.0);
        assert_eq!(card.rate, 95.0);
        assert_eq!(card.status, Status::Pass);
        assert_eq!(card.status_label, "ผ่าน");
    }

    #[test]
    fn resubmission_overwrites_the_previous_row() {
        let (service, _) = build_service();
        service
            .submit(submission("KPI-PP-01", "Chun", 100.0, &[10.0]))
            .expect("first submission");
        let card = service
            .submit(submission("KPI-PP-01", "Chun", 100.0, &[95.0]))
            .expect("second submission");

        assert_eq!(card.total, 95.0);
        assert_eq!(card.status, Status::Pass);
    }

    #[test]
    fn unknown_kpi_is_rejected() {
        let (service, _) = build_service();
        let error = service
            .submit(submission("KPI-XX-00", "Chun", 100.0, &[10.0]))
            .expect_err("unknown KPI");
        assert!(matches!(error, ReportingError::UnknownKpi(_)));
    }

    #[test]
    fn record_month_merges_into_the_stored_row() {
        let (service, _) = build_service();
        service
            .submit(submission("KPI-GV-01", "Pong", 18.0, &[1.0]))
            .expect("initial row");

        let card = service
            .record_month(
                &KpiId("KPI-GV-01".to_string()),
                YEAR,
                "Pong",
                FiscalMonth::November,
                2.0,
            )
            .expect("merge month");

        assert_eq!(card.total, 3.0);
        // divide_number 1: incidents per facility
        assert_eq!(card.rate, 0.17);
        assert_eq!(card.status, Status::Pass);
    }

    #[test]
    fn legacy_condition_stays_pending_even_with_data() {
        let (service, _) = build_service();
        let card = service
            .submit(submission("KPI-LG-01", "Chun", 100.0, &[99.0]))
            .expect("submission succeeds");
        assert_eq!(card.status, Status::Pending);
    }
}

mod summary {
    use super::common::*;
    use kpi_board::reporting::{ExcellenceCategory, Status, DISTRICTS};

    #[test]
    fn missing_district_rows_count_as_pending() {
        let (service, _) = build_service();
        service
            .submit(submission("KPI-PP-01", "Chun", 100.0, &[95.0]))
            .expect("one district reports");

        let summary = service.summary(YEAR).expect("summary builds");

        // 9 districts x 2 district KPIs + 2 province KPIs
        assert_eq!(summary.overall.total, DISTRICTS.len() * 2 + 2);
        assert_eq!(summary.overall.pass, 1);
        assert_eq!(summary.overall.fail, 0);
        assert_eq!(summary.overall.pending, summary.overall.total - 1);
    }

    #[test]
    fn empty_strategy_buckets_report_zero_percent() {
        let (service, _) = build_service();
        let summary = service.summary(YEAR).expect("summary builds");

        let people = summary
            .by_excellence
            .iter()
            .find(|bucket| bucket.excellence == ExcellenceCategory::People)
            .expect("people bucket present");
        assert_eq!(people.counts.total, 0);
        assert_eq!(people.pass_percent, 0.0);
    }

    #[test]
    fn summary_is_stable_across_repeated_reads() {
        let (service, _) = build_service();
        service
            .submit(submission("KPI-PP-01", "Chun", 100.0, &[95.0]))
            .expect("submission");
        service
            .submit(submission("KPI-SV-02", "Pong", 50.0, &[44.0]))
            .expect("submission");

        let first = service.summary(YEAR).expect("first read");
        let second = service.summary(YEAR).expect("second read");
        assert_eq!(first, second);
    }

    #[test]
    fn province_kpi_groups_district_rows() {
        let (service, _) = build_service();
        service
            .submit(submission("KPI-SV-02", "Chun", 10.0, &[10.0]))
            .expect("submission");
        service
            .submit(submission("KPI-SV-02", "Pong", 190.0, &[90.0]))
            .expect("submission");

        let rows = service.scoreboard(YEAR).expect("scoreboard");
        let province = rows
            .iter()
            .find(|row| row.kpi_id.0 == "KPI-SV-02")
            .expect("province row");

        // (10 + 90) / (10 + 190) * 100, not the average of 100% and 47.37%
        assert_eq!(province.rate, 50.0);
        assert_eq!(province.status, Status::Fail);
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use kpi_board::reporting::reporting_router;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn build_router() -> axum::Router {
        let (service, _) = build_service();
        reporting_router(Arc::new(service))
    }

    #[tokio::test]
    async fn post_report_returns_the_evaluated_card() {
        let router = build_router();
        let payload = submission("KPI-PP-01", "Chun", 100.0, &[95.0]);

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/kpi/reports")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&payload).expect("serialize submission"),
            ))
            .expect("request");

        let response = router.oneshot(request).await.expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let card: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(card.get("status").and_then(Value::as_str), Some("pass"));
        assert_eq!(card.get("rate").and_then(Value::as_f64), Some(95.0));
    }

    #[tokio::test]
    async fn post_report_for_unknown_kpi_is_not_found() {
        let router = build_router();
        let payload = submission("KPI-XX-00", "Chun", 100.0, &[95.0]);

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/kpi/reports")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&payload).expect("serialize submission"),
            ))
            .expect("request");

        let response = router.oneshot(request).await.expect("dispatch");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn scoreboard_and_summary_render_for_an_empty_year() {
        let router = build_router();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/kpi/scoreboard/2569")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let rows: Value = serde_json::from_slice(&body).expect("json");
        let rows = rows.as_array().expect("array");
        assert!(!rows.is_empty());
        assert!(rows
            .iter()
            .all(|row| row.get("status").and_then(Value::as_str) == Some("pending")));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/kpi/summary/2569")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let summary: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(
            summary
                .pointer("/overall/pass")
                .and_then(Value::as_u64),
            Some(0)
        );
        assert_eq!(
            summary.get("overall_pass_percent").and_then(Value::as_f64),
            Some(0.0)
        );
    }

    #[tokio::test]
    async fn detail_endpoint_distinguishes_known_from_unknown_kpis() {
        let (service, _) = build_service();
        service
            .submit(submission("KPI-PP-01", "Chun", 100.0, &[95.0]))
            .expect("submission");
        let router = reporting_router(Arc::new(service));

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/kpi/KPI-PP-01/detail/2569")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let detail: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(
            detail.pointer("/overall/rate").and_then(Value::as_f64),
            Some(95.0)
        );
        assert_eq!(
            detail
                .get("areas")
                .and_then(Value::as_array)
                .map(Vec::len),
            Some(1)
        );

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/kpi/KPI-XX-00/detail/2569")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
