use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use kpi_board::reporting::{
    AreaLevel, AreaReport, ComparisonOp, ExcellenceCategory, FiscalYear, KpiDefinition,
    KpiId, KpiRepository, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

type ReportKey = (KpiId, FiscalYear, String);

/// Mutex-guarded maps standing in for the relational store.
#[derive(Default, Clone)]
pub(crate) struct InMemoryKpiRepository {
    definitions: Arc<Mutex<BTreeMap<KpiId, KpiDefinition>>>,
    reports: Arc<Mutex<HashMap<ReportKey, AreaReport>>>,
}

impl KpiRepository for InMemoryKpiRepository {
    fn upsert_definition(&self, definition: KpiDefinition) -> Result<(), RepositoryError> {
        let mut guard = self.definitions.lock().expect("definitions mutex poisoned");
        guard.insert(definition.id.clone(), definition);
        Ok(())
    }

    fn definition(&self, id: &KpiId) -> Result<Option<KpiDefinition>, RepositoryError> {
        let guard = self.definitions.lock().expect("definitions mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn definitions(&self) -> Result<Vec<KpiDefinition>, RepositoryError> {
        let guard = self.definitions.lock().expect("definitions mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn upsert_report(&self, report: AreaReport) -> Result<AreaReport, RepositoryError> {
        let mut guard = self.reports.lock().expect("reports mutex poisoned");
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
        let guard = self.reports.lock().expect("reports mutex poisoned");
        Ok(guard
            .get(&(id.clone(), fiscal_year, area_name.to_string()))
            .cloned())
    }

    fn reports_for_kpi(
        &self,
        id: &KpiId,
        fiscal_year: FiscalYear,
    ) -> Result<Vec<AreaReport>, RepositoryError> {
        let guard = self.reports.lock().expect("reports mutex poisoned");
        Ok(guard
            .values()
            .filter(|report| report.kpi_id == *id && report.fiscal_year == fiscal_year)
            .cloned()
            .collect())
    }

    fn reports_for_year(&self, fiscal_year: FiscalYear) -> Result<Vec<AreaReport>, RepositoryError> {
        let guard = self.reports.lock().expect("reports mutex poisoned");
        Ok(guard
            .values()
            .filter(|report| report.fiscal_year == fiscal_year)
            .cloned()
            .collect())
    }
}

/// The provincial KPI catalog loaded at startup. The production deployment
/// syncs this from the master sheet; the bundled set covers every strategy
/// and both area levels.
pub(crate) fn standard_definitions() -> Vec<KpiDefinition> {
    vec![
        KpiDefinition {
            id: KpiId("KPI-PP-01".to_string()),
            name: "Children under five receiving the full vaccination schedule (%)".to_string(),
            area_level: AreaLevel::District,
            condition: Some(ComparisonOp::GreaterOrEqual),
            target_threshold: 90.0,
            divide_number: 100.0,
            excellence: ExcellenceCategory::PreventionPromotion,
        },
        KpiDefinition {
            id: KpiId("KPI-PP-02".to_string()),
            name: "Pregnant women attending the first ANC visit within 12 weeks (%)".to_string(),
            area_level: AreaLevel::District,
            condition: Some(ComparisonOp::GreaterOrEqual),
            target_threshold: 75.0,
            divide_number: 100.0,
            excellence: ExcellenceCategory::PreventionPromotion,
        },
        KpiDefinition {
            id: KpiId("KPI-SV-01".to_string()),
            name: "Diabetes patients with HbA1c under control (%)".to_string(),
            area_level: AreaLevel::District,
            condition: Some(ComparisonOp::GreaterOrEqual),
            target_threshold: 40.0,
            divide_number: 100.0,
            excellence: ExcellenceCategory::Service,
        },
        KpiDefinition {
            id: KpiId("KPI-SV-02".to_string()),
            name: "Emergency referrals reaching a higher-level facility within 30 minutes (%)"
                .to_string(),
            area_level: AreaLevel::Province,
            condition: Some(ComparisonOp::GreaterOrEqual),
            target_threshold: 80.0,
            divide_number: 100.0,
            excellence: ExcellenceCategory::Service,
        },
        KpiDefinition {
            id: KpiId("KPI-PE-01".to_string()),
            name: "Health officers completing mandatory competency training (%)".to_string(),
            area_level: AreaLevel::District,
            condition: Some(ComparisonOp::GreaterOrEqual),
            target_threshold: 70.0,
            divide_number: 100.0,
            excellence: ExcellenceCategory::People,
        },
        KpiDefinition {
            id: KpiId("KPI-GV-01".to_string()),
            name: "Essential-drug stockout incidents per reporting facility".to_string(),
            area_level: AreaLevel::District,
            condition: Some(ComparisonOp::LessOrEqual),
            target_threshold: 2.0,
            divide_number: 1.0,
            excellence: ExcellenceCategory::Governance,
        },
        KpiDefinition {
            id: KpiId("KPI-GV-02".to_string()),
            name: "Hospitals rated financial-risk level 4 or above".to_string(),
            area_level: AreaLevel::Province,
            condition: Some(ComparisonOp::Equal),
            target_threshold: 0.0,
            divide_number: 1.0,
            excellence: ExcellenceCategory::Governance,
        },
        KpiDefinition {
            id: KpiId("KPI-DH-01".to_string()),
            name: "Facilities submitting the 43-file dataset on schedule (%)".to_string(),
            area_level: AreaLevel::District,
            condition: Some(ComparisonOp::GreaterOrEqual),
            target_threshold: 95.0,
            divide_number: 100.0,
            excellence: ExcellenceCategory::DigitalHealth,
        },
    ]
}

pub(crate) fn seeded_repository() -> Result<Arc<InMemoryKpiRepository>, RepositoryError> {
    let repository = Arc::new(InMemoryKpiRepository::default());
    for definition in standard_definitions() {
        repository.upsert_definition(definition)?;
    }
    Ok(repository)
}
