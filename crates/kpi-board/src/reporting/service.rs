use std::io::Read;
use std::sync::Arc;

use super::aggregate::{aggregate, GroupedAggregate};
use super::domain::{
    AreaReport, FiscalMonth, FiscalYear, KpiDefinition, KpiId, MonthlySeries, DISTRICTS,
};
use super::evaluate::evaluate;
use super::repository::{KpiRepository, RepositoryError};
use super::rollup::{rollup, DashboardSummary};
use super::scoreboard::{build_scoreboard, ScoreboardRow};
use super::sheet::{SheetImportError, SheetImporter};
use super::views::{
    AreaBreakdownEntry, KpiDetailView, MonthlySubmission, OverallOutcome, ReportCard,
    SheetImportOutcome,
};

/// Facade composing the repository with evaluation and rollup.
///
/// Every consumer (HTTP routes, CLI, demo, sheet import) reaches the three
/// core computations through here, so the rate and status for a given row
/// are the same number on every screen.
pub struct KpiReportingService<R> {
    repository: Arc<R>,
}

impl<R> KpiReportingService<R>
where
    R: KpiRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Store a department's submission for one KPI, area, and year, replacing
    /// any previous row, and return the freshly evaluated card.
    pub fn submit(&self, submission: MonthlySubmission) -> Result<ReportCard, ReportingError> {
        let definition = self.definition_for(&submission.kpi_id)?;

        let report = AreaReport {
            kpi_id: submission.kpi_id,
            fiscal_year: submission.fiscal_year,
            area_name: submission.area_name,
            target: submission.target,
            months: submission.months,
        };
        let stored = self.repository.upsert_report(report)?;

        Ok(report_card(&definition, &stored))
    }

    /// Merge one monthly figure into the stored row, creating the row when
    /// none exists yet.
    pub fn record_month(
        &self,
        kpi_id: &KpiId,
        fiscal_year: FiscalYear,
        area_name: &str,
        month: FiscalMonth,
        value: f64,
    ) -> Result<ReportCard, ReportingError> {
        let definition = self.definition_for(kpi_id)?;

        let mut report = self
            .repository
            .report(kpi_id, fiscal_year, area_name)?
            .unwrap_or_else(|| AreaReport {
                kpi_id: kpi_id.clone(),
                fiscal_year,
                area_name: area_name.to_string(),
                target: None,
                months: MonthlySeries::empty(),
            });
        report.months.set(month, Some(value));
        let stored = self.repository.upsert_report(report)?;

        Ok(report_card(&definition, &stored))
    }

    /// Evaluated rows for every KPI in the catalog.
    pub fn scoreboard(&self, fiscal_year: FiscalYear) -> Result<Vec<ScoreboardRow>, ReportingError> {
        let definitions = self.repository.definitions()?;
        let reports = self.repository.reports_for_year(fiscal_year)?;
        Ok(build_scoreboard(&definitions, &reports, fiscal_year))
    }

    /// Dashboard counts rolled up from the scoreboard rows.
    pub fn summary(&self, fiscal_year: FiscalYear) -> Result<DashboardSummary, ReportingError> {
        let rows = self.scoreboard(fiscal_year)?;
        Ok(rollup(fiscal_year, &rows))
    }

    /// Per-area breakdown plus the combined outcome for one KPI.
    pub fn kpi_detail(
        &self,
        kpi_id: &KpiId,
        fiscal_year: FiscalYear,
    ) -> Result<KpiDetailView, ReportingError> {
        let definition = self.definition_for(kpi_id)?;
        let mut reports = self.repository.reports_for_kpi(kpi_id, fiscal_year)?;
        reports.sort_by_key(|report| (district_rank(&report.area_name), report.area_name.clone()));

        let mut grouped = GroupedAggregate::default();
        let areas = reports
            .iter()
            .map(|report| {
                grouped.push(report);
                let combined = aggregate(&report.months, report.target, definition.divide_number);
                let status = evaluate(
                    definition.condition,
                    definition.target_threshold,
                    Some(combined.rate),
                );
                AreaBreakdownEntry {
                    area_name: report.area_name.clone(),
                    target: report.target,
                    months: report.months,
                    total: combined.total,
                    rate: combined.rate,
                    status,
                    status_label: status.label(),
                }
            })
            .collect();

        let overall = if grouped.is_empty() {
            let status = evaluate(definition.condition, definition.target_threshold, None);
            OverallOutcome {
                total: 0.0,
                rate: 0.0,
                status,
                status_label: status.label(),
            }
        } else {
            let combined = grouped.finish(definition.divide_number);
            let status = evaluate(
                definition.condition,
                definition.target_threshold,
                Some(combined.rate),
            );
            OverallOutcome {
                total: combined.total,
                rate: combined.rate,
                status,
                status_label: status.label(),
            }
        };

        Ok(KpiDetailView {
            definition,
            fiscal_year,
            areas,
            overall,
        })
    }

    /// Apply a results-sheet export. Rows whose KPI id is not in the catalog
    /// are skipped and reported back rather than failing the whole batch.
    pub fn import_sheet<Rd: Read>(
        &self,
        reader: Rd,
    ) -> Result<SheetImportOutcome, ReportingError> {
        let submissions = SheetImporter::from_reader(reader)?;

        let mut imported = 0;
        let mut skipped = Vec::new();
        for submission in submissions {
            match self.submit(submission) {
                Ok(_) => imported += 1,
                Err(ReportingError::UnknownKpi(id)) => skipped.push(id.0),
                Err(other) => return Err(other),
            }
        }

        if !skipped.is_empty() {
            tracing::warn!(?skipped, "sheet rows skipped for unknown KPIs");
        }

        Ok(SheetImportOutcome { imported, skipped })
    }

    fn definition_for(&self, kpi_id: &KpiId) -> Result<KpiDefinition, ReportingError> {
        self.repository
            .definition(kpi_id)?
            .ok_or_else(|| ReportingError::UnknownKpi(kpi_id.clone()))
    }
}

fn report_card(definition: &KpiDefinition, report: &AreaReport) -> ReportCard {
    let combined = aggregate(&report.months, report.target, definition.divide_number);
    let status = evaluate(
        definition.condition,
        definition.target_threshold,
        Some(combined.rate),
    );

    ReportCard {
        kpi_id: report.kpi_id.clone(),
        kpi_name: definition.name.clone(),
        fiscal_year: report.fiscal_year,
        area_name: report.area_name.clone(),
        target: report.target,
        total: combined.total,
        rate: combined.rate,
        status,
        status_label: status.label(),
    }
}

/// Sort key keeping the named districts in catalog order ahead of any
/// free-form area names.
fn district_rank(area_name: &str) -> usize {
    DISTRICTS
        .iter()
        .position(|district| *district == area_name)
        .unwrap_or(DISTRICTS.len())
}

/// Error raised by the reporting service.
#[derive(Debug, thiserror::Error)]
pub enum ReportingError {
    #[error("unknown KPI {0}")]
    UnknownKpi(KpiId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Import(#[from] SheetImportError),
}
