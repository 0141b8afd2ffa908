use serde::{Deserialize, Serialize};

use super::domain::{FiscalYear, KpiDefinition, KpiId, MonthlySeries, Status};

/// Payload submitted by a department for one KPI, area, and fiscal year.
/// Replaces the stored row wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySubmission {
    pub kpi_id: KpiId,
    pub fiscal_year: FiscalYear,
    pub area_name: String,
    pub target: Option<f64>,
    #[serde(default = "MonthlySeries::empty")]
    pub months: MonthlySeries,
}

/// Evaluation snapshot returned after a submission or month update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCard {
    pub kpi_id: KpiId,
    pub kpi_name: String,
    pub fiscal_year: FiscalYear,
    pub area_name: String,
    pub target: Option<f64>,
    pub total: f64,
    pub rate: f64,
    pub status: Status,
    pub status_label: &'static str,
}

/// Per-area line in the KPI detail modal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaBreakdownEntry {
    pub area_name: String,
    pub target: Option<f64>,
    pub months: MonthlySeries,
    pub total: f64,
    pub rate: f64,
    pub status: Status,
    pub status_label: &'static str,
}

/// Combined outcome across every submitted area of one KPI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallOutcome {
    pub total: f64,
    pub rate: f64,
    pub status: Status,
    pub status_label: &'static str,
}

/// Full detail view for one KPI and fiscal year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiDetailView {
    pub definition: KpiDefinition,
    pub fiscal_year: FiscalYear,
    pub areas: Vec<AreaBreakdownEntry>,
    pub overall: OverallOutcome,
}

/// Result of applying a spreadsheet export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetImportOutcome {
    pub imported: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}
