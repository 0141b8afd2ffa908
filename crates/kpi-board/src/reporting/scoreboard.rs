use std::collections::HashMap;

use serde::Serialize;

use super::aggregate::{aggregate, GroupedAggregate};
use super::domain::{
    AreaLevel, AreaReport, ExcellenceCategory, FiscalYear, KpiDefinition, KpiId, Status,
    DISTRICTS, PROVINCE_NAME,
};
use super::evaluate::evaluate;

/// Fully evaluated result line for one KPI and reporting area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreboardRow {
    pub kpi_id: KpiId,
    pub kpi_name: String,
    pub excellence: ExcellenceCategory,
    pub area_level: AreaLevel,
    pub area_name: String,
    pub target: Option<f64>,
    pub total: f64,
    pub rate: f64,
    pub status: Status,
    pub status_label: &'static str,
}

/// Expand definitions against the year's report rows.
///
/// District-level KPIs produce one row per named district, Pending where no
/// report exists. Province-level KPIs produce a single row whose rate sums
/// raw totals and targets across every submitted area before dividing once.
/// The evaluator always receives the KPI-level threshold, never the
/// area-level target.
pub fn build_scoreboard(
    definitions: &[KpiDefinition],
    reports: &[AreaReport],
    fiscal_year: FiscalYear,
) -> Vec<ScoreboardRow> {
    let mut by_kpi: HashMap<&KpiId, Vec<&AreaReport>> = HashMap::new();
    for report in reports {
        if report.fiscal_year == fiscal_year {
            by_kpi.entry(&report.kpi_id).or_default().push(report);
        }
    }

    let mut rows = Vec::new();
    for definition in definitions {
        let submitted = by_kpi.get(&definition.id).map(Vec::as_slice).unwrap_or(&[]);
        match definition.area_level {
            AreaLevel::District => {
                for district in DISTRICTS {
                    let report = submitted
                        .iter()
                        .find(|report| report.area_name == district)
                        .copied();
                    rows.push(district_row(definition, district, report));
                }
            }
            AreaLevel::Province => rows.push(province_row(definition, submitted)),
        }
    }

    rows
}

fn district_row(
    definition: &KpiDefinition,
    district: &str,
    report: Option<&AreaReport>,
) -> ScoreboardRow {
    let (target, total, rate, actual) = match report {
        Some(report) => {
            let combined = aggregate(&report.months, report.target, definition.divide_number);
            (report.target, combined.total, combined.rate, Some(combined.rate))
        }
        None => (None, 0.0, 0.0, None),
    };

    let status = evaluate(definition.condition, definition.target_threshold, actual);

    ScoreboardRow {
        kpi_id: definition.id.clone(),
        kpi_name: definition.name.clone(),
        excellence: definition.excellence,
        area_level: AreaLevel::District,
        area_name: district.to_string(),
        target,
        total,
        rate,
        status,
        status_label: status.label(),
    }
}

fn province_row(definition: &KpiDefinition, submitted: &[&AreaReport]) -> ScoreboardRow {
    let mut grouped = GroupedAggregate::default();
    for report in submitted.iter().copied() {
        grouped.push(report);
    }

    let (target, total, rate, actual) = if grouped.is_empty() {
        (None, 0.0, 0.0, None)
    } else {
        let combined = grouped.finish(definition.divide_number);
        (
            Some(grouped.target_sum()),
            combined.total,
            combined.rate,
            Some(combined.rate),
        )
    };

    let status = evaluate(definition.condition, definition.target_threshold, actual);

    ScoreboardRow {
        kpi_id: definition.id.clone(),
        kpi_name: definition.name.clone(),
        excellence: definition.excellence,
        area_level: AreaLevel::Province,
        area_name: PROVINCE_NAME.to_string(),
        target,
        total,
        rate,
        status,
        status_label: status.label(),
    }
}
