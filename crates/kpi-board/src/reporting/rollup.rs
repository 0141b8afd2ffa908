use std::collections::HashMap;

use serde::Serialize;

use super::aggregate::round2;
use super::domain::{ExcellenceCategory, FiscalYear, Status};
use super::scoreboard::ScoreboardRow;

/// Pass/fail/pending tallies for one dashboard bucket.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pass: usize,
    pub fail: usize,
    pub pending: usize,
    pub total: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Pass => self.pass += 1,
            Status::Fail => self.fail += 1,
            Status::Pending => self.pending += 1,
        }
        self.total += 1;
    }

    /// Share of passing rows as a percentage. The denominator is floored to
    /// 1 so empty buckets report 0 rather than NaN.
    pub fn pass_percent(&self) -> f64 {
        round2(self.pass as f64 / self.total.max(1) as f64 * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcellenceBucket {
    pub excellence: ExcellenceCategory,
    pub excellence_label: &'static str,
    pub counts: StatusCounts,
    pub pass_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaBucket {
    pub area_name: String,
    pub counts: StatusCounts,
    pub pass_percent: f64,
}

/// Dashboard counts for one fiscal year: overall, per excellence strategy,
/// and per reporting area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub fiscal_year: FiscalYear,
    pub overall: StatusCounts,
    pub overall_pass_percent: f64,
    pub by_excellence: Vec<ExcellenceBucket>,
    pub by_area: Vec<AreaBucket>,
}

/// Single pass over evaluated scoreboard rows. Rows are read-only; calling
/// this twice on the same slice yields the same summary.
pub fn rollup(fiscal_year: FiscalYear, rows: &[ScoreboardRow]) -> DashboardSummary {
    let mut overall = StatusCounts::default();
    let mut per_excellence: HashMap<ExcellenceCategory, StatusCounts> = HashMap::new();
    let mut per_area: HashMap<&str, StatusCounts> = HashMap::new();
    let mut area_order: Vec<&str> = Vec::new();

    for row in rows {
        overall.record(row.status);
        per_excellence
            .entry(row.excellence)
            .or_default()
            .record(row.status);

        if !per_area.contains_key(row.area_name.as_str()) {
            area_order.push(row.area_name.as_str());
        }
        per_area
            .entry(row.area_name.as_str())
            .or_default()
            .record(row.status);
    }

    // All five strategy cards render even when a bucket holds no KPIs.
    let by_excellence = ExcellenceCategory::ordered()
        .into_iter()
        .map(|excellence| {
            let counts = per_excellence.get(&excellence).copied().unwrap_or_default();
            ExcellenceBucket {
                excellence,
                excellence_label: excellence.label(),
                counts,
                pass_percent: counts.pass_percent(),
            }
        })
        .collect();

    let by_area = area_order
        .into_iter()
        .map(|area| {
            let counts = per_area.get(area).copied().unwrap_or_default();
            AreaBucket {
                area_name: area.to_string(),
                counts,
                pass_percent: counts.pass_percent(),
            }
        })
        .collect();

    DashboardSummary {
        fiscal_year,
        overall_pass_percent: overall.pass_percent(),
        overall,
        by_excellence,
        by_area,
    }
}
