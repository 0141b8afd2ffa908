use serde::Serialize;

use super::domain::{AreaReport, MonthlySeries};

/// Sum and normalized rate derived from one report row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyAggregate {
    pub total: f64,
    pub rate: f64,
}

/// Fold one area row's monthly slots into a total and a rate.
///
/// The rate is 0 (never null) when the area target is absent or non-positive,
/// so downstream views always have a number to render.
pub fn aggregate(
    months: &MonthlySeries,
    target: Option<f64>,
    divide_number: f64,
) -> MonthlyAggregate {
    let total = months.sum();
    let rate = match target {
        Some(target) if target > 0.0 => round2(total / target * divide_number),
        _ => 0.0,
    };

    MonthlyAggregate { total, rate }
}

/// Accumulator for province-level KPIs that combine many area rows.
///
/// Monthly totals and targets are summed across rows before the single
/// divide step: `rate = Σ totals / Σ targets * divide_number`. This is not
/// the same number as averaging per-row rates.
#[derive(Debug, Default, Clone, Copy)]
pub struct GroupedAggregate {
    total_sum: f64,
    target_sum: f64,
    rows: usize,
}

impl GroupedAggregate {
    pub fn push(&mut self, report: &AreaReport) {
        self.total_sum += report.months.sum();
        self.target_sum += report.target.unwrap_or(0.0);
        self.rows += 1;
    }

    /// True when no rows were accumulated; the caller reports Pending
    /// instead of a zero rate in that case.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn target_sum(&self) -> f64 {
        self.target_sum
    }

    pub fn finish(&self, divide_number: f64) -> MonthlyAggregate {
        let rate = if self.target_sum > 0.0 {
            round2(self.total_sum / self.target_sum * divide_number)
        } else {
            0.0
        };

        MonthlyAggregate {
            total: self.total_sum,
            rate,
        }
    }
}

/// Round to two decimals, half away from zero.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
