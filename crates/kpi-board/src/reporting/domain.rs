use std::fmt;

use chrono::{Datelike, Local};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for KPI master records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KpiId(pub String);

impl fmt::Display for KpiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Buddhist-calendar fiscal year labelling the October-September reporting window.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FiscalYear(pub u16);

impl FiscalYear {
    /// Fiscal year containing today's date. October and later belong to the
    /// next fiscal year.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        let buddhist = today.year() + 543;
        if today.month() >= 10 {
            Self((buddhist + 1) as u16)
        } else {
            Self(buddhist as u16)
        }
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Months of the fiscal year, October first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiscalMonth {
    October,
    November,
    December,
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
}

impl FiscalMonth {
    pub const fn ordered() -> [Self; 12] {
        [
            Self::October,
            Self::November,
            Self::December,
            Self::January,
            Self::February,
            Self::March,
            Self::April,
            Self::May,
            Self::June,
            Self::July,
            Self::August,
            Self::September,
        ]
    }

    /// Position within the fiscal year (October = 0).
    pub const fn index(self) -> usize {
        match self {
            Self::October => 0,
            Self::November => 1,
            Self::December => 2,
            Self::January => 3,
            Self::February => 4,
            Self::March => 5,
            Self::April => 6,
            Self::May => 7,
            Self::June => 8,
            Self::July => 9,
            Self::August => 10,
            Self::September => 11,
        }
    }

    pub const fn calendar_month(self) -> u32 {
        match self {
            Self::October => 10,
            Self::November => 11,
            Self::December => 12,
            Self::January => 1,
            Self::February => 2,
            Self::March => 3,
            Self::April => 4,
            Self::May => 5,
            Self::June => 6,
            Self::July => 7,
            Self::August => 8,
            Self::September => 9,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::October => "ต.ค.",
            Self::November => "พ.ย.",
            Self::December => "ธ.ค.",
            Self::January => "ม.ค.",
            Self::February => "ก.พ.",
            Self::March => "มี.ค.",
            Self::April => "เม.ย.",
            Self::May => "พ.ค.",
            Self::June => "มิ.ย.",
            Self::July => "ก.ค.",
            Self::August => "ส.ค.",
            Self::September => "ก.ย.",
        }
    }
}

/// Twelve monthly result slots in fiscal order. A null slot means no report
/// was submitted for that month.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlySeries([Option<f64>; 12]);

impl MonthlySeries {
    pub const fn new(values: [Option<f64>; 12]) -> Self {
        Self(values)
    }

    pub const fn empty() -> Self {
        Self([None; 12])
    }

    pub fn get(&self, month: FiscalMonth) -> Option<f64> {
        self.0[month.index()]
    }

    pub fn set(&mut self, month: FiscalMonth, value: Option<f64>) {
        self.0[month.index()] = value;
    }

    pub fn values(&self) -> &[Option<f64>; 12] {
        &self.0
    }

    /// Sum over the twelve slots, treating null as 0. An all-null series and
    /// an all-zero series are indistinguishable here.
    pub fn sum(&self) -> f64 {
        self.0.iter().map(|slot| slot.unwrap_or(0.0)).sum()
    }
}

/// Evaluation outcome rendered as a report badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pass,
    Fail,
    Pending,
}

impl Status {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "ผ่าน",
            Self::Fail => "ไม่ผ่าน",
            Self::Pending => "รอประเมิน",
        }
    }
}

/// Comparison operator configured per KPI. Serializes to its raw token so
/// definitions round-trip against the master sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "=", alias = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
}

impl ComparisonOp {
    /// Parse a condition token. Unknown tokens map to `None`, which the
    /// evaluator treats as Pending rather than an error.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            ">=" => Some(Self::GreaterOrEqual),
            ">" => Some(Self::Greater),
            "<=" => Some(Self::LessOrEqual),
            "<" => Some(Self::Less),
            "=" | "==" => Some(Self::Equal),
            "!=" => Some(Self::NotEqual),
            _ => None,
        }
    }

    pub const fn token(self) -> &'static str {
        match self {
            Self::GreaterOrEqual => ">=",
            Self::Greater => ">",
            Self::LessOrEqual => "<=",
            Self::Less => "<",
            Self::Equal => "=",
            Self::NotEqual => "!=",
        }
    }

    /// Whether `actual` satisfies the operator against the pass/fail bound.
    /// Equality is bit-exact; thresholds are captured to two decimals.
    pub fn passes(self, threshold: f64, actual: f64) -> bool {
        match self {
            Self::GreaterOrEqual => actual >= threshold,
            Self::Greater => actual > threshold,
            Self::LessOrEqual => actual <= threshold,
            Self::Less => actual < threshold,
            Self::Equal => actual == threshold,
            Self::NotEqual => actual != threshold,
        }
    }
}

/// Field deserializer mapping an absent or unrecognized condition token to
/// `None` instead of a deserialization error.
pub fn comparison_op_or_none<'de, D>(deserializer: D) -> Result<Option<ComparisonOp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(ComparisonOp::parse))
}

/// Whether a KPI is scored once for the whole province or once per district.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaLevel {
    Province,
    District,
}

impl AreaLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Province => "Province",
            Self::District => "District",
        }
    }
}

/// The five strategy groupings on the executive dashboard. Grouping only;
/// no effect on evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcellenceCategory {
    PreventionPromotion,
    Service,
    People,
    Governance,
    DigitalHealth,
}

impl ExcellenceCategory {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::PreventionPromotion,
            Self::Service,
            Self::People,
            Self::Governance,
            Self::DigitalHealth,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PreventionPromotion => "PP&P Excellence",
            Self::Service => "Service Excellence",
            Self::People => "People Excellence",
            Self::Governance => "Governance Excellence",
            Self::DigitalHealth => "Digital Health Excellence",
        }
    }
}

/// Master record describing how one KPI is scored.
///
/// `target_threshold` is the pass/fail bound handed to the evaluator;
/// the area-specific target on each report row only feeds the rate
/// denominator. The two are related but never interchangeable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDefinition {
    pub id: KpiId,
    pub name: String,
    pub area_level: AreaLevel,
    #[serde(default, deserialize_with = "comparison_op_or_none")]
    pub condition: Option<ComparisonOp>,
    pub target_threshold: f64,
    #[serde(default = "default_divide_number")]
    pub divide_number: f64,
    pub excellence: ExcellenceCategory,
}

/// Canonical multiplier: rates are percentages unless a definition says
/// otherwise (count-based KPIs set 1 explicitly).
pub fn default_divide_number() -> f64 {
    100.0
}

/// One KPI's submitted results for a fiscal year and reporting area.
/// Overwritten wholesale on resubmission; no versioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaReport {
    pub kpi_id: KpiId,
    pub fiscal_year: FiscalYear,
    pub area_name: String,
    pub target: Option<f64>,
    pub months: MonthlySeries,
}

pub const PROVINCE_NAME: &str = "Phayao";

pub const DISTRICTS: [&str; 9] = [
    "Mueang Phayao",
    "Chun",
    "Chiang Kham",
    "Chiang Muan",
    "Dok Khamtai",
    "Pong",
    "Mae Chai",
    "Phu Sang",
    "Phu Kamyao",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_the_six_tokens_and_the_double_equals_alias() {
        assert_eq!(ComparisonOp::parse(">="), Some(ComparisonOp::GreaterOrEqual));
        assert_eq!(ComparisonOp::parse(">"), Some(ComparisonOp::Greater));
        assert_eq!(ComparisonOp::parse("<="), Some(ComparisonOp::LessOrEqual));
        assert_eq!(ComparisonOp::parse("<"), Some(ComparisonOp::Less));
        assert_eq!(ComparisonOp::parse("="), Some(ComparisonOp::Equal));
        assert_eq!(ComparisonOp::parse("=="), Some(ComparisonOp::Equal));
        assert_eq!(ComparisonOp::parse("!="), Some(ComparisonOp::NotEqual));
        assert_eq!(ComparisonOp::parse(" >= "), Some(ComparisonOp::GreaterOrEqual));
        assert_eq!(ComparisonOp::parse("between"), None);
        assert_eq!(ComparisonOp::parse(""), None);
    }

    #[test]
    fn definition_tolerates_unknown_condition_tokens() {
        let raw = r#"{
            "id": "KPI-XX-99",
            "name": "Legacy indicator",
            "area_level": "district",
            "condition": "between",
            "target_threshold": 80.0,
            "excellence": "governance"
        }"#;
        let definition: KpiDefinition = serde_json::from_str(raw).expect("definition parses");
        assert_eq!(definition.condition, None);
        assert_eq!(definition.divide_number, 100.0);
    }

    #[test]
    fn definition_round_trips_condition_tokens() {
        let raw = r#"{
            "id": "KPI-PP-01",
            "name": "Full vaccination coverage",
            "area_level": "district",
            "condition": ">=",
            "target_threshold": 90.0,
            "divide_number": 100.0,
            "excellence": "prevention_promotion"
        }"#;
        let definition: KpiDefinition = serde_json::from_str(raw).expect("definition parses");
        assert_eq!(definition.condition, Some(ComparisonOp::GreaterOrEqual));

        let json = serde_json::to_value(&definition).expect("serializes");
        assert_eq!(json["condition"], ">=");
    }

    #[test]
    fn monthly_series_sums_with_null_as_zero() {
        let mut months = MonthlySeries::empty();
        assert_eq!(months.sum(), 0.0);

        months.set(FiscalMonth::October, Some(10.0));
        months.set(FiscalMonth::January, Some(20.5));
        months.set(FiscalMonth::September, Some(0.0));
        assert_eq!(months.sum(), 30.5);
        assert_eq!(months.get(FiscalMonth::October), Some(10.0));
        assert_eq!(months.get(FiscalMonth::November), None);
    }

    #[test]
    fn fiscal_months_cover_october_through_september() {
        let ordered = FiscalMonth::ordered();
        assert_eq!(ordered.len(), 12);
        assert_eq!(ordered[0].calendar_month(), 10);
        assert_eq!(ordered[11].calendar_month(), 9);
        for (position, month) in ordered.iter().enumerate() {
            assert_eq!(month.index(), position);
        }
    }

    #[test]
    fn status_labels_render_thai_badges() {
        assert_eq!(Status::Pass.label(), "ผ่าน");
        assert_eq!(Status::Fail.label(), "ไม่ผ่าน");
        assert_eq!(Status::Pending.label(), "รอประเมิน");
    }
}
