//! Monthly KPI reporting: submissions, evaluation, aggregation, and
//! dashboard rollups. The computations here are pure and recomputed on
//! every read; nothing in this module performs I/O beyond the repository
//! trait its callers provide.

pub mod aggregate;
pub mod domain;
pub mod evaluate;
pub mod repository;
pub mod rollup;
pub mod router;
pub mod scoreboard;
pub mod service;
pub mod sheet;
pub mod views;

pub use aggregate::{aggregate, GroupedAggregate, MonthlyAggregate};
pub use domain::{
    AreaLevel, AreaReport, ComparisonOp, ExcellenceCategory, FiscalMonth, FiscalYear,
    KpiDefinition, KpiId, MonthlySeries, Status, DISTRICTS, PROVINCE_NAME,
};
pub use evaluate::evaluate;
pub use repository::{KpiRepository, RepositoryError};
pub use rollup::{rollup, AreaBucket, DashboardSummary, ExcellenceBucket, StatusCounts};
pub use router::reporting_router;
pub use scoreboard::{build_scoreboard, ScoreboardRow};
pub use service::{KpiReportingService, ReportingError};
pub use sheet::{SheetImportError, SheetImporter};
pub use views::{
    AreaBreakdownEntry, KpiDetailView, MonthlySubmission, OverallOutcome, ReportCard,
    SheetImportOutcome,
};
