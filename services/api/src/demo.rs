use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use kpi_board::error::AppError;
use kpi_board::reporting::{
    DashboardSummary, FiscalMonth, FiscalYear, KpiId, KpiReportingService, MonthlySeries,
    MonthlySubmission, ScoreboardRow,
};

use crate::infra::{seeded_repository, InMemoryKpiRepository};

#[derive(Args, Debug)]
pub(crate) struct ScoreboardArgs {
    /// Buddhist fiscal year to evaluate (defaults to the current one)
    #[arg(long)]
    pub(crate) fiscal_year: Option<u16>,
    /// Optional results-sheet CSV export to hydrate report rows
    #[arg(long)]
    pub(crate) sheet_csv: Option<PathBuf>,
    /// Print every evaluated row, not just the dashboard summary
    #[arg(long)]
    pub(crate) list_rows: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Buddhist fiscal year for the sample submissions (defaults to the current one)
    #[arg(long)]
    pub(crate) fiscal_year: Option<u16>,
}

pub(crate) fn run_scoreboard(args: ScoreboardArgs) -> Result<(), AppError> {
    let fiscal_year = args
        .fiscal_year
        .map(FiscalYear)
        .unwrap_or_else(FiscalYear::current);
    let service = build_service()?;

    if let Some(path) = args.sheet_csv {
        let file = std::fs::File::open(path)?;
        let outcome = service.import_sheet(file)?;
        println!(
            "Imported {} sheet row(s){}",
            outcome.imported,
            if outcome.skipped.is_empty() {
                String::new()
            } else {
                format!(", skipped unknown KPIs: {}", outcome.skipped.join(", "))
            }
        );
    }

    let summary = service.summary(fiscal_year)?;
    render_summary(&summary);

    if args.list_rows {
        let rows = service.scoreboard(fiscal_year)?;
        render_rows(&rows);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let fiscal_year = args
        .fiscal_year
        .map(FiscalYear)
        .unwrap_or_else(FiscalYear::current);
    let service = build_service()?;

    println!("Provincial KPI scoreboard demo, fiscal year {fiscal_year}");
    println!("\nSubmitting sample district results");
    for submission in sample_submissions(fiscal_year) {
        let card = service.submit(submission)?;
        println!(
            "- {} | {} | total {:.2} | rate {:.2} | {}",
            card.kpi_id, card.area_name, card.total, card.rate, card.status_label
        );
    }

    // A single late-arriving month merged into an existing row.
    let card = service.record_month(
        &KpiId("KPI-DH-01".to_string()),
        fiscal_year,
        "Chun",
        FiscalMonth::October,
        27.0,
    )?;
    println!(
        "- {} | {} | single month merged | rate {:.2} | {}",
        card.kpi_id, card.area_name, card.rate, card.status_label
    );

    let summary = service.summary(fiscal_year)?;
    render_summary(&summary);

    let detail = service.kpi_detail(&KpiId("KPI-PP-01".to_string()), fiscal_year)?;
    let condition = detail
        .definition
        .condition
        .map(|op| op.token())
        .unwrap_or("?");
    println!(
        "\nDetail: {} (pass when rate {} {})",
        detail.definition.name, condition, detail.definition.target_threshold
    );
    for area in &detail.areas {
        let latest_month = FiscalMonth::ordered()
            .into_iter()
            .rev()
            .find(|month| area.months.get(*month).is_some());
        println!(
            "- {} | total {:.2} | rate {:.2} | latest {} | {}",
            area.area_name,
            area.total,
            area.rate,
            latest_month.map(FiscalMonth::label).unwrap_or("-"),
            area.status_label
        );
    }
    println!(
        "Combined: total {:.2}, rate {:.2}, {}",
        detail.overall.total, detail.overall.rate, detail.overall.status_label
    );

    Ok(())
}

fn build_service() -> Result<KpiReportingService<InMemoryKpiRepository>, AppError> {
    let repository = seeded_repository().map_err(kpi_board::reporting::ReportingError::from)?;
    Ok(KpiReportingService::new(repository))
}

fn render_summary(summary: &DashboardSummary) {
    println!("\nDashboard summary, fiscal year {}", summary.fiscal_year);
    println!(
        "Overall: {} pass / {} fail / {} pending of {} ({:.2}%)",
        summary.overall.pass,
        summary.overall.fail,
        summary.overall.pending,
        summary.overall.total,
        summary.overall_pass_percent
    );

    println!("\nBy strategy");
    for bucket in &summary.by_excellence {
        println!(
            "- {}: {}/{} passing ({:.2}%)",
            bucket.excellence_label, bucket.counts.pass, bucket.counts.total, bucket.pass_percent
        );
    }

    if !summary.by_area.is_empty() {
        println!("\nBy area");
        for bucket in &summary.by_area {
            println!(
                "- {}: {}/{} passing, {} pending",
                bucket.area_name, bucket.counts.pass, bucket.counts.total, bucket.counts.pending
            );
        }
    }
}

fn render_rows(rows: &[ScoreboardRow]) {
    println!("\nEvaluated rows");
    for row in rows {
        println!(
            "- {} | {} | {} | total {:.2} | rate {:.2} | {}",
            row.kpi_id, row.kpi_name, row.area_name, row.total, row.rate, row.status_label
        );
    }
}

fn sample_submissions(fiscal_year: FiscalYear) -> Vec<MonthlySubmission> {
    let mut submissions = Vec::new();

    submissions.push(submission(
        "KPI-PP-01",
        fiscal_year,
        "Chun",
        420.0,
        &[130.0, 135.0, 128.0],
    ));
    submissions.push(submission(
        "KPI-PP-01",
        fiscal_year,
        "Mueang Phayao",
        980.0,
        &[200.0, 210.0, 190.0],
    ));
    submissions.push(submission(
        "KPI-SV-01",
        fiscal_year,
        "Chun",
        510.0,
        &[70.0, 65.0, 80.0],
    ));
    submissions.push(submission(
        "KPI-SV-02",
        fiscal_year,
        "Chun",
        50.0,
        &[15.0, 16.0, 14.0],
    ));
    submissions.push(submission(
        "KPI-SV-02",
        fiscal_year,
        "Pong",
        50.0,
        &[12.0, 13.0, 13.0],
    ));
    submissions.push(submission(
        "KPI-GV-01",
        fiscal_year,
        "Dok Khamtai",
        18.0,
        &[1.0, 2.0, 0.0],
    ));
    submissions.push(submission(
        "KPI-GV-02",
        fiscal_year,
        "Chun",
        7.0,
        &[0.0, 0.0, 0.0],
    ));

    submissions
}

fn submission(
    kpi_id: &str,
    fiscal_year: FiscalYear,
    area: &str,
    target: f64,
    first_months: &[f64],
) -> MonthlySubmission {
    let mut months = MonthlySeries::empty();
    for (month, value) in FiscalMonth::ordered().into_iter().zip(first_months) {
        months.set(month, Some(*value));
    }

    MonthlySubmission {
        kpi_id: KpiId(kpi_id.to_string()),
        fiscal_year,
        area_name: area.to_string(),
        target: Some(target),
        months,
    }
}
