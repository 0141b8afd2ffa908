mod parser;

use std::io::Read;
use std::path::Path;

use super::domain::{FiscalYear, KpiId, MonthlySeries};
use super::views::MonthlySubmission;

#[derive(Debug)]
pub enum SheetImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for SheetImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetImportError::Io(err) => write!(f, "failed to read results sheet: {}", err),
            SheetImportError::Csv(err) => write!(f, "invalid results sheet data: {}", err),
        }
    }
}

impl std::error::Error for SheetImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SheetImportError::Io(err) => Some(err),
            SheetImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SheetImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SheetImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads the provincial results spreadsheet export into monthly submissions.
///
/// The sheet carries one row per KPI, fiscal year, and area with the twelve
/// month columns in fiscal order (Oct..Sep). Validation against the KPI
/// catalog happens when the submissions are applied, not here.
pub struct SheetImporter;

impl SheetImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<MonthlySubmission>, SheetImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<MonthlySubmission>, SheetImportError> {
        let records = parser::parse_records(reader)?;

        Ok(records
            .into_iter()
            .map(|record| MonthlySubmission {
                kpi_id: KpiId(record.kpi_id),
                fiscal_year: FiscalYear(record.fiscal_year),
                area_name: record.area_name,
                target: record.target,
                months: MonthlySeries::new(record.months),
            })
            .collect())
    }
}
