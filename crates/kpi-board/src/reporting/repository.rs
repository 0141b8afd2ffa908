use super::domain::{AreaReport, FiscalYear, KpiDefinition, KpiId};

/// Storage abstraction so the reporting flows can be exercised without a
/// database. The production deployment backs this with the relational store;
/// tests and the bundled service use an in-memory map.
pub trait KpiRepository: Send + Sync {
    fn upsert_definition(&self, definition: KpiDefinition) -> Result<(), RepositoryError>;
    fn definition(&self, id: &KpiId) -> Result<Option<KpiDefinition>, RepositoryError>;
    fn definitions(&self) -> Result<Vec<KpiDefinition>, RepositoryError>;

    fn upsert_report(&self, report: AreaReport) -> Result<AreaReport, RepositoryError>;
    fn report(
        &self,
        id: &KpiId,
        fiscal_year: FiscalYear,
        area_name: &str,
    ) -> Result<Option<AreaReport>, RepositoryError>;
    fn reports_for_kpi(
        &self,
        id: &KpiId,
        fiscal_year: FiscalYear,
    ) -> Result<Vec<AreaReport>, RepositoryError>;
    fn reports_for_year(&self, fiscal_year: FiscalYear) -> Result<Vec<AreaReport>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
