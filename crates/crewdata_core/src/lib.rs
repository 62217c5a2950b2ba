//! Core domain logic for the crewdata wrangling pipeline.
//! This crate is the single source of truth for generation, corruption,
//! cleaning and aggregation invariants.

pub mod clean;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod service;
pub mod synth;

pub use clean::{clean_batch, BatchStats, CleanCounts, CleanError, CleanReport};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::catalog::{Catalog, DepartmentSpec, SalaryBand};
pub use model::employee::{
    CleanedRecord, Disposition, EmployeeId, EmployeeRecord, FieldIssue, FieldKind, IssueKind,
    RawEmployeeRecord, RecordOutcome,
};
pub use repo::employee_repo::{EmployeeRepository, RepoError, RepoResult, SqliteEmployeeRepository};
pub use report::{
    avg_salary_by_department_position, avg_salary_by_position_year, enrich, AnalysisRecord,
};
pub use service::pipeline_service::{PipelineError, PipelineService, RunConfig, RunSummary};
pub use synth::generator::generate;
pub use synth::inject::{inject, CorruptionLabel, CorruptionMode, InjectionReport};
pub use synth::SynthError;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
