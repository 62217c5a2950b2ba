//! End-to-end pipeline runner.
//!
//! # Responsibility
//! - Execute one full batch run against an open store connection.
//! - Surface per-stage structural failures; per-record problems stay flags.
//!
//! # Invariants
//! - One seeded RNG is threaded through generation then injection, so a
//!   whole run is reproducible from `RunConfig` alone.
//! - The ground-truth injection labels never reach the cleaning stage;
//!   only their count is kept for the summary.

use crate::clean::{clean_batch, CleanCounts, CleanError};
use crate::model::catalog::{ymd, Catalog};
use crate::repo::employee_repo::{EmployeeRepository, RepoError, SqliteEmployeeRepository};
use crate::report::{
    avg_salary_by_department_position, avg_salary_by_position_year, enrich, grouped_bar_svg,
    heatmap_svg, DepartmentPositionTable, PositionYearTable,
};
use crate::synth::generator::generate;
use crate::synth::inject::inject;
use crate::synth::SynthError;
use chrono::NaiveDate;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_AS_OF: NaiveDate = ymd(2025, 6, 30);

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Target record count.
    pub record_count: usize,
    /// Fraction of records to corrupt, in [0.0, 1.0].
    pub corruption_fraction: f64,
    /// Seed for the run's RNG.
    pub seed: u64,
    /// Reference date for tenure derivation.
    pub as_of: NaiveDate,
    /// When set, the two chart artifacts are written into this directory.
    pub chart_dir: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            record_count: 500,
            corruption_fraction: 0.20,
            seed: 42,
            as_of: DEFAULT_AS_OF,
            chart_dir: None,
        }
    }
}

/// Result of one full pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub generated: usize,
    pub corrupted: usize,
    pub persisted: usize,
    pub counts: CleanCounts,
    pub analysis_rows: usize,
    pub by_position_year: PositionYearTable,
    pub by_department_position: DepartmentPositionTable,
}

/// Structural pipeline failure. Always aborts the run.
#[derive(Debug)]
pub enum PipelineError {
    InvalidArgument(String),
    Persistence(RepoError),
    Cleaning(CleanError),
    ChartIo {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::Persistence(err) => write!(f, "persistence failure: {err}"),
            Self::Cleaning(err) => write!(f, "{err}"),
            Self::ChartIo { path, source } => {
                write!(f, "failed to write chart `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidArgument(_) => None,
            Self::Persistence(err) => Some(err),
            Self::Cleaning(err) => Some(err),
            Self::ChartIo { source, .. } => Some(source),
        }
    }
}

impl From<SynthError> for PipelineError {
    fn from(value: SynthError) -> Self {
        match value {
            SynthError::InvalidArgument(message) => Self::InvalidArgument(message),
        }
    }
}

impl From<RepoError> for PipelineError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

impl From<CleanError> for PipelineError {
    fn from(value: CleanError) -> Self {
        Self::Cleaning(value)
    }
}

/// Runs the whole batch pipeline against one store connection.
pub struct PipelineService<'a> {
    catalog: &'a Catalog,
}

impl<'a> PipelineService<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Executes generate -> inject -> persist -> read back -> clean ->
    /// enrich -> aggregate -> render.
    ///
    /// # Errors
    /// - `InvalidArgument` for a bad count or fraction.
    /// - `Persistence` when the store rejects the batch or the read-back.
    /// - `Cleaning` when the read-back is empty.
    /// - `ChartIo` when a requested chart artifact cannot be written.
    pub fn run(&self, conn: &Connection, config: &RunConfig) -> Result<RunSummary, PipelineError> {
        info!(
            "event=pipeline_run module=service status=start count={} fraction={} seed={}",
            config.record_count, config.corruption_fraction, config.seed
        );

        let mut rng = StdRng::seed_from_u64(config.seed);
        let records = generate(self.catalog, config.record_count, &mut rng)?;
        let (raws, injection) =
            inject(self.catalog, &records, config.corruption_fraction, &mut rng)?;

        let repo = SqliteEmployeeRepository::new(conn);
        let persisted = repo.bulk_insert(&raws)?;
        let fetched = repo.fetch_all()?;

        let report = clean_batch(self.catalog, &fetched)?;
        let counts = report.counts();

        let analysis = enrich(report.records(), config.as_of);
        let by_position_year = avg_salary_by_position_year(&analysis);
        let by_department_position = avg_salary_by_department_position(&analysis);

        if let Some(dir) = &config.chart_dir {
            std::fs::create_dir_all(dir).map_err(|source| PipelineError::ChartIo {
                path: dir.clone(),
                source,
            })?;
            write_chart(&dir.join("salary_by_position_year.svg"), &grouped_bar_svg(&by_position_year))?;
            write_chart(
                &dir.join("salary_by_department_position.svg"),
                &heatmap_svg(&by_department_position),
            )?;
        }

        info!(
            "event=pipeline_run module=service status=ok persisted={} clean={} repaired={} flagged={}",
            persisted, counts.clean, counts.repaired, counts.flagged
        );

        Ok(RunSummary {
            generated: records.len(),
            corrupted: injection.len(),
            persisted,
            counts,
            analysis_rows: analysis.len(),
            by_position_year,
            by_department_position,
        })
    }
}

fn write_chart(path: &Path, svg: &str) -> Result<(), PipelineError> {
    std::fs::write(path, svg).map_err(|source| PipelineError::ChartIo {
        path: path.to_path_buf(),
        source,
    })
}
