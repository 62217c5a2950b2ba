//! CLI entry point for one end-to-end wrangling run.
//!
//! # Responsibility
//! - Parse a handful of run settings from arguments.
//! - Execute the pipeline against a file or in-memory store and print the
//!   run summary.
//!
//! Usage:
//!   crewdata [--count N] [--fraction F] [--seed S]
//!            [--db PATH] [--charts DIR] [--log-dir DIR]

use chrono::NaiveDate;
use crewdata_core::db::{open_store, open_store_in_memory};
use crewdata_core::{default_log_level, init_logging, Catalog, PipelineService, RunConfig};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

struct CliArgs {
    config: RunConfig,
    db_path: Option<PathBuf>,
    log_dir: Option<String>,
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("crewdata: {message}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = &args.log_dir {
        if let Err(message) = init_logging(default_log_level(), log_dir) {
            eprintln!("crewdata: {message}");
            return ExitCode::FAILURE;
        }
    }

    let conn = match &args.db_path {
        Some(path) => open_store(path),
        None => open_store_in_memory(),
    };
    let conn = match conn {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("crewdata: failed to open store: {err}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        "event=cli_run module=cli status=start store={}",
        args.db_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "memory".to_string())
    );

    let catalog = Catalog::default();
    let service = PipelineService::new(&catalog);
    match service.run(&conn, &args.config) {
        Ok(summary) => {
            println!("generated      {}", summary.generated);
            println!("corrupted      {}", summary.corrupted);
            println!("persisted      {}", summary.persisted);
            println!("clean          {}", summary.counts.clean);
            println!("repaired       {}", summary.counts.repaired);
            println!("flagged        {}", summary.counts.flagged);
            println!("analysis rows  {}", summary.analysis_rows);
            println!("aggregate cells {} (position x year), {} (department x position)",
                summary.by_position_year.len(),
                summary.by_department_position.len(),
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("crewdata: pipeline failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut config = RunConfig::default();
    let mut db_path = None;
    let mut log_dir = None;

    let mut args = args;
    while let Some(flag) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| format!("missing value for {name}"))
        };
        match flag.as_str() {
            "--count" => {
                config.record_count = value("--count")?
                    .parse()
                    .map_err(|_| "count must be a non-negative integer".to_string())?;
            }
            "--fraction" => {
                config.corruption_fraction = value("--fraction")?
                    .parse()
                    .map_err(|_| "fraction must be a number".to_string())?;
            }
            "--seed" => {
                config.seed = value("--seed")?
                    .parse()
                    .map_err(|_| "seed must be a non-negative integer".to_string())?;
            }
            "--as-of" => {
                config.as_of = NaiveDate::parse_from_str(&value("--as-of")?, "%Y-%m-%d")
                    .map_err(|_| "as-of must be a YYYY-MM-DD date".to_string())?;
            }
            "--db" => db_path = Some(PathBuf::from(value("--db")?)),
            "--charts" => config.chart_dir = Some(PathBuf::from(value("--charts")?)),
            "--log-dir" => log_dir = Some(value("--log-dir")?),
            other => return Err(format!("unknown argument `{other}`")),
        }
    }

    Ok(CliArgs {
        config,
        db_path,
        log_dir,
    })
}
