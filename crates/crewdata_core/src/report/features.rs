//! Derived analysis columns for cleaned records.
//!
//! # Responsibility
//! - Project non-flagged cleaned records into fully-typed analysis rows.
//! - Derive start year, tenure in years and min-max scaled salary.
//!
//! # Invariants
//! - Tenure is computed against an explicit `as_of` date, never the wall
//!   clock, so outputs are reproducible.
//! - Only records without unrepairable fields are projected; flagged rows
//!   stay visible upstream but never reach analysis.

use crate::model::employee::{CleanedRecord, EmployeeId};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Analysis-ready row derived from one non-flagged cleaned record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: EmployeeId,
    pub name: String,
    pub department: String,
    pub position: String,
    pub start_date: NaiveDate,
    pub start_year: i32,
    pub salary: i64,
    /// Years of service at `as_of`, rounded to two decimals.
    pub tenure_years: f64,
    /// Salary min-max scaled over the analysis set; 0.0 when degenerate.
    pub salary_scaled: f64,
}

/// Projects non-flagged records into analysis rows.
///
/// # Contract
/// - Input order is preserved.
/// - Flagged records and records with any absent field are skipped; after
///   a cleaning pass the two sets coincide.
pub fn enrich(records: &[CleanedRecord], as_of: NaiveDate) -> Vec<AnalysisRecord> {
    let mut rows: Vec<AnalysisRecord> = records
        .iter()
        .filter(|record| !record.is_flagged())
        .filter_map(|record| {
            let name = record.name.clone()?;
            let department = record.department.clone()?;
            let position = record.position.clone()?;
            let start_date = record.start_date?;
            let salary = record.salary?;

            Some(AnalysisRecord {
                id: record.id,
                name,
                department,
                position,
                start_date,
                start_year: start_date.year(),
                salary,
                tenure_years: tenure_years(start_date, as_of),
                salary_scaled: 0.0,
            })
        })
        .collect();

    scale_salaries(&mut rows);
    rows
}

fn tenure_years(start_date: NaiveDate, as_of: NaiveDate) -> f64 {
    let days = (as_of - start_date).num_days() as f64;
    round2(days / 365.25)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn scale_salaries(rows: &mut [AnalysisRecord]) {
    let Some(min) = rows.iter().map(|row| row.salary).min() else {
        return;
    };
    let Some(max) = rows.iter().map(|row| row.salary).max() else {
        return;
    };
    let span = (max - min) as f64;

    for row in rows {
        row.salary_scaled = if span == 0.0 {
            0.0
        } else {
            (row.salary - min) as f64 / span
        };
    }
}
