//! Grouped average-salary aggregates.
//!
//! # Responsibility
//! - Group analysis rows by (position, start-year) and by
//!   (department, position) and average salaries per cell.
//!
//! # Invariants
//! - Cells with no observations are omitted, never zero-filled.
//! - `BTreeMap` keys keep iteration order deterministic.
//! - Empty input yields empty tables, not an error.

use crate::report::features::AnalysisRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One aggregate cell: average salary over `headcount` observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryCell {
    pub avg_salary: f64,
    pub headcount: usize,
}

/// (position, start-year) -> average salary.
pub type PositionYearTable = BTreeMap<(String, i32), SalaryCell>;

/// (department, position) -> average salary.
pub type DepartmentPositionTable = BTreeMap<(String, String), SalaryCell>;

/// Average salary grouped by position and start year.
pub fn avg_salary_by_position_year(records: &[AnalysisRecord]) -> PositionYearTable {
    let mut sums: BTreeMap<(String, i32), (i64, usize)> = BTreeMap::new();
    for record in records {
        let entry = sums
            .entry((record.position.clone(), record.start_year))
            .or_default();
        entry.0 += record.salary;
        entry.1 += 1;
    }
    finish(sums)
}

/// Average salary grouped by department and position.
pub fn avg_salary_by_department_position(records: &[AnalysisRecord]) -> DepartmentPositionTable {
    let mut sums: BTreeMap<(String, String), (i64, usize)> = BTreeMap::new();
    for record in records {
        let entry = sums
            .entry((record.department.clone(), record.position.clone()))
            .or_default();
        entry.0 += record.salary;
        entry.1 += 1;
    }
    finish(sums)
}

fn finish<K: Ord>(sums: BTreeMap<K, (i64, usize)>) -> BTreeMap<K, SalaryCell> {
    sums.into_iter()
        .map(|(key, (sum, headcount))| {
            (
                key,
                SalaryCell {
                    avg_salary: sum as f64 / headcount as f64,
                    headcount,
                },
            )
        })
        .collect()
}
