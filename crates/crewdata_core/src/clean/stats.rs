//! Batch imputation statistics.
//!
//! # Responsibility
//! - Compute per-position salary medians and modal department/position
//!   pairings from the raw batch, before any repair is applied.
//!
//! # Invariants
//! - Only values that already satisfy the catalog invariants contribute:
//!   band-valid salaries, table-compatible pairs.
//! - Median and mode selection are deterministic; mode ties break toward
//!   the lexicographically smaller value.

use crate::model::catalog::Catalog;
use crate::model::employee::RawEmployeeRecord;
use std::collections::BTreeMap;

/// Imputation statistics derived once per cleaning run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    median_salary_by_position: BTreeMap<String, i64>,
    modal_position_by_department: BTreeMap<String, String>,
    modal_department_by_position: BTreeMap<String, String>,
}

impl BatchStats {
    /// Computes statistics from the full raw batch.
    ///
    /// `normalize` is applied to position text before lookups so stats and
    /// repair see the same title spelling.
    pub fn compute(
        catalog: &Catalog,
        records: &[RawEmployeeRecord],
        normalize: impl Fn(&str) -> String,
    ) -> Self {
        let mut salaries: BTreeMap<String, Vec<i64>> = BTreeMap::new();
        let mut pair_counts: BTreeMap<(String, String), usize> = BTreeMap::new();

        for record in records {
            let position = record.position.as_deref().map(&normalize);

            if let (Some(position), Some(salary)) = (position.as_deref(), record.salary) {
                if catalog
                    .band_for(position)
                    .is_some_and(|band| band.contains(salary))
                {
                    salaries.entry(position.to_string()).or_default().push(salary);
                }
            }

            if let (Some(department), Some(position)) =
                (record.department.as_deref(), position.as_deref())
            {
                if catalog.is_compatible(department, position) {
                    *pair_counts
                        .entry((department.to_string(), position.to_string()))
                        .or_default() += 1;
                }
            }
        }

        let mut median_salary_by_position = BTreeMap::new();
        for (position, mut values) in salaries {
            values.sort_unstable();
            // Lower middle, so the imputed value is always an observed one.
            let median = values[(values.len() - 1) / 2];
            median_salary_by_position.insert(position, median);
        }

        let mut position_counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        let mut department_counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        for ((department, position), count) in pair_counts {
            *position_counts
                .entry(department.clone())
                .or_default()
                .entry(position.clone())
                .or_default() += count;
            *department_counts
                .entry(position)
                .or_default()
                .entry(department)
                .or_default() += count;
        }

        Self {
            median_salary_by_position,
            modal_position_by_department: pick_modes(position_counts),
            modal_department_by_position: pick_modes(department_counts),
        }
    }

    /// Median of band-valid salaries observed for `position`.
    pub fn median_salary(&self, position: &str) -> Option<i64> {
        self.median_salary_by_position.get(position).copied()
    }

    /// Most frequent valid position observed inside `department`.
    pub fn modal_position(&self, department: &str) -> Option<&str> {
        self.modal_position_by_department
            .get(department)
            .map(String::as_str)
    }

    /// Most frequent department observed for `position`.
    pub fn modal_department(&self, position: &str) -> Option<&str> {
        self.modal_department_by_position
            .get(position)
            .map(String::as_str)
    }
}

fn pick_modes(counts: BTreeMap<String, BTreeMap<String, usize>>) -> BTreeMap<String, String> {
    counts
        .into_iter()
        .filter_map(|(key, candidates)| {
            // BTreeMap iterates ascending, so a strict `>` keeps the
            // lexicographically smaller candidate on ties.
            candidates
                .into_iter()
                .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
                .map(|(value, _)| (key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::BatchStats;
    use crate::model::catalog::Catalog;
    use crate::model::employee::RawEmployeeRecord;
    use chrono::NaiveDate;

    fn raw(id: u32, department: &str, position: &str, salary: i64) -> RawEmployeeRecord {
        RawEmployeeRecord {
            id,
            name: Some("Sam Walsh".to_string()),
            department: Some(department.to_string()),
            position: Some(position.to_string()),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            salary: Some(salary),
        }
    }

    #[test]
    fn median_takes_lower_middle_of_observed_values() {
        let catalog = Catalog::default();
        let records = vec![
            raw(1, "Security", "Cybersecurity Analyst", 90_000),
            raw(2, "Security", "Cybersecurity Analyst", 100_000),
            raw(3, "Security", "Cybersecurity Analyst", 120_000),
            raw(4, "Security", "Cybersecurity Analyst", 130_000),
        ];
        let stats = BatchStats::compute(&catalog, &records, |s| s.to_string());
        assert_eq!(stats.median_salary("Cybersecurity Analyst"), Some(100_000));
    }

    #[test]
    fn out_of_band_salaries_do_not_contribute() {
        let catalog = Catalog::default();
        let records = vec![
            raw(1, "Security", "Cybersecurity Analyst", 90_000),
            raw(2, "Security", "Cybersecurity Analyst", 2_000_000),
        ];
        let stats = BatchStats::compute(&catalog, &records, |s| s.to_string());
        assert_eq!(stats.median_salary("Cybersecurity Analyst"), Some(90_000));
    }

    #[test]
    fn modal_pairings_count_only_compatible_pairs() {
        let catalog = Catalog::default();
        let records = vec![
            raw(1, "Data & Analytics", "Data Engineer", 100_000),
            raw(2, "Data & Analytics", "Data Engineer", 110_000),
            raw(3, "Data & Analytics", "Data Analyst", 80_000),
            // Incompatible pair; must not influence the mode.
            raw(4, "Data & Analytics", "Cloud Engineer", 100_000),
        ];
        let stats = BatchStats::compute(&catalog, &records, |s| s.to_string());
        assert_eq!(stats.modal_position("Data & Analytics"), Some("Data Engineer"));
        assert_eq!(stats.modal_department("Data Analyst"), Some("Data & Analytics"));
        assert_eq!(stats.modal_department("Cloud Engineer"), None);
    }

    #[test]
    fn mode_ties_break_lexicographically() {
        let catalog = Catalog::default();
        let records = vec![
            raw(1, "Software Engineering", "Software Developer", 100_000),
            raw(2, "Software Engineering", "QA Engineer", 90_000),
        ];
        let stats = BatchStats::compute(&catalog, &records, |s| s.to_string());
        assert_eq!(
            stats.modal_position("Software Engineering"),
            Some("QA Engineer")
        );
    }
}
