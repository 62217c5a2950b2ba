//! Per-record detection and repair rules.
//!
//! # Responsibility
//! - Mirror every corruption mode with a detection rule and apply the
//!   repair policy: impute categorical/salary gaps, substitute unambiguous
//!   titles, flag everything else.
//!
//! # Invariants
//! - A record with any unrepairable field is flagged, kept, and excluded
//!   from aggregation; its other fields are still repaired.
//! - Salaries are never clamped and dates are never guessed.
//! - Position text is whitespace-normalized before any table lookup.

use crate::clean::stats::BatchStats;
use crate::clean::CleanError;
use crate::model::catalog::{role_keyword, Catalog, UNKNOWN_NAME};
use crate::model::employee::{
    CleanedRecord, Disposition, FieldIssue, FieldKind, IssueKind, RawEmployeeRecord, RecordOutcome,
};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Outcome tallies for one cleaning run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanCounts {
    pub clean: usize,
    pub repaired: usize,
    pub flagged: usize,
}

/// Full-length cleaning result: one cleaned record per input record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanReport {
    records: Vec<CleanedRecord>,
}

impl CleanReport {
    /// Cleaned records in input order.
    pub fn records(&self) -> &[CleanedRecord] {
        &self.records
    }

    /// Consumes the report, yielding the cleaned records.
    pub fn into_records(self) -> Vec<CleanedRecord> {
        self.records
    }

    /// Records not flagged unrepairable, i.e. the aggregation input.
    pub fn analysis_records(&self) -> impl Iterator<Item = &CleanedRecord> {
        self.records.iter().filter(|record| !record.is_flagged())
    }

    /// Outcome tallies.
    pub fn counts(&self) -> CleanCounts {
        let mut counts = CleanCounts::default();
        for record in &self.records {
            match record.outcome {
                RecordOutcome::Clean => counts.clean += 1,
                RecordOutcome::Repaired => counts.repaired += 1,
                RecordOutcome::FlaggedUnrepairable => counts.flagged += 1,
            }
        }
        counts
    }
}

/// Cleans a full raw batch.
///
/// # Contract
/// - Imputation statistics come from the whole batch before any repair.
/// - The report length always equals the input length.
///
/// # Errors
/// - `CleanError::EmptyBatch` when `records` is empty; this is the only
///   way cleaning aborts.
pub fn clean_batch(
    catalog: &Catalog,
    records: &[RawEmployeeRecord],
) -> Result<CleanReport, CleanError> {
    if records.is_empty() {
        return Err(CleanError::EmptyBatch);
    }

    let stats = BatchStats::compute(catalog, records, normalize_title);
    let cleaned: Vec<CleanedRecord> = records
        .iter()
        .map(|record| clean_record(catalog, &stats, record))
        .collect();

    let report = CleanReport { records: cleaned };
    let counts = report.counts();
    info!(
        "event=clean_batch module=clean status=ok total={} clean={} repaired={} flagged={}",
        records.len(),
        counts.clean,
        counts.repaired,
        counts.flagged
    );

    Ok(report)
}

/// Collapses runs of whitespace and trims the ends of a title.
pub fn normalize_title(title: &str) -> String {
    WHITESPACE_RE.replace_all(title.trim(), " ").into_owned()
}

fn clean_record(
    catalog: &Catalog,
    stats: &BatchStats,
    record: &RawEmployeeRecord,
) -> CleanedRecord {
    let mut issues: Vec<FieldIssue> = Vec::new();

    let name = clean_name(record, &mut issues);
    let (department, position) = clean_pair(catalog, stats, record, &mut issues);
    let salary = clean_salary(catalog, stats, record, position.as_deref(), &mut issues);
    let start_date = clean_start_date(catalog, record, &mut issues);

    let outcome = if issues
        .iter()
        .any(|issue| issue.disposition == Disposition::Unrepairable)
    {
        RecordOutcome::FlaggedUnrepairable
    } else if issues.is_empty() {
        RecordOutcome::Clean
    } else {
        RecordOutcome::Repaired
    };

    CleanedRecord {
        id: record.id,
        name,
        department,
        position,
        start_date,
        salary,
        outcome,
        issues,
    }
}

fn clean_name(record: &RawEmployeeRecord, issues: &mut Vec<FieldIssue>) -> Option<String> {
    match record.name.as_deref() {
        Some(name) if !name.trim().is_empty() => Some(name.to_string()),
        _ => {
            issues.push(FieldIssue {
                field: FieldKind::Name,
                kind: IssueKind::Missing,
                disposition: Disposition::Imputed,
            });
            Some(UNKNOWN_NAME.to_string())
        }
    }
}

fn clean_pair(
    catalog: &Catalog,
    stats: &BatchStats,
    record: &RawEmployeeRecord,
    issues: &mut Vec<FieldIssue>,
) -> (Option<String>, Option<String>) {
    let department = record.department.as_deref();
    let position = record
        .position
        .as_deref()
        .map(normalize_title)
        .filter(|p| !p.is_empty());

    match (department, position) {
        (Some(department), Some(position)) => {
            if !catalog.is_known_department(department) {
                issues.push(FieldIssue {
                    field: FieldKind::Department,
                    kind: IssueKind::UnknownDepartment,
                    disposition: Disposition::Unrepairable,
                });
                return (Some(department.to_string()), Some(position));
            }
            if catalog.is_compatible(department, &position) {
                return (Some(department.to_string()), Some(position));
            }
            repair_title(catalog, department, position, issues)
        }
        (Some(department), None) => {
            let modal = catalog
                .is_known_department(department)
                .then(|| stats.modal_position(department))
                .flatten();
            match modal {
                Some(modal) => {
                    issues.push(FieldIssue {
                        field: FieldKind::Position,
                        kind: IssueKind::Missing,
                        disposition: Disposition::Imputed,
                    });
                    (Some(department.to_string()), Some(modal.to_string()))
                }
                None => {
                    issues.push(FieldIssue {
                        field: FieldKind::Position,
                        kind: IssueKind::Missing,
                        disposition: Disposition::Unrepairable,
                    });
                    (Some(department.to_string()), None)
                }
            }
        }
        (None, Some(position)) => match stats.modal_department(&position) {
            Some(modal) => {
                issues.push(FieldIssue {
                    field: FieldKind::Department,
                    kind: IssueKind::Missing,
                    disposition: Disposition::Imputed,
                });
                (Some(modal.to_string()), Some(position))
            }
            None => {
                issues.push(FieldIssue {
                    field: FieldKind::Department,
                    kind: IssueKind::Missing,
                    disposition: Disposition::Unrepairable,
                });
                (None, Some(position))
            }
        },
        (None, None) => {
            issues.push(FieldIssue {
                field: FieldKind::Department,
                kind: IssueKind::Missing,
                disposition: Disposition::Unrepairable,
            });
            issues.push(FieldIssue {
                field: FieldKind::Position,
                kind: IssueKind::Missing,
                disposition: Disposition::Unrepairable,
            });
            (None, None)
        }
    }
}

/// Title incompatible with its department: substitute the unique
/// same-keyword title from the table, otherwise flag.
fn repair_title(
    catalog: &Catalog,
    department: &str,
    position: String,
    issues: &mut Vec<FieldIssue>,
) -> (Option<String>, Option<String>) {
    let keyword = role_keyword(&position);
    let candidates = catalog.titles_with_keyword(department, keyword);

    if candidates.len() == 1 {
        issues.push(FieldIssue {
            field: FieldKind::Position,
            kind: IssueKind::IncompatibleTitle,
            disposition: Disposition::Substituted,
        });
        (Some(department.to_string()), Some(candidates[0].to_string()))
    } else {
        issues.push(FieldIssue {
            field: FieldKind::Position,
            kind: IssueKind::IncompatibleTitle,
            disposition: Disposition::Unrepairable,
        });
        (Some(department.to_string()), Some(position))
    }
}

fn clean_salary(
    catalog: &Catalog,
    stats: &BatchStats,
    record: &RawEmployeeRecord,
    resolved_position: Option<&str>,
    issues: &mut Vec<FieldIssue>,
) -> Option<i64> {
    // Band checks and median imputation are conditioned on the position as
    // resolved by the pair rules; an unusable position already flags the
    // record, so the salary carries no extra verdict then.
    let position_unusable = issues.iter().any(|issue| {
        issue.field == FieldKind::Position && issue.disposition == Disposition::Unrepairable
    });
    let usable_position = resolved_position.filter(|_| !position_unusable);

    match record.salary {
        Some(salary) => {
            let Some(position) = usable_position else {
                return Some(salary);
            };
            match catalog.band_for(position) {
                Some(band) if band.contains(salary) => Some(salary),
                _ => {
                    issues.push(FieldIssue {
                        field: FieldKind::Salary,
                        kind: IssueKind::SalaryOutOfBand,
                        disposition: Disposition::Unrepairable,
                    });
                    Some(salary)
                }
            }
        }
        None => {
            let median = usable_position.and_then(|position| stats.median_salary(position));
            match median {
                Some(median) => {
                    issues.push(FieldIssue {
                        field: FieldKind::Salary,
                        kind: IssueKind::Missing,
                        disposition: Disposition::Imputed,
                    });
                    Some(median)
                }
                None => {
                    issues.push(FieldIssue {
                        field: FieldKind::Salary,
                        kind: IssueKind::Missing,
                        disposition: Disposition::Unrepairable,
                    });
                    None
                }
            }
        }
    }
}

fn clean_start_date(
    catalog: &Catalog,
    record: &RawEmployeeRecord,
    issues: &mut Vec<FieldIssue>,
) -> Option<chrono::NaiveDate> {
    match record.start_date {
        Some(date) if catalog.is_start_date_valid(date) => Some(date),
        Some(date) => {
            issues.push(FieldIssue {
                field: FieldKind::StartDate,
                kind: IssueKind::DateOutOfWindow,
                disposition: Disposition::Unrepairable,
            });
            Some(date)
        }
        None => {
            issues.push(FieldIssue {
                field: FieldKind::StartDate,
                kind: IssueKind::Missing,
                disposition: Disposition::Unrepairable,
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{clean_batch, normalize_title};
    use crate::clean::CleanError;
    use crate::model::catalog::Catalog;
    use crate::model::employee::{
        Disposition, FieldKind, IssueKind, RawEmployeeRecord, RecordOutcome,
    };
    use chrono::NaiveDate;

    fn raw(id: u32, department: &str, position: &str, salary: i64) -> RawEmployeeRecord {
        RawEmployeeRecord {
            id,
            name: Some("Lena Moreau".to_string()),
            department: Some(department.to_string()),
            position: Some(position.to_string()),
            start_date: NaiveDate::from_ymd_opt(2021, 4, 1),
            salary: Some(salary),
        }
    }

    fn security_batch() -> Vec<RawEmployeeRecord> {
        vec![
            raw(1, "Security", "Cybersecurity Analyst", 90_000),
            raw(2, "Security", "Cybersecurity Analyst", 100_000),
            raw(3, "Security", "Cybersecurity Analyst", 110_000),
        ]
    }

    #[test]
    fn empty_batch_is_a_structural_error() {
        let catalog = Catalog::default();
        assert_eq!(clean_batch(&catalog, &[]).unwrap_err(), CleanError::EmptyBatch);
    }

    #[test]
    fn untouched_records_come_back_clean() {
        let catalog = Catalog::default();
        let report = clean_batch(&catalog, &security_batch()).unwrap();
        assert!(report
            .records()
            .iter()
            .all(|r| r.outcome == RecordOutcome::Clean));
    }

    #[test]
    fn missing_salary_is_imputed_with_position_median() {
        let catalog = Catalog::default();
        let mut batch = security_batch();
        batch[0].salary = None;

        let report = clean_batch(&catalog, &batch).unwrap();
        let repaired = &report.records()[0];
        assert_eq!(repaired.outcome, RecordOutcome::Repaired);
        // Median over the two remaining valid salaries, lower middle.
        assert_eq!(repaired.salary, Some(100_000));
    }

    #[test]
    fn out_of_band_salary_is_flagged_not_clamped() {
        let catalog = Catalog::default();
        let mut batch = security_batch();
        batch[1].salary = Some(2_000_000);

        let report = clean_batch(&catalog, &batch).unwrap();
        let flagged = &report.records()[1];
        assert_eq!(flagged.outcome, RecordOutcome::FlaggedUnrepairable);
        assert_eq!(flagged.salary, Some(2_000_000));
        let issue = flagged.issue_for(FieldKind::Salary).unwrap();
        assert_eq!(issue.kind, IssueKind::SalaryOutOfBand);
        assert_eq!(issue.disposition, Disposition::Unrepairable);
        // Every other field stays issue-free.
        assert_eq!(flagged.issues.len(), 1);
    }

    #[test]
    fn missing_date_flags_only_the_date_field() {
        let catalog = Catalog::default();
        let mut batch = security_batch();
        batch[2].start_date = None;
        batch[2].name = None;

        let report = clean_batch(&catalog, &batch).unwrap();
        let record = &report.records()[2];
        assert_eq!(record.outcome, RecordOutcome::FlaggedUnrepairable);
        // Name was still repaired even though the record is flagged.
        assert_eq!(record.name.as_deref(), Some("Unknown"));
        assert_eq!(
            record.issue_for(FieldKind::StartDate).unwrap().disposition,
            Disposition::Unrepairable
        );
    }

    #[test]
    fn incompatible_title_repairs_on_unique_keyword_match() {
        let catalog = Catalog::default();
        let mut batch = security_batch();
        // "Systems Analyst" is an IT Operations title; Security has exactly
        // one Analyst title to substitute.
        batch[0].position = Some("Systems Analyst".to_string());

        let report = clean_batch(&catalog, &batch).unwrap();
        let repaired = &report.records()[0];
        assert_eq!(repaired.outcome, RecordOutcome::Repaired);
        assert_eq!(repaired.position.as_deref(), Some("Cybersecurity Analyst"));
        assert_eq!(
            repaired.issue_for(FieldKind::Position).unwrap().disposition,
            Disposition::Substituted
        );
    }

    #[test]
    fn incompatible_title_without_keyword_match_is_flagged() {
        let catalog = Catalog::default();
        let mut batch = security_batch();
        batch[0].position = Some("Chef".to_string());

        let report = clean_batch(&catalog, &batch).unwrap();
        let flagged = &report.records()[0];
        assert_eq!(flagged.outcome, RecordOutcome::FlaggedUnrepairable);
        assert_eq!(flagged.position.as_deref(), Some("Chef"));
    }

    #[test]
    fn ambiguous_keyword_match_is_flagged() {
        let catalog = Catalog::default();
        let mut batch = vec![
            raw(1, "Cloud & Infrastructure", "Cloud Engineer", 120_000),
            raw(2, "Cloud & Infrastructure", "DevOps Engineer", 120_000),
        ];
        // Two Engineer titles in the department: no unambiguous substitute.
        batch[0].position = Some("Data Engineer".to_string());

        let report = clean_batch(&catalog, &batch).unwrap();
        assert_eq!(
            report.records()[0].outcome,
            RecordOutcome::FlaggedUnrepairable
        );
    }

    #[test]
    fn missing_categorical_fields_are_imputed_from_pair_modes() {
        let catalog = Catalog::default();
        let mut batch = security_batch();
        batch[0].position = None;
        batch[1].department = None;

        let report = clean_batch(&catalog, &batch).unwrap();
        assert_eq!(
            report.records()[0].position.as_deref(),
            Some("Cybersecurity Analyst")
        );
        assert_eq!(report.records()[1].department.as_deref(), Some("Security"));
        assert_eq!(report.records()[0].outcome, RecordOutcome::Repaired);
        assert_eq!(report.records()[1].outcome, RecordOutcome::Repaired);
    }

    #[test]
    fn record_missing_everything_repairable_is_repaired() {
        let catalog = Catalog::default();
        let mut batch = security_batch();
        // Missing name and salary, department/position intact: repairable.
        batch[0].name = None;
        batch[0].salary = None;

        let report = clean_batch(&catalog, &batch).unwrap();
        let record = &report.records()[0];
        assert_eq!(record.outcome, RecordOutcome::Repaired);
        assert_eq!(record.name.as_deref(), Some("Unknown"));
        assert_eq!(record.salary, Some(100_000));
    }

    #[test]
    fn both_pair_fields_missing_is_unrepairable() {
        let catalog = Catalog::default();
        let mut batch = security_batch();
        batch[0].department = None;
        batch[0].position = None;

        let report = clean_batch(&catalog, &batch).unwrap();
        let record = &report.records()[0];
        assert_eq!(record.outcome, RecordOutcome::FlaggedUnrepairable);
        assert!(record.issue_for(FieldKind::Department).is_some());
        assert!(record.issue_for(FieldKind::Position).is_some());
    }

    #[test]
    fn cleaning_is_a_fixed_point() {
        let catalog = Catalog::default();
        let mut batch = security_batch();
        batch[0].salary = None;
        batch[1].position = Some("Chef".to_string());
        batch[2].start_date = NaiveDate::from_ymd_opt(2030, 1, 1);

        let first = clean_batch(&catalog, &batch).unwrap();
        let reprojected: Vec<_> = first.records().iter().map(|r| r.to_raw()).collect();
        let second = clean_batch(&catalog, &reprojected).unwrap();

        let first_values: Vec<_> = first.records().iter().map(|r| r.to_raw()).collect();
        let second_values: Vec<_> = second.records().iter().map(|r| r.to_raw()).collect();
        assert_eq!(first_values, second_values);

        // Flagged set is stable as well.
        let flagged_first: Vec<_> = first.records().iter().map(|r| r.is_flagged()).collect();
        let flagged_second: Vec<_> = second.records().iter().map(|r| r.is_flagged()).collect();
        assert_eq!(flagged_first, flagged_second);
    }

    #[test]
    fn title_normalization_collapses_whitespace() {
        assert_eq!(normalize_title("  Data   Analyst "), "Data Analyst");

        let catalog = Catalog::default();
        let mut batch = security_batch();
        batch[0].position = Some("  Cybersecurity   Analyst ".to_string());

        let report = clean_batch(&catalog, &batch).unwrap();
        assert_eq!(
            report.records()[0].position.as_deref(),
            Some("Cybersecurity Analyst")
        );
        assert_eq!(report.records()[0].outcome, RecordOutcome::Clean);
    }
}
