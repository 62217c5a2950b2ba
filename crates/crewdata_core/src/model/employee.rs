//! Employee domain model.
//!
//! # Responsibility
//! - Define the clean, raw (possibly corrupt) and cleaned record shapes.
//! - Provide invariant validation for well-formed records.
//!
//! # Invariants
//! - `id` is stable through the whole pipeline; records are never dropped.
//! - `EmployeeRecord` always satisfies the catalog invariants;
//!   `RawEmployeeRecord` may violate any of them by design.
//! - Cleaned outcomes are `Clean`, `Repaired` or `FlaggedUnrepairable`;
//!   flagged fields keep their raw value instead of being erased.

use crate::model::catalog::Catalog;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for one employee record.
///
/// Generator-assigned six-digit integer; kept as an alias to make semantic
/// intent explicit in signatures.
pub type EmployeeId = u32;

/// Well-formed synthetic employee record produced by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub name: String,
    pub department: String,
    pub position: String,
    pub start_date: NaiveDate,
    pub salary: i64,
}

/// Persisted record shape: every required field may be missing or invalid.
///
/// This is the only shape the store and the cleaning pipeline ever see;
/// ground-truth corruption labels live in a separate type on purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEmployeeRecord {
    pub id: EmployeeId,
    pub name: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub salary: Option<i64>,
}

impl From<EmployeeRecord> for RawEmployeeRecord {
    fn from(record: EmployeeRecord) -> Self {
        Self {
            id: record.id,
            name: Some(record.name),
            department: Some(record.department),
            position: Some(record.position),
            start_date: Some(record.start_date),
            salary: Some(record.salary),
        }
    }
}

/// Invariant violation found when validating a supposedly clean record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    EmptyName(EmployeeId),
    UnknownPosition {
        id: EmployeeId,
        position: String,
    },
    IncompatibleTitle {
        id: EmployeeId,
        department: String,
        position: String,
    },
    SalaryOutOfBand {
        id: EmployeeId,
        position: String,
        salary: i64,
    },
    StartDateOutOfWindow {
        id: EmployeeId,
        start_date: NaiveDate,
    },
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName(id) => write!(f, "employee {id}: name is empty"),
            Self::UnknownPosition { id, position } => {
                write!(f, "employee {id}: position `{position}` is not in the catalog")
            }
            Self::IncompatibleTitle {
                id,
                department,
                position,
            } => write!(
                f,
                "employee {id}: title `{position}` is not valid in department `{department}`"
            ),
            Self::SalaryOutOfBand {
                id,
                position,
                salary,
            } => write!(
                f,
                "employee {id}: salary {salary} is outside the band for `{position}`"
            ),
            Self::StartDateOutOfWindow { id, start_date } => {
                write!(f, "employee {id}: start date {start_date} is outside the hiring window")
            }
        }
    }
}

impl Error for EmployeeValidationError {}

impl EmployeeRecord {
    /// Checks the catalog invariants on this record.
    ///
    /// # Contract
    /// - Returns the first violation found, in field order.
    /// - A record that passes here survives cleaning untouched.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), EmployeeValidationError> {
        if self.name.trim().is_empty() {
            return Err(EmployeeValidationError::EmptyName(self.id));
        }
        if !self.is_position_known(catalog) {
            return Err(EmployeeValidationError::UnknownPosition {
                id: self.id,
                position: self.position.clone(),
            });
        }
        if !catalog.is_compatible(&self.department, &self.position) {
            return Err(EmployeeValidationError::IncompatibleTitle {
                id: self.id,
                department: self.department.clone(),
                position: self.position.clone(),
            });
        }
        match catalog.band_for(&self.position) {
            Some(band) if band.contains(self.salary) => {}
            _ => {
                return Err(EmployeeValidationError::SalaryOutOfBand {
                    id: self.id,
                    position: self.position.clone(),
                    salary: self.salary,
                });
            }
        }
        if !catalog.is_start_date_valid(self.start_date) {
            return Err(EmployeeValidationError::StartDateOutOfWindow {
                id: self.id,
                start_date: self.start_date,
            });
        }
        Ok(())
    }

    fn is_position_known(&self, catalog: &Catalog) -> bool {
        catalog.band_for(&self.position).is_some()
    }
}

/// Required field of an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Name,
    Department,
    Position,
    StartDate,
    Salary,
}

impl FieldKind {
    /// All required fields in canonical order.
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Name,
        FieldKind::Department,
        FieldKind::Position,
        FieldKind::StartDate,
        FieldKind::Salary,
    ];
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::Department => "department",
            Self::Position => "position",
            Self::StartDate => "start_date",
            Self::Salary => "salary",
        };
        write!(f, "{name}")
    }
}

/// What the cleaning pipeline detected in one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Missing,
    SalaryOutOfBand,
    DateOutOfWindow,
    IncompatibleTitle,
    UnknownDepartment,
}

/// What the cleaning pipeline did about a detected issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Value was filled from batch statistics or the placeholder name.
    Imputed,
    /// Value was substituted from the compatibility table.
    Substituted,
    /// Value could not be repaired; field is excluded from aggregation.
    Unrepairable,
}

/// One detected issue and its resolution, attached to a cleaned record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: FieldKind,
    pub kind: IssueKind,
    pub disposition: Disposition,
}

/// Per-record cleaning verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOutcome {
    /// No issue detected in any field.
    Clean,
    /// At least one field repaired, none unrepairable.
    Repaired,
    /// At least one field could not be repaired.
    FlaggedUnrepairable,
}

/// Record after the cleaning pass, with its verdict and issue trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub id: EmployeeId,
    pub name: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub salary: Option<i64>,
    pub outcome: RecordOutcome,
    pub issues: Vec<FieldIssue>,
}

impl CleanedRecord {
    /// Returns whether this record is excluded from downstream aggregation.
    pub fn is_flagged(&self) -> bool {
        self.outcome == RecordOutcome::FlaggedUnrepairable
    }

    /// Projects the cleaned values back to the raw shape.
    ///
    /// Feeding this back through the cleaning pipeline must be a no-op;
    /// flags are recomputed, values do not move again.
    pub fn to_raw(&self) -> RawEmployeeRecord {
        RawEmployeeRecord {
            id: self.id,
            name: self.name.clone(),
            department: self.department.clone(),
            position: self.position.clone(),
            start_date: self.start_date,
            salary: self.salary,
        }
    }

    /// Issue recorded for `field`, if any.
    pub fn issue_for(&self, field: FieldKind) -> Option<FieldIssue> {
        self.issues.iter().copied().find(|issue| issue.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::{EmployeeRecord, EmployeeValidationError, RawEmployeeRecord};
    use crate::model::catalog::Catalog;
    use chrono::NaiveDate;

    fn sample() -> EmployeeRecord {
        EmployeeRecord {
            id: 123456,
            name: "Dana Fischer".to_string(),
            department: "Security".to_string(),
            position: "Cybersecurity Analyst".to_string(),
            start_date: NaiveDate::from_ymd_opt(2019, 3, 11).unwrap(),
            salary: 98_000,
        }
    }

    #[test]
    fn valid_record_passes() {
        let catalog = Catalog::default();
        sample().validate(&catalog).unwrap();
    }

    #[test]
    fn incompatible_title_is_rejected() {
        let catalog = Catalog::default();
        let mut record = sample();
        record.position = "Data Analyst".to_string();
        let err = record.validate(&catalog).unwrap_err();
        assert!(matches!(
            err,
            EmployeeValidationError::IncompatibleTitle { .. }
        ));
    }

    #[test]
    fn salary_outside_band_is_rejected() {
        let catalog = Catalog::default();
        let mut record = sample();
        record.salary = 10_000;
        let err = record.validate(&catalog).unwrap_err();
        assert!(matches!(err, EmployeeValidationError::SalaryOutOfBand { .. }));
    }

    #[test]
    fn future_start_date_is_rejected() {
        let catalog = Catalog::default();
        let mut record = sample();
        record.start_date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let err = record.validate(&catalog).unwrap_err();
        assert!(matches!(
            err,
            EmployeeValidationError::StartDateOutOfWindow { .. }
        ));
    }

    #[test]
    fn raw_conversion_keeps_every_field() {
        let record = sample();
        let raw = RawEmployeeRecord::from(record.clone());
        assert_eq!(raw.id, record.id);
        assert_eq!(raw.name.as_deref(), Some("Dana Fischer"));
        assert_eq!(raw.salary, Some(98_000));
        assert_eq!(raw.start_date, Some(record.start_date));
    }

    #[test]
    fn raw_record_round_trips_through_json() {
        let mut raw = RawEmployeeRecord::from(sample());
        raw.salary = None;
        let json = serde_json::to_string(&raw).unwrap();
        let decoded: RawEmployeeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, raw);
        assert!(json.contains("\"salary\":null"));
    }
}
