//! Corruption injector: the designed noise model for cleaning to reverse.
//!
//! # Responsibility
//! - Pick ceil(fraction * N) distinct victims without replacement.
//! - Apply exactly one corruption mode per victim, uniformly chosen.
//! - Return ground-truth labels for test verification only.
//!
//! # Invariants
//! - Victim selection and mode assignment are deterministic per RNG state.
//! - Labels live in `InjectionReport`, a type nothing in `clean/` accepts;
//!   detection downstream is blind.

use crate::model::catalog::{Catalog, DIRTY_DATES, DIRTY_SALARIES};
use crate::model::employee::{EmployeeId, EmployeeRecord, FieldKind, RawEmployeeRecord};
use crate::synth::SynthError;
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One way a record can be made dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptionMode {
    /// One required field nulled out.
    MissingField(FieldKind),
    /// Salary replaced with a negative, zero or out-of-band magnitude.
    InvalidSalary,
    /// Start date replaced with a pre-founding or future date.
    InvalidDate,
    /// Position replaced with a title incompatible with the department.
    IllogicalTitle,
}

impl CorruptionMode {
    /// Whether the cleaning rules can ever repair this mode.
    ///
    /// Invalid salaries and dates are flagged rather than guessed, and a
    /// missing start date is never imputed.
    pub fn is_repairable(self) -> bool {
        !matches!(
            self,
            Self::InvalidSalary | Self::InvalidDate | Self::MissingField(FieldKind::StartDate)
        )
    }
}

/// Ground-truth record of one injected corruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorruptionLabel {
    pub id: EmployeeId,
    pub mode: CorruptionMode,
}

/// Ground-truth label set produced alongside the corrupted batch.
///
/// Deliberately a separate type from anything the cleaning pipeline
/// consumes, so tests can compare detection against truth while the
/// pipeline itself stays blind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionReport {
    labels: Vec<CorruptionLabel>,
}

impl InjectionReport {
    /// Labels in victim-selection order.
    pub fn labels(&self) -> &[CorruptionLabel] {
        &self.labels
    }

    /// Number of corrupted records.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns whether nothing was corrupted.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Identifiers of all corrupted records, in stable order.
    pub fn corrupted_ids(&self) -> BTreeSet<EmployeeId> {
        self.labels.iter().map(|label| label.id).collect()
    }

    /// Number of corruptions the cleaning rules can never repair.
    pub fn unrepairable_count(&self) -> usize {
        self.labels
            .iter()
            .filter(|label| !label.mode.is_repairable())
            .count()
    }
}

/// Corrupts `ceil(fraction * records.len())` distinct records.
///
/// # Contract
/// - Every record is returned (corrupted or not) in input order, converted
///   to the raw persisted shape.
/// - Exactly one corruption mode is applied per selected record.
///
/// # Errors
/// - Returns `InvalidArgument` when `fraction` is not a finite value in
///   `[0.0, 1.0]`.
pub fn inject<R: Rng>(
    catalog: &Catalog,
    records: &[EmployeeRecord],
    fraction: f64,
    rng: &mut R,
) -> Result<(Vec<RawEmployeeRecord>, InjectionReport), SynthError> {
    if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
        return Err(SynthError::InvalidArgument(format!(
            "corruption fraction must be in [0.0, 1.0], got {fraction}"
        )));
    }

    let victim_count = ceil_fraction(fraction, records.len());
    let mut raws: Vec<RawEmployeeRecord> =
        records.iter().cloned().map(RawEmployeeRecord::from).collect();
    let mut labels = Vec::with_capacity(victim_count);

    for index in rand::seq::index::sample(rng, records.len(), victim_count) {
        let mode = apply_corruption(catalog, &mut raws[index], rng);
        labels.push(CorruptionLabel {
            id: raws[index].id,
            mode,
        });
    }

    info!(
        "event=inject module=synth status=ok total={} corrupted={} fraction={}",
        records.len(),
        labels.len(),
        fraction
    );

    Ok((raws, InjectionReport { labels }))
}

/// ceil(fraction * n) with tolerance for f64 noise, so 0.20 * 500 is
/// exactly 100 rather than 101.
fn ceil_fraction(fraction: f64, n: usize) -> usize {
    let scaled = fraction * n as f64;
    if (scaled - scaled.round()).abs() < 1e-9 {
        scaled.round() as usize
    } else {
        scaled.ceil() as usize
    }
}

fn apply_corruption<R: Rng>(
    catalog: &Catalog,
    raw: &mut RawEmployeeRecord,
    rng: &mut R,
) -> CorruptionMode {
    match rng.gen_range(0..4u8) {
        0 => {
            let field = FieldKind::ALL[rng.gen_range(0..FieldKind::ALL.len())];
            null_field(raw, field);
            CorruptionMode::MissingField(field)
        }
        1 => {
            raw.salary = Some(DIRTY_SALARIES[rng.gen_range(0..DIRTY_SALARIES.len())]);
            CorruptionMode::InvalidSalary
        }
        2 => {
            raw.start_date = Some(DIRTY_DATES[rng.gen_range(0..DIRTY_DATES.len())]);
            CorruptionMode::InvalidDate
        }
        _ => {
            let pool = raw
                .department
                .as_deref()
                .map(|department| catalog.incompatible_titles_for(department))
                .unwrap_or_default();
            if pool.is_empty() {
                // A catalog where every known title is compatible leaves no
                // illogical material; degrade to a missing position.
                null_field(raw, FieldKind::Position);
                return CorruptionMode::MissingField(FieldKind::Position);
            }
            raw.position = Some(pool[rng.gen_range(0..pool.len())].clone());
            CorruptionMode::IllogicalTitle
        }
    }
}

fn null_field(raw: &mut RawEmployeeRecord, field: FieldKind) {
    match field {
        FieldKind::Name => raw.name = None,
        FieldKind::Department => raw.department = None,
        FieldKind::Position => raw.position = None,
        FieldKind::StartDate => raw.start_date = None,
        FieldKind::Salary => raw.salary = None,
    }
}
