//! Synthetic employee record generator.
//!
//! # Responsibility
//! - Produce N well-formed records from realistic per-field distributions.
//! - Stay byte-identical across runs for the same RNG seed.
//!
//! # Invariants
//! - Every produced record passes `EmployeeRecord::validate`.
//! - Identifiers are unique within one generated batch.
//! - Department/position pairs come straight from the compatibility table.

use crate::model::catalog::Catalog;
use crate::model::employee::{EmployeeId, EmployeeRecord};
use crate::synth::SynthError;
use chrono::Duration;
use log::info;
use rand::Rng;
use std::collections::HashSet;

const ID_MIN: EmployeeId = 100_000;
const ID_MAX: EmployeeId = 999_999;

const FIRST_NAMES: &[&str] = &[
    "Ava", "Ben", "Carlos", "Dana", "Elif", "Farah", "Gabriel", "Hana", "Ivan", "Jade",
    "Kofi", "Lena", "Marcus", "Nadia", "Omar", "Priya", "Quinn", "Rosa", "Sam", "Tomas",
    "Uma", "Viktor", "Wen", "Yara",
];

const LAST_NAMES: &[&str] = &[
    "Almeida", "Brennan", "Chen", "Diallo", "Eriksen", "Fischer", "Garcia", "Haddad",
    "Ito", "Johnson", "Kaur", "Lindqvist", "Moreau", "Nguyen", "Okafor", "Petrov",
    "Quispe", "Rahman", "Silva", "Tremblay", "Ueda", "Volkov", "Walsh", "Zhou",
];

/// Generates `n` well-formed employee records.
///
/// # Contract
/// - `n == 0` fails with `SynthError::InvalidArgument`; any `n >= 1` works.
/// - Output is fully determined by the catalog and the RNG state.
///
/// # Errors
/// - Returns `InvalidArgument` when `n` is zero or the catalog is empty.
pub fn generate<R: Rng>(
    catalog: &Catalog,
    n: usize,
    rng: &mut R,
) -> Result<Vec<EmployeeRecord>, SynthError> {
    if n == 0 {
        return Err(SynthError::InvalidArgument(
            "record count must be at least 1".to_string(),
        ));
    }
    if catalog.departments().is_empty() {
        return Err(SynthError::InvalidArgument(
            "catalog has no departments".to_string(),
        ));
    }

    let window_days = (catalog.hired_before - catalog.hired_after).num_days();
    if window_days < 0 {
        return Err(SynthError::InvalidArgument(
            "catalog hiring window is inverted".to_string(),
        ));
    }

    let mut used_ids: HashSet<EmployeeId> = HashSet::with_capacity(n);
    let mut records = Vec::with_capacity(n);

    for _ in 0..n {
        let id = draw_unique_id(rng, &mut used_ids);

        let department = &catalog.departments()[rng.gen_range(0..catalog.departments().len())];
        let position = &department.positions[rng.gen_range(0..department.positions.len())];
        let band = catalog.band_for(position).ok_or_else(|| {
            SynthError::InvalidArgument(format!("catalog has no salary band for `{position}`"))
        })?;

        let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
        let start_date = catalog.hired_after + Duration::days(rng.gen_range(0..=window_days));
        let salary = rng.gen_range(band.min..=band.max);

        records.push(EmployeeRecord {
            id,
            name: format!("{first} {last}"),
            department: department.name.clone(),
            position: position.clone(),
            start_date,
            salary,
        });
    }

    info!(
        "event=generate module=synth status=ok count={} departments={}",
        records.len(),
        catalog.departments().len()
    );

    Ok(records)
}

fn draw_unique_id<R: Rng>(rng: &mut R, used: &mut HashSet<EmployeeId>) -> EmployeeId {
    loop {
        let candidate = rng.gen_range(ID_MIN..=ID_MAX);
        if used.insert(candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate;
    use crate::model::catalog::Catalog;
    use crate::synth::SynthError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn zero_count_is_invalid_argument() {
        let catalog = Catalog::default();
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate(&catalog, 0, &mut rng).unwrap_err();
        assert!(matches!(err, SynthError::InvalidArgument(_)));
    }

    #[test]
    fn generated_records_are_valid_and_unique() {
        let catalog = Catalog::default();
        let mut rng = StdRng::seed_from_u64(7);
        let records = generate(&catalog, 200, &mut rng).unwrap();

        assert_eq!(records.len(), 200);
        let ids: HashSet<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 200);
        for record in &records {
            record.validate(&catalog).unwrap();
        }
    }

    #[test]
    fn same_seed_reproduces_the_batch() {
        let catalog = Catalog::default();
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);

        let batch_a = generate(&catalog, 50, &mut rng_a).unwrap();
        let batch_b = generate(&catalog, 50, &mut rng_b).unwrap();
        assert_eq!(batch_a, batch_b);
    }
}
