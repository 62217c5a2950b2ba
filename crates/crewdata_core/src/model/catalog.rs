//! Department/position catalog and wrangling constants.
//!
//! # Responsibility
//! - Define the fixed department -> valid title compatibility table.
//! - Define role-conditioned salary bands and the valid hiring window.
//! - Define the fixed dirty-value pools used by the corruption injector.
//!
//! # Invariants
//! - Every position listed under a department has a salary band.
//! - All salary bands lie inside the global plausible envelope.
//! - Injected dirty salaries/dates fall outside every band/window, so the
//!   cleaning rules can always detect them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub(crate) const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("date literal is invalid"),
    }
}

/// Earliest plausible start date (company founding).
pub const FOUNDING_DATE: NaiveDate = ymd(2015, 1, 1);

/// Latest start date considered valid by the hiring window.
pub const HIRING_WINDOW_END: NaiveDate = ymd(2024, 12, 31);

/// Placeholder used when a missing name is imputed.
pub const UNKNOWN_NAME: &str = "Unknown";

const DEPARTMENT_TABLE: &[(&str, &[&str])] = &[
    (
        "Data & Analytics",
        &[
            "Data Analyst",
            "Data Engineer",
            "ML Engineer",
            "Database Administrator",
        ],
    ),
    (
        "Cloud & Infrastructure",
        &["Cloud Engineer", "DevOps Engineer", "Network Administrator"],
    ),
    ("Security", &["Cybersecurity Analyst"]),
    ("Software Engineering", &["Software Developer", "QA Engineer"]),
    ("IT Operations", &["IT Support Specialist", "Systems Analyst"]),
];

const SALARY_BANDS: &[(&str, i64, i64)] = &[
    ("Data Analyst", 60_000, 110_000),
    ("Data Engineer", 85_000, 160_000),
    ("ML Engineer", 100_000, 200_000),
    ("Database Administrator", 75_000, 140_000),
    ("Cloud Engineer", 90_000, 170_000),
    ("DevOps Engineer", 85_000, 165_000),
    ("Network Administrator", 65_000, 120_000),
    ("Cybersecurity Analyst", 80_000, 150_000),
    ("Software Developer", 80_000, 175_000),
    ("QA Engineer", 65_000, 125_000),
    ("IT Support Specialist", 60_000, 95_000),
    ("Systems Analyst", 70_000, 130_000),
];

/// Titles from outside IT used as illogical-title corruption material.
pub const NON_IT_TITLES: &[&str] = &[
    "Chef",
    "Cashier",
    "Delivery Driver",
    "Nurse",
    "Teacher",
    "Pilot",
];

/// Dirty salary pool: negative, zero, below-band and above-band magnitudes.
pub const DIRTY_SALARIES: &[i64] = &[-5_000, 0, 45_000, 350_000, 2_000_000];

/// Dirty start dates: pre-founding and future.
pub const DIRTY_DATES: &[NaiveDate] = &[ymd(2010, 5, 1), ymd(2030, 1, 1), ymd(2025, 12, 31)];

/// Inclusive salary range considered plausible for one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBand {
    pub min: i64,
    pub max: i64,
}

impl SalaryBand {
    /// Returns whether `salary` is positive and inside the band.
    pub fn contains(&self, salary: i64) -> bool {
        salary > 0 && salary >= self.min && salary <= self.max
    }
}

/// One department and the titles valid inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentSpec {
    pub name: String,
    pub positions: Vec<String>,
}

/// Static department/position/salary catalog.
///
/// Constructed once and passed by reference through every component, so
/// tests can substitute a smaller or adversarial table without touching
/// the pipeline code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    departments: Vec<DepartmentSpec>,
    bands: Vec<(String, SalaryBand)>,
    pub hired_after: NaiveDate,
    pub hired_before: NaiveDate,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            departments: DEPARTMENT_TABLE
                .iter()
                .map(|(name, positions)| DepartmentSpec {
                    name: (*name).to_string(),
                    positions: positions.iter().map(|p| (*p).to_string()).collect(),
                })
                .collect(),
            bands: SALARY_BANDS
                .iter()
                .map(|(position, min, max)| {
                    ((*position).to_string(), SalaryBand { min: *min, max: *max })
                })
                .collect(),
            hired_after: FOUNDING_DATE,
            hired_before: HIRING_WINDOW_END,
        }
    }
}

impl Catalog {
    /// Builds a catalog from explicit parts. Test seam; production code
    /// uses `Catalog::default()`.
    pub fn new(
        departments: Vec<DepartmentSpec>,
        bands: Vec<(String, SalaryBand)>,
        hired_after: NaiveDate,
        hired_before: NaiveDate,
    ) -> Self {
        Self {
            departments,
            bands,
            hired_after,
            hired_before,
        }
    }

    /// All departments in declaration order.
    pub fn departments(&self) -> &[DepartmentSpec] {
        &self.departments
    }

    /// Valid titles for one department, or `None` for an unknown department.
    pub fn positions_for(&self, department: &str) -> Option<&[String]> {
        self.departments
            .iter()
            .find(|spec| spec.name == department)
            .map(|spec| spec.positions.as_slice())
    }

    /// Returns whether `department` exists in the table at all.
    pub fn is_known_department(&self, department: &str) -> bool {
        self.positions_for(department).is_some()
    }

    /// Returns whether the department/position pair is in the table.
    pub fn is_compatible(&self, department: &str, position: &str) -> bool {
        self.positions_for(department)
            .is_some_and(|positions| positions.iter().any(|p| p == position))
    }

    /// Salary band for one position, or `None` for an unknown title.
    pub fn band_for(&self, position: &str) -> Option<SalaryBand> {
        self.bands
            .iter()
            .find(|(name, _)| name == position)
            .map(|(_, band)| *band)
    }

    /// Returns whether `date` lies inside the valid hiring window.
    pub fn is_start_date_valid(&self, date: NaiveDate) -> bool {
        date >= self.hired_after && date <= self.hired_before
    }

    /// Titles in `department` whose role keyword equals `keyword`.
    ///
    /// Used by illogical-title repair: substitution happens only when the
    /// returned set has exactly one entry.
    pub fn titles_with_keyword(&self, department: &str, keyword: &str) -> Vec<&str> {
        self.positions_for(department)
            .map(|positions| {
                positions
                    .iter()
                    .filter(|p| role_keyword(p) == keyword)
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Titles incompatible with `department`: every other department's
    /// titles plus the fixed non-IT pool. Deterministic order.
    pub fn incompatible_titles_for(&self, department: &str) -> Vec<String> {
        let mut titles: Vec<String> = self
            .departments
            .iter()
            .filter(|spec| spec.name != department)
            .flat_map(|spec| spec.positions.iter().cloned())
            .filter(|title| !self.is_compatible(department, title))
            .collect();
        titles.extend(
            NON_IT_TITLES
                .iter()
                .filter(|t| !self.is_compatible(department, t))
                .map(|t| (*t).to_string()),
        );
        titles
    }
}

/// Role keyword of a title: its last whitespace-separated word.
///
/// "Cybersecurity Analyst" -> "Analyst", "Chef" -> "Chef".
pub fn role_keyword(title: &str) -> &str {
    title.split_whitespace().next_back().unwrap_or(title)
}

#[cfg(test)]
mod tests {
    use super::{role_keyword, Catalog, DIRTY_SALARIES};

    #[test]
    fn every_listed_position_has_a_band() {
        let catalog = Catalog::default();
        for spec in catalog.departments() {
            for position in &spec.positions {
                assert!(
                    catalog.band_for(position).is_some(),
                    "missing band for {position}"
                );
            }
        }
    }

    #[test]
    fn dirty_salaries_fall_outside_every_band() {
        let catalog = Catalog::default();
        for spec in catalog.departments() {
            for position in &spec.positions {
                let band = catalog.band_for(position).unwrap();
                for dirty in DIRTY_SALARIES {
                    assert!(!band.contains(*dirty));
                }
            }
        }
    }

    #[test]
    fn keyword_is_last_word() {
        assert_eq!(role_keyword("Cybersecurity Analyst"), "Analyst");
        assert_eq!(role_keyword("Chef"), "Chef");
        assert_eq!(role_keyword(""), "");
    }

    #[test]
    fn security_has_single_analyst_title() {
        let catalog = Catalog::default();
        let hits = catalog.titles_with_keyword("Security", "Analyst");
        assert_eq!(hits, vec!["Cybersecurity Analyst"]);
    }

    #[test]
    fn incompatible_titles_exclude_own_department() {
        let catalog = Catalog::default();
        let titles = catalog.incompatible_titles_for("Security");
        assert!(!titles.iter().any(|t| t == "Cybersecurity Analyst"));
        assert!(titles.iter().any(|t| t == "Chef"));
        assert!(titles.iter().any(|t| t == "Data Analyst"));
    }
}
