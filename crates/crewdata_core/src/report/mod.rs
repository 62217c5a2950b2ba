//! Feature derivation, grouped aggregates and chart artifacts.
//!
//! # Responsibility
//! - Enrich non-flagged cleaned records with derived analysis columns.
//! - Compute the two average-salary group-bys.
//! - Render both aggregate tables as SVG artifacts.
//!
//! # Invariants
//! - Everything here is a pure function of its input; no hidden state.
//! - Flagged records never contribute to any aggregate.

pub mod aggregate;
pub mod chart;
pub mod features;

pub use aggregate::{
    avg_salary_by_department_position, avg_salary_by_position_year, DepartmentPositionTable,
    PositionYearTable, SalaryCell,
};
pub use chart::{grouped_bar_svg, heatmap_svg};
pub use features::{enrich, AnalysisRecord};
