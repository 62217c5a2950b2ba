//! Employee domain model and static catalog.
//!
//! # Responsibility
//! - Define canonical record shapes used by core business logic.
//! - Keep one raw shape for persistence and cleaning, and one clean shape
//!   for generation and analysis.
//!
//! # Invariants
//! - Every domain object is identified by a stable `EmployeeId`.
//! - Unrepairable data is represented by flags, never by dropped rows.

pub mod catalog;
pub mod employee;
