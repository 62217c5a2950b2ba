//! Persistence gateway abstractions and SQLite implementation.
//!
//! # Responsibility
//! - Define the bulk-write/read-back contract used by the pipeline.
//! - Isolate SQL details from the synthesis and cleaning layers.
//!
//! # Invariants
//! - Bulk insert is atomic: all records land or none do.
//! - Read paths reject undecodable persisted state instead of masking it;
//!   deliberately dirty (but well-typed) values pass through untouched.

pub mod employee_repo;
