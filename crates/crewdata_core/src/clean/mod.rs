//! Cleaning pipeline: blind detection, repair and flagging.
//!
//! # Responsibility
//! - Detect every corruption mode from the data alone (no injector labels).
//! - Repair what batch statistics and the catalog can repair; flag the rest.
//!
//! # Invariants
//! - The output always has the full input length; records are flagged,
//!   never dropped.
//! - Imputation statistics are computed once from the whole batch before
//!   any repair, so repair order cannot affect the result.
//! - Cleaning its own output is a fixed point: no value moves twice.

pub mod pipeline;
pub mod stats;

pub use pipeline::{clean_batch, CleanCounts, CleanReport};
pub use stats::BatchStats;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural cleaning failure. Per-record problems are flags, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanError {
    /// Nothing to clean; an empty batch aborts the whole pipeline.
    EmptyBatch,
}

impl Display for CleanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBatch => write!(f, "cleaning requires a non-empty record batch"),
        }
    }
}

impl Error for CleanError {}
