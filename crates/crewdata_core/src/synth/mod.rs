//! Synthetic data production: generation and deliberate corruption.
//!
//! # Responsibility
//! - Produce well-formed employee records from a seeded RNG.
//! - Corrupt a chosen fraction of them under a known noise model.
//!
//! # Invariants
//! - Both stages are deterministic for a given RNG state.
//! - Ground-truth corruption labels never flow into the cleaning pipeline;
//!   they exist only for test verification.

pub mod generator;
pub mod inject;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error for synthetic-data entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    /// Caller-supplied parameter is outside the accepted domain.
    InvalidArgument(String),
}

impl Display for SynthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
        }
    }
}

impl Error for SynthError {}
