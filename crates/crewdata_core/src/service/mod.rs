//! Pipeline orchestration.
//!
//! # Responsibility
//! - Drive the end-to-end batch flow: generate, corrupt, persist, read
//!   back, clean, enrich, aggregate, render.
//! - Keep callers decoupled from the individual stage APIs.

pub mod pipeline_service;
