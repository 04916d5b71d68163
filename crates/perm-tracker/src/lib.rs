//! Deadline and date-rule engine for PERM labor-certification cases.
//!
//! The `workflows::perm` module holds the pure calculators; `config`,
//! `telemetry`, and `error` carry the runtime plumbing shared with the API
//! service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
