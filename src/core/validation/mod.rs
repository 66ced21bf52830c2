//! Validation engine
//!
//! This module turns an object, its class metadata and a set of options into
//! an ordered tree of validation errors. Each stage is a separate module:
//! group filtering, property gating, constraint running, error shaping and
//! the recursive executor that ties them together.

pub mod aggregator;
pub mod executor;
pub mod gate;
pub mod groups;
pub mod report;
pub mod runner;
#[cfg(feature = "builtin-validators")]
pub mod validators;

pub use executor::{ObjectOutcome, ValidationExecutor};
pub use report::{
    NESTED_VALIDATION, UNKNOWN_VALUE, ValidationError, ValidationReport, WHITELIST_VALIDATION,
    format_errors,
};
pub use runner::ExecutionMode;
