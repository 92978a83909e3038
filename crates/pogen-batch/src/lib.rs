//! Batch page object generation.
//!
//! Discovers component templates below a source directory and writes one
//! page object module per template, merging with modules from earlier runs.

pub mod builder;

pub use builder::{BatchConfig, BatchError, BatchResult, BatchRunner, Outcome, TemplateReport};
