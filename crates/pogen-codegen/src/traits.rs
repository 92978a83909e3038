//! Trait definitions for reading previously generated sources.

use std::collections::{HashMap, HashSet};

/// What a previously generated file contributes to its regeneration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeContext {
    /// Local names introduced by the preserved imports
    pub imported_symbols: HashSet<String>,

    /// Import statements, verbatim, in source order
    pub imported_code: Vec<String>,

    /// Custom code trailing each class, keyed by class name, including the closing `}`
    pub keep_code: HashMap<String, String>,
}

/// Errors that can occur while analyzing a previously generated file.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("Failed to parse existing page object: {}", .0.join("; "))]
    Parse(Vec<String>),
}

/// Extracts the parts of an existing page object file that survive regeneration.
pub trait SourceAnalyzer: Send + Sync {
    /// Analyzer identifier (e.g., "typescript")
    fn name(&self) -> &'static str;

    /// Collect imports and custom class code from `source`.
    ///
    /// Fails when `source` cannot be parsed; callers must not overwrite a
    /// file they could not analyze.
    fn analyze(&self, source: &str) -> Result<MergeContext, MergeError>;
}
