//! Pipeline errors and non-fatal error collection.

use super::error_code::{self, RedlineErrorCode};
use super::{ApplyError, ConfigError, CorpusError, GateError, ReportError, RuleError, ScanError};

/// Errors that can occur during a pipeline run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Gate error: {0}")]
    Gate(#[from] GateError),

    #[error("Apply error: {0}")]
    Apply(#[from] ApplyError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pipeline cancelled")]
    Cancelled,
}

impl RedlineErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Corpus(e) => e.error_code(),
            Self::Rule(e) => e.error_code(),
            Self::Scan(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
            Self::Gate(e) => e.error_code(),
            Self::Apply(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}

/// Result of a pipeline run that accumulates non-fatal errors.
/// Errors scoped to one document land here instead of aborting the run.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the pipeline run.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Add a non-fatal error to the result.
    pub fn add_error(&mut self, error: impl Into<PipelineError>) {
        self.errors.push(error.into());
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
