//! Rule loading errors.

use super::error_code::{self, RedlineErrorCode};

/// Errors raised while building a RuleSet.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid rule definition: {0}")]
    InvalidRule(String),

    #[error("Pattern compilation failed for rule {rule_id}: {message}")]
    PatternCompilationFailed { rule_id: String, message: String },

    #[error("Duplicate rule id '{rule_id}'")]
    DuplicateRule { rule_id: String },

    #[error("Unknown rule pack '{name}'")]
    UnknownPack { name: String },

    #[error("Failed to read rule file {path}: {message}")]
    Unreadable { path: String, message: String },
}

impl RedlineErrorCode for RuleError {
    fn error_code(&self) -> &'static str {
        error_code::RULE_ERROR
    }
}
