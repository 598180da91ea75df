//! Scanner errors.

use super::error_code::{self, RedlineErrorCode};
use crate::types::{Span, SpanFault};

/// Errors that abort the scan of a single document.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// A detector produced an out-of-bounds or malformed span. Fatal for the
    /// document's scan; other documents are unaffected.
    #[error("Rule {rule_id} produced invalid span {span} in {document} (text length {text_len}): {fault}")]
    InvalidSpan {
        document: String,
        rule_id: String,
        span: Span,
        text_len: usize,
        fault: SpanFault,
    },

    #[error("Scan cancelled")]
    Cancelled,
}

impl ScanError {
    pub fn document(&self) -> Option<&str> {
        match self {
            Self::InvalidSpan { document, .. } => Some(document),
            Self::Cancelled => None,
        }
    }
}

impl RedlineErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSpan { .. } => error_code::INVALID_SPAN,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
