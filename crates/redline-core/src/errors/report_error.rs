//! Reporter errors. Any of these aborts the whole run.

use super::error_code::{self, RedlineErrorCode};
use crate::types::FindingId;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A finding references a document that is not in the known corpus.
    #[error("Finding {finding} from rule {rule_id} references unknown document {document}")]
    OrphanFinding {
        document: String,
        rule_id: String,
        finding: FindingId,
    },

    #[error("Report rendering failed ({format}): {message}")]
    Render { format: String, message: String },

    /// Previewing the end state of a document failed.
    #[error("Cannot compute proposed end state of {document}: {message}")]
    Preview { document: String, message: String },

    #[error("Malformed report line: {line:?}")]
    MalformedLine { line: String },
}

impl RedlineErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::OrphanFinding { .. } => error_code::ORPHAN_FINDING,
            Self::Render { .. } | Self::Preview { .. } | Self::MalformedLine { .. } => {
                error_code::REPORT_ERROR
            }
        }
    }
}
