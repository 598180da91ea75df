//! Approval gate errors. Any of these aborts the whole run with no mutation.

use super::error_code::{self, RedlineErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Approval prompt I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Partial approval is disabled by policy (scope: {scope})")]
    PartialApprovalDisallowed { scope: String },

    #[error("Decision scope names unknown {kind}: {ids}")]
    UnknownScope { kind: &'static str, ids: String },

    #[error("No valid decision after {attempts} attempts")]
    InvalidResponse { attempts: usize },
}

impl RedlineErrorCode for GateError {
    fn error_code(&self) -> &'static str {
        error_code::GATE_ERROR
    }
}
