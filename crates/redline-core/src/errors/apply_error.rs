//! Mutation errors. Fatal for one document's rewrite; its original text is kept.

use super::error_code::{self, RedlineErrorCode};
use crate::types::FindingId;

#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    /// The resolved plan and the document text diverged at apply time.
    #[error("{}", describe_inconsistency(.document, .rule_id.as_deref(), .finding.as_ref(), .cause))]
    Inconsistent {
        document: String,
        rule_id: Option<String>,
        finding: Option<FindingId>,
        cause: String,
    },

    #[error("Mutation of {document} attempted out of order: {state} → {attempted}")]
    InvalidTransition {
        document: String,
        state: &'static str,
        attempted: &'static str,
    },
}

fn describe_inconsistency(
    document: &str,
    rule_id: Option<&str>,
    finding: Option<&FindingId>,
    cause: &str,
) -> String {
    let mut msg = format!("Apply plan inconsistent with {document}");
    if let Some(rule) = rule_id {
        msg.push_str(&format!(" [{rule}]"));
    }
    if let Some(id) = finding {
        msg.push_str(&format!(" (finding {id})"));
    }
    msg.push_str(": ");
    msg.push_str(cause);
    msg
}

impl ApplyError {
    pub fn document(&self) -> &str {
        match self {
            Self::Inconsistent { document, .. } | Self::InvalidTransition { document, .. } => {
                document
            }
        }
    }
}

impl RedlineErrorCode for ApplyError {
    fn error_code(&self) -> &'static str {
        error_code::APPLY_CONSISTENCY
    }
}
