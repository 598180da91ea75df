//! A gate that relays a decision made before the run started.

use redline_core::errors::GateError;

use super::decision::Decision;
use super::ApprovalGate;
use crate::report::Report;

/// Hands out its decision once. Later calls reject.
#[derive(Debug)]
pub struct PresetGate {
    decision: Option<Decision>,
}

impl PresetGate {
    pub fn new(decision: Decision) -> Self {
        Self {
            decision: Some(decision),
        }
    }
}

impl ApprovalGate for PresetGate {
    fn await_decision(&mut self, _report: &Report) -> Result<Decision, GateError> {
        match self.decision.take() {
            Some(decision) => Ok(decision),
            None => {
                tracing::warn!("preset decision already consumed; rejecting");
                Ok(Decision::reject())
            }
        }
    }
}
