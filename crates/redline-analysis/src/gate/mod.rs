//! ApprovalGate: the single mandatory checkpoint between report and mutation.
//!
//! Nothing in this module approves on its own. A gate either relays a decision
//! made elsewhere (a CLI flag, an API call) or asks a human.

pub mod decision;
pub mod interactive;
pub mod policy;
pub mod preset;

pub use decision::{Decision, Scope};
pub use interactive::InteractiveGate;
pub use policy::GatePolicy;
pub use preset::PresetGate;

use redline_core::errors::GateError;

use crate::report::Report;

/// Blocks until an external decision about `report` is available.
pub trait ApprovalGate {
    fn await_decision(&mut self, report: &Report) -> Result<Decision, GateError>;
}

impl<F> ApprovalGate for F
where
    F: FnMut(&Report) -> Result<Decision, GateError>,
{
    fn await_decision(&mut self, report: &Report) -> Result<Decision, GateError> {
        self(report)
    }
}
