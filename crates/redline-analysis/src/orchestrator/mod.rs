//! Orchestrator: sequences scan → report → gate → apply for one run.

pub mod outcome;
pub mod pipeline;

pub use outcome::{DocumentApplied, RunOutcome, RunPhase};
pub use pipeline::{Orchestrator, PreparedRun};
