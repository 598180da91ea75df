//! redline-analysis: the detect → report → approve → apply pipeline.
//!
//! Data flow: corpus → [`scanner`] (with a [`rules::RuleSet`]) → findings →
//! [`report`] → [`gate`] → [`mutation`] → corpus′, sequenced by
//! [`orchestrator::Orchestrator`].

pub mod corpus;
pub mod gate;
pub mod mutation;
pub mod orchestrator;
pub mod report;
pub mod rules;
pub mod scanner;

pub use gate::{ApprovalGate, Decision, Scope};
pub use orchestrator::{Orchestrator, PreparedRun, RunOutcome};
pub use report::Report;
pub use rules::{Detector, RuleSet};
pub use scanner::Scanner;
