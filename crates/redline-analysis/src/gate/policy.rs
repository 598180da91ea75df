//! Validation of a decision against the report and gate configuration.

use redline_core::config::GateConfig;
use redline_core::errors::GateError;

use super::decision::{Decision, Scope};
use crate::report::Report;
use crate::rules::RuleSet;

/// Gate policy derived from `[gate]` configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatePolicy {
    pub allow_partial: bool,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            allow_partial: true,
        }
    }
}

impl From<&GateConfig> for GatePolicy {
    fn from(config: &GateConfig) -> Self {
        Self {
            allow_partial: config.effective_allow_partial(),
        }
    }
}

impl GatePolicy {
    /// Reject decisions the run cannot honour. A rejection always passes.
    ///
    /// Rule scopes must name rules in `rules`; finding scopes must name
    /// findings in `report`.
    pub fn check(
        &self,
        decision: &Decision,
        report: &Report,
        rules: &RuleSet,
    ) -> Result<(), GateError> {
        if !decision.approved() {
            return Ok(());
        }
        if decision.is_partial() && !self.allow_partial {
            return Err(GateError::PartialApprovalDisallowed {
                scope: decision.scope().to_string(),
            });
        }

        match decision.scope() {
            Scope::All => Ok(()),
            Scope::Rules(ids) => {
                let unknown: Vec<&str> = ids
                    .iter()
                    .map(String::as_str)
                    .filter(|id| rules.position(id).is_none())
                    .collect();
                unknown_scope("rules", &unknown)
            }
            Scope::Findings(ids) => {
                let unknown: Vec<&str> = ids
                    .iter()
                    .filter(|id| !report.has_finding(id))
                    .map(|id| id.as_str())
                    .collect();
                unknown_scope("findings", &unknown)
            }
        }
    }
}

fn unknown_scope(kind: &'static str, unknown: &[&str]) -> Result<(), GateError> {
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(GateError::UnknownScope {
            kind,
            ids: unknown.join(", "),
        })
    }
}
