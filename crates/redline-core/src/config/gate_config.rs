//! Approval gate policy.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Accept decisions scoped to a subset of findings. Default: true.
    pub allow_partial: Option<bool>,
    /// Skip the gate when a scan leaves nothing to apply (no findings, or
    /// only advisory ones). Default: true.
    pub skip_when_empty: Option<bool>,
}

impl GateConfig {
    pub fn effective_allow_partial(&self) -> bool {
        self.allow_partial.unwrap_or(true)
    }

    pub fn effective_skip_when_empty(&self) -> bool {
        self.skip_when_empty.unwrap_or(true)
    }
}
