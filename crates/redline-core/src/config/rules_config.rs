//! Rule set selection.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RulesConfig {
    /// Built-in packs to load, in precedence order.
    /// Default: `["transient-comments"]`.
    #[serde(default)]
    pub packs: Vec<String>,
    /// Additional TOML rule files, loaded after the packs.
    #[serde(default)]
    pub files: Vec<String>,
    /// Rule ids dropped after loading.
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl RulesConfig {
    pub fn effective_packs(&self) -> Vec<String> {
        if self.packs.is_empty() && self.files.is_empty() {
            vec!["transient-comments".to_string()]
        } else {
            self.packs.clone()
        }
    }
}
