//! Declarative TOML rule definitions, user-extensible without recompiling.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use redline_core::errors::RuleError;

use super::pattern::{LexiconRule, MatchTarget, PatternRule, RuleAction};
use super::types::{Detector, RuleSet};

/// Detector family of a TOML rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    #[default]
    Pattern,
    Lexicon,
}

/// Action keyword as written in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionDef {
    #[default]
    Delete,
    Replace,
    Flag,
}

/// A TOML-defined rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlRuleDef {
    pub id: String,
    pub description: String,
    pub rationale: String,
    #[serde(default)]
    pub kind: RuleKind,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub action: ActionDef,
    #[serde(default)]
    pub replacement: Option<String>,
    #[serde(default)]
    pub target: MatchTarget,
    #[serde(default)]
    pub preserve_case: bool,
    /// Lexicon entries: word or phrase → replacement.
    #[serde(default)]
    pub words: BTreeMap<String, String>,
    /// Document id globs the rule skips. Pattern rules only.
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// A rule file: optional set name plus an ordered list of rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlRuleFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rules: Vec<TomlRuleDef>,
}

/// Loader for TOML rule definitions.
pub struct RuleLoader;

impl RuleLoader {
    /// Load a RuleSet from a TOML string. `fallback_name` names the set when
    /// the file does not.
    pub fn load_from_str(toml_str: &str, fallback_name: &str) -> Result<RuleSet, RuleError> {
        let file: TomlRuleFile = toml::from_str(toml_str)
            .map_err(|e| RuleError::InvalidRule(format!("TOML parse error: {e}")))?;

        let name = file.name.unwrap_or_else(|| fallback_name.to_string());
        let mut set = RuleSet::new(name);
        for def in file.rules {
            if def.enabled == Some(false) {
                tracing::debug!(rule_id = %def.id, "rule disabled in definition file");
                continue;
            }
            set.push(Self::compile(def)?)?;
        }
        Ok(set)
    }

    /// Load a RuleSet from a file path. The file stem names the set by default.
    pub fn load_from_file(path: &Path) -> Result<RuleSet, RuleError> {
        let content = std::fs::read_to_string(path).map_err(|e| RuleError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::load_from_str(&content, &stem)
    }

    /// Compile a single rule definition into a detector.
    fn compile(def: TomlRuleDef) -> Result<Arc<dyn Detector>, RuleError> {
        if def.id.trim().is_empty() {
            return Err(RuleError::InvalidRule("rule id must not be empty".to_string()));
        }

        match def.kind {
            RuleKind::Pattern => {
                let pattern = def.pattern.as_deref().filter(|p| !p.is_empty()).ok_or_else(|| {
                    RuleError::InvalidRule(format!("pattern rule '{}' has no pattern", def.id))
                })?;
                let action = match def.action {
                    ActionDef::Delete => RuleAction::Delete,
                    ActionDef::Flag => RuleAction::Flag,
                    ActionDef::Replace => {
                        let replacement = def.replacement.clone().ok_or_else(|| {
                            RuleError::InvalidRule(format!(
                                "rule '{}' uses action = \"replace\" without a replacement",
                                def.id
                            ))
                        })?;
                        RuleAction::Replace(replacement)
                    }
                };
                let rule = PatternRule::new(def.id, def.description, def.rationale, pattern, action)?
                    .with_target(def.target)
                    .with_preserve_case(def.preserve_case)
                    .with_exclude(&def.exclude)?;
                Ok(Arc::new(rule))
            }
            RuleKind::Lexicon => {
                if !def.exclude.is_empty() {
                    return Err(RuleError::InvalidRule(format!(
                        "lexicon rule '{}' does not support exclude",
                        def.id
                    )));
                }
                let advisory = match def.action {
                    ActionDef::Replace => false,
                    ActionDef::Flag => true,
                    ActionDef::Delete => {
                        return Err(RuleError::InvalidRule(format!(
                            "lexicon rule '{}' must use action \"replace\" or \"flag\"",
                            def.id
                        )))
                    }
                };
                let rule =
                    LexiconRule::new(def.id, def.description, def.rationale, &def.words, advisory)?;
                Ok(Arc::new(rule))
            }
        }
    }
}
