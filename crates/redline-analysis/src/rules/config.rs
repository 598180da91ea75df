//! Builds the run's RuleSet from `[rules]` configuration.

use std::path::Path;

use redline_core::config::RulesConfig;
use redline_core::errors::RuleError;

use super::builtin::load_packs;
use super::loader::RuleLoader;
use super::types::RuleSet;

/// Packs first (in listed order), then rule files, then drop disabled ids.
/// Relative rule file paths resolve against `root`.
pub fn load_rule_set(config: &RulesConfig, root: &Path) -> Result<RuleSet, RuleError> {
    let mut set = load_packs(&config.effective_packs())?;

    for file in &config.files {
        let path = root.join(file);
        tracing::debug!(path = %path.display(), "loading rule file");
        set.extend(RuleLoader::load_from_file(&path)?)?;
    }

    if !config.disabled.is_empty() {
        let unknown = set.disable(config.disabled.iter().map(String::as_str));
        for rule_id in unknown {
            tracing::warn!(rule_id = %rule_id, "disabled rule id matches no loaded rule");
        }
    }

    tracing::info!(rule_set = set.name(), rules = set.len(), "rules loaded");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads_transient_comments() {
        let set = load_rule_set(&RulesConfig::default(), Path::new(".")).unwrap();
        assert_eq!(set.name(), "transient-comments");
    }

    #[test]
    fn rule_files_append_after_packs_and_disabled_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("team.toml"),
            r#"
[[rules]]
id = "team-todo"
description = "Stray TODO markers"
rationale = "Track work in the issue tracker"
pattern = "TODO"
action = "flag"
"#,
        )
        .unwrap();

        let config = RulesConfig {
            packs: vec!["transient-comments".to_string()],
            files: vec!["team.toml".to_string()],
            disabled: vec!["transient-trailing".to_string()],
        };
        let set = load_rule_set(&config, dir.path()).unwrap();
        assert_eq!(set.ids().last(), Some(&"team-todo"));
        assert!(set.position("transient-trailing").is_none());
        assert_eq!(set.name(), "transient-comments+team");
    }
}
