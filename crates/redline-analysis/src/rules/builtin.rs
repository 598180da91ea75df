//! Built-in rule packs, embedded at compile time.

use redline_core::errors::RuleError;

use super::loader::RuleLoader;
use super::types::RuleSet;

const TRANSIENT_COMMENTS: &str = include_str!("packs/transient_comments.toml");
const AI_WRITING: &str = include_str!("packs/ai_writing.toml");
const AMBIGUITY: &str = include_str!("packs/ambiguity.toml");

/// Pack name → TOML source.
const PACKS: &[(&str, &str)] = &[
    ("transient-comments", TRANSIENT_COMMENTS),
    ("ai-writing", AI_WRITING),
    ("ambiguity", AMBIGUITY),
];

/// Names of all built-in packs.
pub fn available_packs() -> Vec<&'static str> {
    PACKS.iter().map(|(name, _)| *name).collect()
}

/// Load one built-in pack by name.
pub fn load_pack(name: &str) -> Result<RuleSet, RuleError> {
    let (_, source) = PACKS
        .iter()
        .find(|(pack, _)| *pack == name)
        .ok_or_else(|| RuleError::UnknownPack {
            name: name.to_string(),
        })?;
    RuleLoader::load_from_str(source, name)
}

/// Load several packs into one RuleSet; earlier packs take precedence in
/// overlap conflicts.
pub fn load_packs<S: AsRef<str>>(names: &[S]) -> Result<RuleSet, RuleError> {
    let mut set = RuleSet::new("");
    for name in names {
        set.extend(load_pack(name.as_ref())?)?;
    }
    Ok(set)
}
