//! Rule sets: ordered, pluggable detectors that map document text to flagged
//! spans with a rationale.

pub mod builtin;
pub mod config;
pub mod loader;
pub mod pattern;
pub mod types;

pub use builtin::{available_packs, load_pack, load_packs};
pub use config::load_rule_set;
pub use loader::RuleLoader;
pub use pattern::{LexiconRule, MatchTarget, PatternRule, RuleAction};
pub use types::{Detector, FnDetector, RuleMatch, RuleSet};
