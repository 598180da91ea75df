//! Regex-backed detectors: single patterns and word-replacement lexicons.

use std::collections::BTreeMap;

use glob::{MatchOptions, Pattern};
use regex::Regex;
use serde::{Deserialize, Serialize};

use redline_core::errors::RuleError;
use redline_core::types::collections::FxHashMap;
use redline_core::{Document, Span};

use super::types::{Detector, RuleMatch};

const EXCLUDE_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// What a pattern rule proposes for each match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    Delete,
    /// Replacement template; `$1`, `${name}` expand capture groups.
    Replace(String),
    /// Report only.
    Flag,
}

/// Which text a match flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTarget {
    /// Exactly the regex match.
    #[default]
    Match,
    /// Every line the match touches, including the final line terminator.
    Line,
}

/// A regex detector.
#[derive(Debug, Clone)]
pub struct PatternRule {
    id: String,
    description: String,
    rationale: String,
    regex: Regex,
    action: RuleAction,
    target: MatchTarget,
    preserve_case: bool,
    /// Document id globs this rule never fires on.
    exclude: Vec<Pattern>,
}

impl PatternRule {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        rationale: impl Into<String>,
        pattern: &str,
        action: RuleAction,
    ) -> Result<Self, RuleError> {
        let id = id.into();
        let regex = Regex::new(pattern).map_err(|e| RuleError::PatternCompilationFailed {
            rule_id: id.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            id,
            description: description.into(),
            rationale: single_line(rationale.into()),
            regex,
            action,
            target: MatchTarget::Match,
            preserve_case: false,
            exclude: Vec::new(),
        })
    }

    pub fn with_target(mut self, target: MatchTarget) -> Self {
        self.target = target;
        self
    }

    /// Carry the matched text's capitalisation over to the replacement.
    pub fn with_preserve_case(mut self, preserve_case: bool) -> Self {
        self.preserve_case = preserve_case;
        self
    }

    /// Skip documents whose id matches any of `globs`.
    pub fn with_exclude<S: AsRef<str>>(mut self, globs: &[S]) -> Result<Self, RuleError> {
        for glob in globs {
            let pattern = Pattern::new(glob.as_ref()).map_err(|e| {
                RuleError::InvalidRule(format!(
                    "rule '{}' has an invalid exclude glob {:?}: {e}",
                    self.id,
                    glob.as_ref()
                ))
            })?;
            self.exclude.push(pattern);
        }
        Ok(self)
    }

    fn excludes(&self, document: &Document) -> bool {
        self.exclude
            .iter()
            .any(|p| p.matches_with(document.id(), EXCLUDE_OPTIONS))
    }

    pub fn action(&self) -> &RuleAction {
        &self.action
    }

    pub fn target(&self) -> MatchTarget {
        self.target
    }
}

impl Detector for PatternRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn rationale(&self) -> &str {
        &self.rationale
    }

    fn advisory(&self) -> bool {
        self.action == RuleAction::Flag
    }

    fn detect(&self, document: &Document) -> Vec<RuleMatch> {
        if self.excludes(document) {
            return Vec::new();
        }
        let text = document.text();
        let mut out = Vec::new();
        let mut last: Option<Span> = None;

        for caps in self.regex.captures_iter(text) {
            let Some(m) = caps.get(0) else { continue };
            if m.start() == m.end() {
                continue;
            }
            let span = match self.target {
                MatchTarget::Match => Span::new(m.start(), m.end()),
                MatchTarget::Line => line_span(text, m.start(), m.end()),
            };
            // Line widening can make consecutive matches claim the same line.
            if last.is_some_and(|prev| prev.overlaps(&span)) {
                continue;
            }
            last = Some(span);

            let rule_match = match &self.action {
                RuleAction::Delete | RuleAction::Flag => RuleMatch::delete(span),
                RuleAction::Replace(template) => {
                    let mut expanded = String::new();
                    caps.expand(template, &mut expanded);
                    if self.preserve_case {
                        expanded = match_case(m.as_str(), expanded);
                    }
                    RuleMatch::replace(span, expanded)
                }
            };
            out.push(rule_match);
        }
        out
    }
}

/// A table of words or phrases, each with its plain replacement, compiled to
/// one case-insensitive whole-word regex.
#[derive(Debug, Clone)]
pub struct LexiconRule {
    id: String,
    description: String,
    rationale: String,
    regex: Regex,
    table: FxHashMap<String, String>,
    advisory: bool,
}

impl LexiconRule {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        rationale: impl Into<String>,
        words: &BTreeMap<String, String>,
        advisory: bool,
    ) -> Result<Self, RuleError> {
        let id = id.into();
        if words.is_empty() {
            return Err(RuleError::InvalidRule(format!(
                "lexicon rule '{id}' has no words"
            )));
        }

        let mut table = FxHashMap::default();
        for (word, replacement) in words {
            let starts = word.chars().next().is_some_and(char::is_alphanumeric);
            let ends = word.chars().last().is_some_and(char::is_alphanumeric);
            if !starts || !ends {
                return Err(RuleError::InvalidRule(format!(
                    "lexicon entry '{word}' in rule '{id}' must start and end with a letter or digit"
                )));
            }
            table.insert(word.to_lowercase(), replacement.clone());
        }

        // Longest first so multi-word phrases beat their prefixes.
        let mut keys: Vec<&String> = table.keys().collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = keys
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"(?i)\b(?:{alternation})\b");
        let regex = Regex::new(&pattern).map_err(|e| RuleError::PatternCompilationFailed {
            rule_id: id.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            id,
            description: description.into(),
            rationale: single_line(rationale.into()),
            regex,
            table,
            advisory,
        })
    }

    pub fn word_count(&self) -> usize {
        self.table.len()
    }
}

impl Detector for LexiconRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn rationale(&self) -> &str {
        &self.rationale
    }

    fn advisory(&self) -> bool {
        self.advisory
    }

    fn detect(&self, document: &Document) -> Vec<RuleMatch> {
        self.regex
            .find_iter(document.text())
            .filter_map(|m| {
                let replacement = self.table.get(&m.as_str().to_lowercase())?;
                let span = Span::new(m.start(), m.end());
                let note = if self.advisory {
                    format!("'{}'", m.as_str())
                } else {
                    format!("'{}' -> '{}'", m.as_str(), replacement)
                };
                let rule_match = if self.advisory {
                    RuleMatch::delete(span)
                } else {
                    RuleMatch::replace(span, match_case(m.as_str(), replacement.clone()))
                };
                Some(rule_match.with_note(note))
            })
            .collect()
    }
}

/// Widen `[start, end)` to whole lines, including the terminator of the last
/// line when there is one.
fn line_span(text: &str, start: usize, end: usize) -> Span {
    let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = if text.as_bytes()[end - 1] == b'\n' {
        end
    } else {
        match text[end..].find('\n') {
            Some(i) => end + i + 1,
            None => text.len(),
        }
    };
    Span::new(line_start, line_end)
}

/// Apply the capitalisation of `matched` to `replacement`: all-caps stays
/// all-caps, a leading capital stays a leading capital.
fn match_case(matched: &str, replacement: String) -> String {
    let letters: Vec<char> = matched.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return replacement.to_uppercase();
    }
    let starts_upper = matched.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return replacement;
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => replacement,
    }
}

fn single_line(s: String) -> String {
    if s.contains(['\n', '\r']) {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        s
    }
}
