//! Findings: one flagged span plus the rule that flagged it and why.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::span::Span;

/// Stable identifier of a finding (16 lowercase hex digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FindingId(String);

impl FindingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build an id from a 64-bit digest.
    pub fn from_digest(digest: u64) -> Self {
        Self(format!("{digest:016x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FindingId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Inclusive 1-based line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

/// A span flagged by one rule in one document.
///
/// `suggested_replacement == None` means "delete the span". Findings from
/// advisory rules are reported but never applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: FindingId,
    pub document: String,
    pub span: Span,
    pub lines: LineRange,
    pub rule_id: String,
    /// Position of the rule in its RuleSet; lower wins overlap conflicts.
    pub rule_index: usize,
    pub rationale: String,
    pub suggested_replacement: Option<String>,
    pub advisory: bool,
    /// The flagged text, as it was at scan time.
    pub matched: String,
    /// xxh3 hash of the document text the span indexes into.
    pub source_hash: u64,
}

impl Finding {
    pub fn is_deletion(&self) -> bool {
        self.suggested_replacement.is_none()
    }

    /// Whether the mutator may ever act on this finding.
    pub fn is_fixable(&self) -> bool {
        !self.advisory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_ids_are_fixed_width() {
        assert_eq!(FindingId::from_digest(0xab).as_str(), "00000000000000ab");
        assert_eq!(FindingId::from_digest(u64::MAX).as_str().len(), 16);
    }
}
