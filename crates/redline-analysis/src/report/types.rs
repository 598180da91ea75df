//! Report data model.

use serde::Serialize;

use redline_core::types::collections::FxHashSet;
use redline_core::{Finding, FindingId};

use super::line::ReportLine;
use crate::mutation::Supersession;

/// One finding as it appears in a report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub finding: Finding,
    /// Set when the finding loses an overlap conflict under full approval.
    pub superseded: Option<Supersession>,
}

impl ReportEntry {
    /// The stable contract line for this finding.
    pub fn line(&self) -> ReportLine {
        ReportLine::from_finding(&self.finding)
    }
}

/// Per-document totals and hashes.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub document: String,
    pub findings: usize,
    pub fixable: usize,
    pub advisory: usize,
    pub superseded: usize,
    /// Rule ids in RuleSet order.
    pub rules: Vec<String>,
    /// xxh3 of the scanned text, 16 hex digits.
    pub source_hash: String,
    /// xxh3 of the text after applying every fixable finding. Equal to
    /// `source_hash` when nothing would change.
    pub proposed_hash: String,
}

impl DocumentSummary {
    pub fn would_change(&self) -> bool {
        self.source_hash != self.proposed_hash
    }
}

/// The output of one scan, read-only once built.
///
/// Entries are grouped by document in corpus order and sorted by span start
/// within each document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
    pub documents: Vec<DocumentSummary>,
}

impl Report {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.entries.iter().map(|e| &e.finding)
    }

    pub fn finding(&self, id: &FindingId) -> Option<&Finding> {
        self.findings().find(|f| &f.id == id)
    }

    pub fn has_finding(&self, id: &FindingId) -> bool {
        self.finding(id).is_some()
    }

    /// Distinct rule ids that produced findings, in first-seen order.
    pub fn rule_ids(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        self.findings()
            .map(|f| f.rule_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn has_rule(&self, rule_id: &str) -> bool {
        self.findings().any(|f| f.rule_id == rule_id)
    }

    pub fn fixable_count(&self) -> usize {
        self.findings().filter(|f| f.is_fixable()).count()
    }

    pub fn advisory_count(&self) -> usize {
        self.findings().filter(|f| f.advisory).count()
    }

    pub fn superseded_count(&self) -> usize {
        self.entries.iter().filter(|e| e.superseded.is_some()).count()
    }

    pub fn summary(&self, document: &str) -> Option<&DocumentSummary> {
        self.documents.iter().find(|d| d.document == document)
    }

    /// Entries belonging to `document`.
    pub fn entries_for<'a>(&'a self, document: &'a str) -> impl Iterator<Item = &'a ReportEntry> {
        self.entries
            .iter()
            .filter(move |e| e.finding.document == document)
    }

    /// One contract line per finding, in report order.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.line().to_string()).collect()
    }
}
