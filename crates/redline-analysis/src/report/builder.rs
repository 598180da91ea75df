//! Builds a [`Report`] from scanner output.

use redline_core::errors::ReportError;
use redline_core::types::collections::FxHashMap;
use redline_core::{Document, Finding};

use super::types::{DocumentSummary, Report, ReportEntry};
use crate::mutation::{preview, resolve, Supersession};
use crate::scanner::hasher::{hash_content, hash_hex};

/// Groups findings against a known corpus.
pub struct ReportBuilder<'c> {
    corpus: &'c [Document],
    index: FxHashMap<&'c str, usize>,
}

impl<'c> ReportBuilder<'c> {
    pub fn new(corpus: &'c [Document]) -> Self {
        let index = corpus
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id(), i))
            .collect();
        Self { corpus, index }
    }

    /// Group, sort and annotate `findings`.
    ///
    /// A finding whose document is not in the corpus fails the whole build.
    pub fn build(&self, findings: Vec<Finding>) -> Result<Report, ReportError> {
        let mut grouped: Vec<Vec<Finding>> = vec![Vec::new(); self.corpus.len()];
        for finding in findings {
            let Some(&slot) = self.index.get(finding.document.as_str()) else {
                return Err(ReportError::OrphanFinding {
                    document: finding.document,
                    rule_id: finding.rule_id,
                    finding: finding.id,
                });
            };
            grouped[slot].push(finding);
        }

        let mut report = Report::default();
        for (document, mut findings) in self.corpus.iter().zip(grouped) {
            findings.sort_by(|a, b| {
                a.span
                    .start
                    .cmp(&b.span.start)
                    .then(a.span.end.cmp(&b.span.end))
                    .then(a.rule_index.cmp(&b.rule_index))
            });
            let superseded: FxHashMap<_, Supersession> = resolve(&findings)
                .superseded
                .into_iter()
                .map(|s| (s.loser.clone(), s))
                .collect();
            let summary = summarize(document, &findings, superseded.len())?;

            tracing::debug!(
                document = document.id(),
                findings = findings.len(),
                superseded = superseded.len(),
                "document grouped"
            );

            report.documents.push(summary);
            report.entries.extend(findings.into_iter().map(|finding| ReportEntry {
                superseded: superseded.get(&finding.id).cloned(),
                finding,
            }));
        }
        Ok(report)
    }
}

/// Shorthand for `ReportBuilder::new(corpus).build(findings)`.
pub fn build_report(corpus: &[Document], findings: Vec<Finding>) -> Result<Report, ReportError> {
    ReportBuilder::new(corpus).build(findings)
}

fn summarize(
    document: &Document,
    findings: &[Finding],
    superseded: usize,
) -> Result<DocumentSummary, ReportError> {
    let source_hash = hash_hex(hash_content(document.text().as_bytes()));
    let refs: Vec<&Finding> = findings.iter().collect();
    let proposed_hash = if findings.iter().any(Finding::is_fixable) {
        let text = preview(document, &refs).map_err(|e| ReportError::Preview {
            document: document.id().to_string(),
            message: e.to_string(),
        })?;
        hash_hex(hash_content(text.as_bytes()))
    } else {
        source_hash.clone()
    };

    let mut rules: Vec<(usize, String)> = findings
        .iter()
        .map(|f| (f.rule_index, f.rule_id.clone()))
        .collect();
    rules.sort();
    rules.dedup();

    let fixable = findings.iter().filter(|f| f.is_fixable()).count();
    Ok(DocumentSummary {
        document: document.id().to_string(),
        findings: findings.len(),
        fixable,
        advisory: findings.len() - fixable,
        superseded,
        rules: rules.into_iter().map(|(_, id)| id).collect(),
        source_hash,
        proposed_hash,
    })
}
