//! Per-document scanning and parallel corpus fan-out.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use redline_core::errors::ScanError;
use redline_core::events::{DocumentScannedEvent, EventDispatcher, ScanErrorEvent, ScanStartedEvent};
use redline_core::traits::{Cancellable, CancellationToken};
use redline_core::types::collections::FxHashSet;
use redline_core::{Document, Finding, Span};

use super::hasher::{finding_id, hash_content};
use crate::rules::{Detector, RuleSet};

/// Outcome of scanning one document of a corpus.
#[derive(Debug)]
pub struct DocumentScan {
    pub document: String,
    pub result: Result<Vec<Finding>, ScanError>,
}

/// Applies a shared, read-only RuleSet to documents.
#[derive(Debug, Clone)]
pub struct Scanner {
    rules: Arc<RuleSet>,
    threads: Option<usize>,
}

impl Scanner {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self {
            rules,
            threads: None,
        }
    }

    /// Cap the worker threads used by [`Scanner::scan_corpus`].
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads.filter(|&n| n > 0);
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Scan one document. See [`scan`].
    pub fn scan(&self, document: &Document) -> Result<Vec<Finding>, ScanError> {
        scan(document, &self.rules)
    }

    /// Scan every document, fanning out across worker threads.
    ///
    /// A failure in one document never affects the others. Documents not yet
    /// started when `cancel` fires report `ScanError::Cancelled`.
    pub fn scan_corpus(
        &self,
        documents: &[Document],
        events: &EventDispatcher,
        cancel: &CancellationToken,
    ) -> Vec<DocumentScan> {
        let _span = tracing::info_span!("redline.scan", documents = documents.len()).entered();
        let start = Instant::now();

        events.emit_scan_started(&ScanStartedEvent {
            documents: documents.len(),
            rules: self.rules.len(),
        });

        let work = || {
            documents
                .par_iter()
                .map(|document| self.scan_one(document, events, cancel))
                .collect::<Vec<_>>()
        };

        let results = match self.threads {
            Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(work),
                Err(e) => {
                    tracing::warn!(error = %e, threads = n, "falling back to the global thread pool");
                    work()
                }
            },
            None => work(),
        };

        let findings: usize = results
            .iter()
            .filter_map(|r| r.result.as_ref().ok())
            .map(Vec::len)
            .sum();
        tracing::info!(
            documents_scanned = documents.len(),
            findings,
            scan_duration_ms = start.elapsed().as_millis() as u64,
            "scan complete"
        );
        results
    }

    fn scan_one(
        &self,
        document: &Document,
        events: &EventDispatcher,
        cancel: &CancellationToken,
    ) -> DocumentScan {
        if cancel.is_cancelled() {
            return DocumentScan {
                document: document.id().to_string(),
                result: Err(ScanError::Cancelled),
            };
        }

        let result = scan(document, &self.rules);
        match &result {
            Ok(findings) => {
                tracing::debug!(document = document.id(), findings = findings.len(), "document scanned");
                events.emit_document_scanned(&DocumentScannedEvent {
                    document: document.id().to_string(),
                    findings: findings.len(),
                });
            }
            Err(e) => {
                tracing::warn!(document = document.id(), error = %e, "document scan aborted");
                let rule_id = match e {
                    ScanError::InvalidSpan { rule_id, .. } => Some(rule_id.clone()),
                    ScanError::Cancelled => None,
                };
                events.emit_scan_error(&ScanErrorEvent {
                    document: document.id().to_string(),
                    rule_id,
                    message: e.to_string(),
                });
            }
        }
        DocumentScan {
            document: document.id().to_string(),
            result,
        }
    }
}

/// Apply `rules` to `document`.
///
/// Every span a detector returns becomes a finding carrying the detector's id
/// and rationale. Findings from different detectors may overlap or coincide;
/// they are kept so the report can explain every reason a span was flagged.
/// The first out-of-bounds or malformed span aborts the document's scan.
pub fn scan(document: &Document, rules: &RuleSet) -> Result<Vec<Finding>, ScanError> {
    if document.is_empty() {
        return Ok(Vec::new());
    }

    let text = document.text();
    let source_hash = hash_content(text.as_bytes());
    let mut findings = Vec::new();

    for (rule_index, detector) in rules.iter().enumerate() {
        let mut seen: FxHashSet<Span> = FxHashSet::default();
        for rule_match in detector.detect(document) {
            let span = rule_match.span;
            span.check(text).map_err(|fault| ScanError::InvalidSpan {
                document: document.id().to_string(),
                rule_id: detector.id().to_string(),
                span,
                text_len: text.len(),
                fault,
            })?;
            if !seen.insert(span) {
                tracing::debug!(
                    document = document.id(),
                    rule_id = detector.id(),
                    %span,
                    "detector repeated a span"
                );
                continue;
            }

            findings.push(Finding {
                id: finding_id(document.id(), detector.id(), span),
                document: document.id().to_string(),
                span,
                lines: document.line_range(span),
                rule_id: detector.id().to_string(),
                rule_index,
                rationale: rationale_for(detector, rule_match.note.as_deref()),
                suggested_replacement: if detector.advisory() {
                    None
                } else {
                    rule_match.replacement
                },
                advisory: detector.advisory(),
                matched: text[span.range()].to_string(),
                source_hash,
            });
        }
    }

    Ok(findings)
}

fn rationale_for(detector: &dyn Detector, note: Option<&str>) -> String {
    match note {
        Some(note) => format!("{} ({note})", detector.rationale()),
        None => detector.rationale().to_string(),
    }
}
