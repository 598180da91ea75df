//! The four-phase run.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use redline_core::config::RedlineConfig;
use redline_core::errors::{ApplyError, CorpusError, PipelineError, PipelineResult, ScanError};
use redline_core::events::{
    ApplyErrorEvent, DocumentAppliedEvent, EventDispatcher, GateDecidedEvent, GateSkippedEvent,
    ReportBuiltEvent, RunCompleteEvent,
};
use redline_core::traits::CancellationToken;
use redline_core::types::collections::FxHashSet;
use redline_core::{Document, Finding};

use super::outcome::{DocumentApplied, RunOutcome, RunPhase};
use crate::corpus::{CorpusProvider, CorpusSink};
use crate::gate::{ApprovalGate, Decision, GatePolicy};
use crate::mutation::apply;
use crate::report::{build_report, Report};
use crate::rules::{load_rule_set, RuleSet};
use crate::scanner::Scanner;

/// Drives one run at a time over a shared, read-only RuleSet.
///
/// Holds no per-run state: documents, report and decision live in a
/// [`PreparedRun`] and die with it.
pub struct Orchestrator {
    rules: Arc<RuleSet>,
    config: RedlineConfig,
    events: EventDispatcher,
    cancel: CancellationToken,
}

impl Orchestrator {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self {
            rules,
            config: RedlineConfig::default(),
            events: EventDispatcher::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Load the rules named by `config` (rule files relative to `root`).
    pub fn from_config(config: RedlineConfig, root: &Path) -> Result<Self, PipelineError> {
        let rules = load_rule_set(&config.rules, root)?;
        Ok(Self::new(Arc::new(rules)).with_config(config))
    }

    pub fn with_config(mut self, config: RedlineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn config(&self) -> &RedlineConfig {
        &self.config
    }

    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    /// A clone of the run's cancellation token.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn check_cancelled(&self) -> Result<(), PipelineError> {
        self.cancel
            .check()
            .inspect_err(|_| tracing::info!("run cancelled before commit; corpus untouched"))
    }

    /// Scan and report. Nothing is mutated.
    ///
    /// Per-document scan failures are collected in the prepared run; those
    /// documents contribute no findings and are never rewritten. Report
    /// failures abort.
    pub fn prepare(&self, documents: Vec<Document>) -> Result<PreparedRun<'_>, PipelineError> {
        let started = Instant::now();
        self.check_cancelled()?;

        let mut ids = FxHashSet::default();
        for document in &documents {
            if !ids.insert(document.id()) {
                return Err(CorpusError::DuplicateDocument {
                    document: document.id().to_string(),
                }
                .into());
            }
        }

        let scanner = Scanner::new(Arc::clone(&self.rules)).with_threads(self.config.scan.threads);
        let scans = scanner.scan_corpus(&documents, &self.events, &self.cancel);
        self.check_cancelled()?;

        let mut errors = Vec::new();
        let mut failed = FxHashSet::default();
        let mut findings: Vec<Finding> = Vec::new();
        for scan in scans {
            match scan.result {
                Ok(found) => findings.extend(found),
                Err(ScanError::Cancelled) => return Err(PipelineError::Cancelled),
                Err(e) => {
                    failed.insert(scan.document);
                    errors.push(PipelineError::from(e));
                }
            }
        }

        let report = {
            let _span = tracing::info_span!("redline.report").entered();
            let report = build_report(&documents, findings)?;
            tracing::info!(
                documents = report.documents.len(),
                findings = report.len(),
                superseded = report.superseded_count(),
                "report built"
            );
            report
        };
        self.events.emit_report_built(&ReportBuiltEvent {
            documents: documents.len(),
            findings: report.len(),
            superseded: report.superseded_count(),
        });

        Ok(PreparedRun {
            orchestrator: self,
            documents,
            report,
            errors,
            failed,
            started,
        })
    }

    /// Run the whole pipeline, asking `gate` when there is anything to approve.
    pub fn run(
        &self,
        documents: Vec<Document>,
        gate: &mut dyn ApprovalGate,
    ) -> Result<PipelineResult<RunOutcome>, PipelineError> {
        let prepared = self.prepare(documents)?;
        if let Some(reason) = prepared.skip_reason() {
            return Ok(prepared.skip(reason));
        }

        let decision = {
            let _span =
                tracing::info_span!("redline.gate", findings = prepared.report().len()).entered();
            gate.await_decision(prepared.report())?
        };
        prepared.decide(decision)
    }

    /// Load from `provider`, run, and commit changed documents to `sink`.
    ///
    /// Load and commit failures are per-document and land in the result's
    /// error list.
    pub fn run_corpus(
        &self,
        provider: &dyn CorpusProvider,
        gate: &mut dyn ApprovalGate,
        sink: &mut dyn CorpusSink,
    ) -> Result<PipelineResult<RunOutcome>, PipelineError> {
        let loaded = provider.load();
        let mut result = self.run(loaded.data, gate)?;
        let mut errors = loaded.errors;
        errors.append(&mut result.errors);
        result.errors = errors;
        self.check_cancelled()?;

        for id in &result.data.changed {
            let Some(document) = result.data.document(id) else {
                continue;
            };
            if let Err(e) = sink.commit(document) {
                tracing::warn!(document = %id, error = %e, "commit failed");
                result.errors.push(e.into());
            }
        }
        Ok(result)
    }
}

/// A scanned and reported run waiting for its decision.
pub struct PreparedRun<'o> {
    orchestrator: &'o Orchestrator,
    documents: Vec<Document>,
    report: Report,
    errors: Vec<PipelineError>,
    failed: FxHashSet<String>,
    started: Instant,
}

impl<'o> PreparedRun<'o> {
    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Per-document scan errors so far.
    pub fn errors(&self) -> &[PipelineError] {
        &self.errors
    }

    /// Why the gate need not be consulted, if it need not.
    pub fn skip_reason(&self) -> Option<&'static str> {
        if !self.orchestrator.config.gate.effective_skip_when_empty() {
            return None;
        }
        if self.report.is_empty() {
            Some("no findings")
        } else if self.report.fixable_count() == 0 {
            Some("only advisory findings")
        } else {
            None
        }
    }

    /// End the run without a decision; the corpus is returned unmodified.
    pub fn skip(self, reason: &str) -> PipelineResult<RunOutcome> {
        tracing::info!(reason, "approval gate skipped");
        self.orchestrator.events.emit_gate_skipped(&GateSkippedEvent {
            reason: reason.to_string(),
        });
        let outcome = RunOutcome {
            phase: RunPhase::GateSkipped,
            findings: self.report.len(),
            documents: self.documents,
            ..Default::default()
        };
        finish(self.orchestrator, self.started, outcome, self.errors)
    }

    /// Consume the decision and, if approved, apply the admitted findings.
    ///
    /// An approval the gate policy forbids aborts the run before any
    /// document is touched.
    pub fn decide(self, decision: Decision) -> Result<PipelineResult<RunOutcome>, PipelineError> {
        let PreparedRun {
            orchestrator,
            documents,
            report,
            mut errors,
            failed,
            started,
        } = self;
        GatePolicy::from(&orchestrator.config.gate).check(
            &decision,
            &report,
            &orchestrator.rules,
        )?;

        tracing::info!(decision = %decision, "gate decided");
        orchestrator.events.emit_gate_decided(&GateDecidedEvent {
            approved: decision.approved(),
            scope: decision.scope().to_string(),
        });

        let findings = report.len();
        if !decision.approved() {
            let outcome = RunOutcome {
                phase: RunPhase::Rejected,
                findings,
                documents,
                ..Default::default()
            };
            return Ok(finish(orchestrator, started, outcome, errors));
        }
        orchestrator.check_cancelled()?;

        let _span = tracing::info_span!("redline.apply").entered();
        let apply_started = Instant::now();
        let mut applied = Vec::new();
        let mut changed = Vec::new();
        let mut successors = Vec::with_capacity(documents.len());

        for document in &documents {
            let approved: Vec<&Finding> = report
                .entries_for(document.id())
                .map(|e| &e.finding)
                .filter(|f| f.is_fixable() && decision.admits(f))
                .collect();
            if approved.is_empty() || failed.contains(document.id()) {
                successors.push(document.clone());
                continue;
            }

            match apply(document, &approved) {
                Ok(result) => {
                    tracing::debug!(
                        document = document.id(),
                        edits_applied = result.edits,
                        superseded = result.superseded.len(),
                        outcome = ?result.outcome,
                        "document applied"
                    );
                    orchestrator.events.emit_document_applied(&DocumentAppliedEvent {
                        document: document.id().to_string(),
                        edits: result.edits,
                        changed: result.changed(),
                    });
                    if result.changed() {
                        changed.push(document.id().to_string());
                    }
                    applied.push(DocumentApplied {
                        document: document.id().to_string(),
                        outcome: result.outcome,
                        edits: result.edits,
                        superseded: result.superseded,
                    });
                    successors.push(result.document);
                }
                Err(e) => {
                    tracing::warn!(
                        document = document.id(),
                        error = %e,
                        "rewrite aborted; original kept"
                    );
                    orchestrator.events.emit_apply_error(&ApplyErrorEvent {
                        document: document.id().to_string(),
                        rule_id: match &e {
                            ApplyError::Inconsistent { rule_id, .. } => rule_id.clone(),
                            ApplyError::InvalidTransition { .. } => None,
                        },
                        message: e.to_string(),
                    });
                    errors.push(PipelineError::from(e));
                    successors.push(document.clone());
                }
            }
        }

        tracing::info!(
            documents = changed.len(),
            edits_applied = applied.iter().map(|a| a.edits).sum::<usize>(),
            apply_duration_ms = apply_started.elapsed().as_millis() as u64,
            "apply complete"
        );

        let outcome = RunOutcome {
            phase: RunPhase::Applied,
            documents: successors,
            changed,
            applied,
            findings,
        };
        Ok(finish(orchestrator, started, outcome, errors))
    }
}

fn finish(
    orchestrator: &Orchestrator,
    started: Instant,
    outcome: RunOutcome,
    errors: Vec<PipelineError>,
) -> PipelineResult<RunOutcome> {
    orchestrator.events.emit_run_complete(&RunCompleteEvent {
        changed_documents: outcome.changed.len(),
        errors: errors.len(),
        duration_ms: started.elapsed().as_millis() as u64,
    });
    PipelineResult {
        data: outcome,
        errors,
    }
}
