//! End-to-end runs through the orchestrator.

use std::sync::{Arc, Mutex};

use redline_analysis::corpus::{CorpusSink, MemoryCorpus};
use redline_analysis::gate::{Decision, PresetGate};
use redline_analysis::orchestrator::{Orchestrator, RunPhase};
use redline_analysis::report::Report;
use redline_analysis::rules::{load_packs, FnDetector, RuleMatch, RuleSet};
use redline_core::config::{GateConfig, RedlineConfig};
use redline_core::errors::{GateError, PipelineError};
use redline_core::events::{
    DocumentAppliedEvent, EventDispatcher, GateDecidedEvent, GateSkippedEvent, RedlineEventHandler,
};
use redline_core::traits::Cancellable;
use redline_core::{Document, Span};

#[derive(Default)]
struct Recorder {
    log: Mutex<Vec<String>>,
}

impl Recorder {
    fn push(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl RedlineEventHandler for Recorder {
    fn on_gate_skipped(&self, event: &GateSkippedEvent) {
        self.push(format!("skipped:{}", event.reason));
    }

    fn on_gate_decided(&self, event: &GateDecidedEvent) {
        self.push(format!("decided:{}", event.approved));
    }

    fn on_document_applied(&self, event: &DocumentAppliedEvent) {
        self.push(format!("applied:{}", event.document));
    }
}

fn orchestrator(packs: &[&str]) -> (Orchestrator, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let mut events = EventDispatcher::new();
    events.register(recorder.clone());
    let rules = load_packs(packs).unwrap();
    (Orchestrator::new(Arc::new(rules)).with_events(events), recorder)
}

fn docs(pairs: &[(&str, &str)]) -> Vec<Document> {
    pairs.iter().map(|(id, text)| Document::new(*id, *text)).collect()
}

/// Scenario: one transient comment, approve all, comment gone.
#[test]
fn test_approve_all_removes_transient_comment() {
    let (orch, _) = orchestrator(&["transient-comments"]);
    let corpus = docs(&[("Foo.java", "// moved to Foo.java\nint x = 1;")]);

    let prepared = orch.prepare(corpus).unwrap();
    assert_eq!(prepared.report().len(), 1);
    let result = prepared.decide(Decision::approve_all()).unwrap();

    assert!(result.is_clean());
    assert_eq!(result.data.phase, RunPhase::Applied);
    assert_eq!(result.data.documents[0].text(), "int x = 1;");
    assert_eq!(result.data.changed, vec!["Foo.java".to_string()]);
}

/// Scenario: nothing flagged, the gate is never consulted.
#[test]
fn test_clean_corpus_skips_gate() {
    let (orch, recorder) = orchestrator(&["transient-comments"]);
    let corpus = docs(&[("a.rs", "fn main() {}\n")]);
    let mut gate = |_: &Report| -> Result<Decision, GateError> {
        panic!("gate must not be consulted for a clean corpus")
    };

    let result = orch.run(corpus, &mut gate).unwrap();
    assert_eq!(result.data.phase, RunPhase::GateSkipped);
    assert_eq!(result.data.documents[0].text(), "fn main() {}\n");
    assert!(result.data.changed.is_empty());
    assert_eq!(recorder.entries(), vec!["skipped:no findings".to_string()]);
}

/// With skipping disabled an empty report still goes to the gate.
#[test]
fn test_gate_consulted_when_skip_disabled() {
    let (orch, _) = orchestrator(&["transient-comments"]);
    let orch = orch.with_config(RedlineConfig {
        gate: GateConfig {
            skip_when_empty: Some(false),
            ..Default::default()
        },
        ..Default::default()
    });
    let mut asked = false;
    let mut gate = |_: &Report| -> Result<Decision, GateError> {
        asked = true;
        Ok(Decision::approve_all())
    };
    let result = orch.run(docs(&[("a", "clean\n")]), &mut gate).unwrap();
    assert!(asked);
    assert_eq!(result.data.phase, RunPhase::Applied);
    assert!(result.data.changed.is_empty());
}

/// Scenario: overlapping rules; the earlier rule wins and the report says so.
#[test]
fn test_overlap_resolution_end_to_end() {
    let line_span = |first: usize, last: usize| {
        move |doc: &Document| {
            let starts: Vec<usize> = std::iter::once(0)
                .chain(doc.text().match_indices('\n').map(|(i, _)| i + 1))
                .collect();
            vec![RuleMatch::delete(Span::new(starts[first - 1], starts[last]))]
        }
    };
    let rules = RuleSet::new("t")
        .with(FnDetector::new("rule-a", "d", "a", line_span(3, 5)))
        .unwrap()
        .with(FnDetector::new("rule-b", "d", "b", line_span(4, 6)))
        .unwrap();
    let orch = Orchestrator::new(Arc::new(rules));

    let prepared = orch
        .prepare(docs(&[("d", "1\n2\n3\n4\n5\n6\n7\n")]))
        .unwrap();
    let report = prepared.report();
    assert_eq!(report.len(), 2);
    let superseded: Vec<&str> = report
        .entries
        .iter()
        .filter(|e| e.superseded.is_some())
        .map(|e| e.finding.rule_id.as_str())
        .collect();
    assert_eq!(superseded, vec!["rule-b"]);

    let result = prepared.decide(Decision::approve_all()).unwrap();
    assert_eq!(result.data.documents[0].text(), "1\n2\n6\n7\n");
    assert_eq!(result.data.superseded().count(), 1);
}

/// Scenario: a rule-scoped decision only touches that rule's spans.
#[test]
fn test_rule_scoped_decision() {
    let (orch, _) = orchestrator(&["transient-comments", "ai-writing"]);
    let corpus = docs(&[(
        "notes.txt",
        "// removed legacy flag\nWe leverage caches.\n",
    )]);

    let mut gate = PresetGate::new(Decision::approve_rules(["ai-hype-vocab"]));
    let result = orch.run(corpus, &mut gate).unwrap();
    let text = result.data.documents[0].text();
    assert_eq!(text, "// removed legacy flag\nWe use caches.\n");

    // The unapproved finding resurfaces on the next run.
    let (orch, _) = orchestrator(&["transient-comments", "ai-writing"]);
    let next = orch.prepare(docs(&[("notes.txt", text)])).unwrap();
    assert_eq!(next.report().rule_ids(), vec!["transient-removed"]);
}

/// Rejection: the mutator never runs and the corpus is returned as is.
#[test]
fn test_rejection_mutates_nothing() {
    let (orch, recorder) = orchestrator(&["transient-comments"]);
    let corpus = docs(&[("a", "// moved to b\nx\n"), ("b", "# removed y\nz\n")]);
    let mut gate = PresetGate::new(Decision::reject());

    let result = orch.run(corpus, &mut gate).unwrap();
    assert_eq!(result.data.phase, RunPhase::Rejected);
    assert_eq!(result.data.documents[0].text(), "// moved to b\nx\n");
    assert_eq!(result.data.documents[1].text(), "# removed y\nz\n");
    assert!(recorder.entries().iter().all(|e| !e.starts_with("applied:")));
}

/// Nothing is applied before the gate resolves.
#[test]
fn test_gate_precedes_every_apply() {
    let (orch, recorder) = orchestrator(&["transient-comments"]);
    let corpus = docs(&[("a", "// moved to b\nx\n"), ("b", "# removed y\nz\n")]);
    let seen_by_gate = recorder.clone();
    let mut gate = move |_: &Report| -> Result<Decision, GateError> {
        assert!(seen_by_gate.entries().is_empty(), "work happened before the decision");
        Ok(Decision::approve_all())
    };

    orch.run(corpus, &mut gate).unwrap();
    let log = recorder.entries();
    assert_eq!(log[0], "decided:true");
    assert_eq!(&log[1..], &["applied:a".to_string(), "applied:b".to_string()]);
}

/// A failing document is reported while the others still get rewritten.
#[test]
fn test_per_document_isolation() {
    let rules = RuleSet::new("t")
        .with(FnDetector::new("first-char", "d", "r", |doc| {
            if doc.id() == "broken" {
                vec![RuleMatch::delete(Span::new(0, doc.len() + 1))]
            } else {
                vec![RuleMatch::delete(Span::new(0, 1))]
            }
        }))
        .unwrap();
    let orch = Orchestrator::new(Arc::new(rules));
    let corpus = docs(&[("ok-1", "abc"), ("broken", "abc"), ("ok-2", "xyz")]);

    let result = orch
        .run(corpus, &mut PresetGate::new(Decision::approve_all()))
        .unwrap();
    assert_eq!(result.error_count(), 1);
    assert!(matches!(result.errors[0], PipelineError::Scan(_)));
    assert!(result.errors[0].to_string().contains("broken"));
    assert!(result.errors[0].to_string().contains("first-char"));

    let texts: Vec<&str> = result.data.documents.iter().map(|d| d.text()).collect();
    assert_eq!(texts, vec!["bc", "abc", "yz"]);
}

/// Partial approval is refused when the policy forbids it.
#[test]
fn test_partial_approval_disallowed_aborts() {
    let (orch, recorder) = orchestrator(&["transient-comments"]);
    let orch = orch.with_config(RedlineConfig {
        gate: GateConfig {
            allow_partial: Some(false),
            ..Default::default()
        },
        ..Default::default()
    });
    let mut gate = PresetGate::new(Decision::approve_rules(["transient-moved"]));
    let err = orch
        .run(docs(&[("a", "// moved to b\nx\n")]), &mut gate)
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Gate(GateError::PartialApprovalDisallowed { .. })
    ));
    assert!(recorder.entries().is_empty());
}

/// A gate error aborts the whole run.
#[test]
fn test_gate_error_aborts_run() {
    let (orch, recorder) = orchestrator(&["transient-comments"]);
    let mut gate = |_: &Report| -> Result<Decision, GateError> {
        Err(GateError::InvalidResponse { attempts: 3 })
    };
    let err = orch.run(docs(&[("a", "// moved to b\n")]), &mut gate).unwrap_err();
    assert!(matches!(err, PipelineError::Gate(_)));
    assert!(recorder.entries().is_empty());
}

/// Cancelling between prepare and decide leaves everything untouched.
#[test]
fn test_cancellation_before_apply() {
    let (orch, recorder) = orchestrator(&["transient-comments"]);
    let token = orch.cancellation_token();
    let prepared = orch.prepare(docs(&[("a", "// moved to b\nx\n")])).unwrap();
    token.cancel();

    let err = prepared.decide(Decision::approve_all()).unwrap_err();
    assert!(matches!(err, PipelineError::Cancelled));
    assert!(recorder.entries().iter().all(|e| !e.starts_with("applied:")));

    assert!(matches!(
        orch.prepare(docs(&[("a", "x")])),
        Err(PipelineError::Cancelled)
    ));
}

/// Duplicate document ids are refused up front.
#[test]
fn test_duplicate_documents_rejected() {
    let (orch, _) = orchestrator(&["transient-comments"]);
    assert!(matches!(
        orch.prepare(docs(&[("a", "1"), ("a", "2")])),
        Err(PipelineError::Corpus(_))
    ));
}

/// Runs over a provider/sink commit only changed documents.
#[test]
fn test_run_corpus_commits_changes() {
    #[derive(Default)]
    struct CountingSink {
        committed: Vec<String>,
    }
    impl CorpusSink for CountingSink {
        fn commit(&mut self, document: &Document) -> Result<(), redline_core::errors::CorpusError> {
            self.committed.push(document.id().to_string());
            Ok(())
        }
    }

    let (orch, _) = orchestrator(&["transient-comments"]);
    let mut corpus = MemoryCorpus::from_pairs([("a", "// moved to b\nx\n"), ("b", "clean\n")]).unwrap();
    let mut sink = CountingSink::default();
    let result = orch
        .run_corpus(&corpus, &mut PresetGate::new(Decision::approve_all()), &mut sink)
        .unwrap();
    assert_eq!(sink.committed, vec!["a".to_string()]);

    for id in &result.data.changed {
        corpus.commit(result.data.document(id).unwrap()).unwrap();
    }
    assert_eq!(corpus.text("a"), Some("x\n"));
    assert_eq!(corpus.text("b"), Some("clean\n"));
}
