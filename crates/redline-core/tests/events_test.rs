//! Tests for the pipeline event dispatcher.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use redline_core::events::*;

#[derive(Default)]
struct Counter {
    scanned: AtomicUsize,
    applied: AtomicUsize,
}

impl RedlineEventHandler for Counter {
    fn on_document_scanned(&self, _event: &DocumentScannedEvent) {
        self.scanned.fetch_add(1, Ordering::SeqCst);
    }

    fn on_document_applied(&self, event: &DocumentAppliedEvent) {
        if event.changed {
            self.applied.fetch_add(1, Ordering::SeqCst);
        }
    }
}

struct Panicker;

impl RedlineEventHandler for Panicker {
    fn on_document_scanned(&self, _event: &DocumentScannedEvent) {
        panic!("handler failure");
    }
}

#[test]
fn empty_dispatcher_is_a_no_op() {
    let dispatcher = EventDispatcher::new();
    assert_eq!(dispatcher.handler_count(), 0);
    dispatcher.emit_run_complete(&RunCompleteEvent {
        changed_documents: 0,
        errors: 0,
        duration_ms: 0,
    });
}

#[test]
fn events_reach_every_handler_across_threads() {
    let counter = Arc::new(Counter::default());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(counter.clone());

    (0..64).into_par_iter().for_each(|i| {
        dispatcher.emit_document_scanned(&DocumentScannedEvent {
            document: format!("doc-{i}"),
            findings: i,
        });
    });

    assert_eq!(counter.scanned.load(Ordering::SeqCst), 64);
}

#[test]
fn panicking_handler_does_not_block_others() {
    let counter = Arc::new(Counter::default());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(Arc::new(Panicker));
    dispatcher.register(counter.clone());

    dispatcher.emit_document_scanned(&DocumentScannedEvent {
        document: "a.txt".to_string(),
        findings: 1,
    });
    dispatcher.emit_document_applied(&DocumentAppliedEvent {
        document: "a.txt".to_string(),
        edits: 1,
        changed: true,
    });

    assert_eq!(counter.scanned.load(Ordering::SeqCst), 1);
    assert_eq!(counter.applied.load(Ordering::SeqCst), 1);
}
