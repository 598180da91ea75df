//! EventDispatcher: synchronous fan-out to registered handlers.

use std::sync::Arc;

use super::handler::RedlineEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// With no handlers registered, `emit` iterates an empty Vec.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn RedlineEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn RedlineEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// A panicking handler is logged and does not stop later handlers.
    fn emit<F: Fn(&dyn RedlineEventHandler)>(&self, event: &'static str, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::error!(event, "event handler panicked");
            }
        }
    }

    // ---- Scan ----
    pub fn emit_scan_started(&self, event: &ScanStartedEvent) {
        self.emit("scan_started", |h| h.on_scan_started(event));
    }

    pub fn emit_document_scanned(&self, event: &DocumentScannedEvent) {
        self.emit("document_scanned", |h| h.on_document_scanned(event));
    }

    pub fn emit_scan_error(&self, event: &ScanErrorEvent) {
        self.emit("scan_error", |h| h.on_scan_error(event));
    }

    // ---- Report / Gate ----
    pub fn emit_report_built(&self, event: &ReportBuiltEvent) {
        self.emit("report_built", |h| h.on_report_built(event));
    }

    pub fn emit_gate_skipped(&self, event: &GateSkippedEvent) {
        self.emit("gate_skipped", |h| h.on_gate_skipped(event));
    }

    pub fn emit_gate_decided(&self, event: &GateDecidedEvent) {
        self.emit("gate_decided", |h| h.on_gate_decided(event));
    }

    // ---- Apply ----
    pub fn emit_document_applied(&self, event: &DocumentAppliedEvent) {
        self.emit("document_applied", |h| h.on_document_applied(event));
    }

    pub fn emit_apply_error(&self, event: &ApplyErrorEvent) {
        self.emit("apply_error", |h| h.on_apply_error(event));
    }

    // ---- Run ----
    pub fn emit_run_complete(&self, event: &RunCompleteEvent) {
        self.emit("run_complete", |h| h.on_run_complete(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
