//! RedlineEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for handling pipeline events.
///
/// Handlers override only the events they care about. `Send + Sync` because
/// scan events fire from worker threads.
pub trait RedlineEventHandler: Send + Sync {
    // ---- Scan ----
    fn on_scan_started(&self, _event: &ScanStartedEvent) {}
    fn on_document_scanned(&self, _event: &DocumentScannedEvent) {}
    fn on_scan_error(&self, _event: &ScanErrorEvent) {}

    // ---- Report / Gate ----
    fn on_report_built(&self, _event: &ReportBuiltEvent) {}
    fn on_gate_skipped(&self, _event: &GateSkippedEvent) {}
    fn on_gate_decided(&self, _event: &GateDecidedEvent) {}

    // ---- Apply ----
    fn on_document_applied(&self, _event: &DocumentAppliedEvent) {}
    fn on_apply_error(&self, _event: &ApplyErrorEvent) {}

    // ---- Run ----
    fn on_run_complete(&self, _event: &RunCompleteEvent) {}
}
