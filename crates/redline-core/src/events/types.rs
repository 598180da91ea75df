//! Event payloads, one struct per event.

#[derive(Debug, Clone)]
pub struct ScanStartedEvent {
    pub documents: usize,
    pub rules: usize,
}

#[derive(Debug, Clone)]
pub struct DocumentScannedEvent {
    pub document: String,
    pub findings: usize,
}

#[derive(Debug, Clone)]
pub struct ScanErrorEvent {
    pub document: String,
    pub rule_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ReportBuiltEvent {
    pub documents: usize,
    pub findings: usize,
    pub superseded: usize,
}

#[derive(Debug, Clone)]
pub struct GateSkippedEvent {
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct GateDecidedEvent {
    pub approved: bool,
    pub scope: String,
}

#[derive(Debug, Clone)]
pub struct DocumentAppliedEvent {
    pub document: String,
    pub edits: usize,
    pub changed: bool,
}

#[derive(Debug, Clone)]
pub struct ApplyErrorEvent {
    pub document: String,
    pub rule_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct RunCompleteEvent {
    pub changed_documents: usize,
    pub errors: usize,
    pub duration_ms: u64,
}
