//! What a run hands back.

use redline_core::Document;

use crate::mutation::{ApplyOutcome, Supersession};

/// How far a run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    /// Nothing to approve; the gate was never consulted.
    #[default]
    GateSkipped,
    /// The gate rejected; nothing was applied.
    Rejected,
    /// The gate approved and the mutator ran.
    Applied,
}

/// Per-document apply summary.
#[derive(Debug, Clone)]
pub struct DocumentApplied {
    pub document: String,
    pub outcome: ApplyOutcome,
    pub edits: usize,
    pub superseded: Vec<Supersession>,
}

/// Result of a run: the successor corpus plus what happened to it.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub phase: RunPhase,
    /// Corpus′ in corpus order. Documents that were not rewritten are the
    /// originals.
    pub documents: Vec<Document>,
    /// Ids of documents whose text changed.
    pub changed: Vec<String>,
    pub applied: Vec<DocumentApplied>,
    /// Findings in the report that led to this outcome.
    pub findings: usize,
}

impl RunOutcome {
    pub fn is_changed(&self, document: &str) -> bool {
        self.changed.iter().any(|id| id == document)
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id() == id)
    }

    pub fn edits(&self) -> usize {
        self.applied.iter().map(|a| a.edits).sum()
    }

    pub fn superseded(&self) -> impl Iterator<Item = &Supersession> {
        self.applied.iter().flat_map(|a| a.superseded.iter())
    }
}
