//! The per-document rewrite state machine.

use std::fmt;

use redline_core::errors::ApplyError;
use redline_core::types::collections::SmallVec4;
use redline_core::{Document, Finding, FindingId, Span};

use super::resolve::{resolve, Supersession};
use crate::scanner::hasher::hash_content;

/// Where a document's rewrite stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Unmodified,
    SpansResolved,
    Rewritten,
    Committed,
}

impl MutationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unmodified => "Unmodified",
            Self::SpansResolved => "SpansResolved",
            Self::Rewritten => "Rewritten",
            Self::Committed => "Committed",
        }
    }
}

impl fmt::Display for MutationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolved edit: replace `span` with `replacement` (empty = delete).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOp {
    pub span: Span,
    pub replacement: String,
    pub finding: FindingId,
    pub rule_id: String,
    /// Text the span is expected to cover.
    pub expected: String,
}

/// How an apply ended for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// At least one edit changed the text.
    Rewritten,
    /// Nothing to do, or the edits reproduced the original bytes.
    Unchanged,
    /// The findings were computed against different text; nothing was touched.
    Stale,
}

/// Result of a successful apply.
#[derive(Debug, Clone)]
pub struct Applied {
    /// The successor document, or a copy of the original when unchanged.
    pub document: Document,
    pub outcome: ApplyOutcome,
    pub edits: usize,
    pub superseded: Vec<Supersession>,
}

impl Applied {
    pub fn changed(&self) -> bool {
        self.outcome == ApplyOutcome::Rewritten
    }
}

/// A single document's rewrite, driven one state at a time.
///
/// The original document is only borrowed, so a failed rewrite leaves the
/// caller holding the untouched original.
#[derive(Debug)]
pub struct Mutation<'d> {
    document: &'d Document,
    state: MutationState,
    plan: SmallVec4<EditOp>,
    superseded: Vec<Supersession>,
    stale: bool,
    buffer: Option<String>,
}

impl<'d> Mutation<'d> {
    pub fn new(document: &'d Document) -> Self {
        Self {
            document,
            state: MutationState::Unmodified,
            plan: SmallVec4::new(),
            superseded: Vec::new(),
            stale: false,
            buffer: None,
        }
    }

    pub fn state(&self) -> MutationState {
        self.state
    }

    /// Edit operations, sorted descending by start.
    pub fn plan(&self) -> &[EditOp] {
        &self.plan
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// `Unmodified → SpansResolved`: drop advisory findings, resolve overlaps
    /// and order the surviving edits back to front.
    pub fn resolve(&mut self, approved: &[&Finding]) -> Result<(), ApplyError> {
        self.expect_state(MutationState::Unmodified, MutationState::SpansResolved)?;

        if let Some(foreign) = approved.iter().find(|f| f.document != self.document.id()) {
            return Err(self.inconsistent(
                foreign,
                format!("finding belongs to document {}", foreign.document),
            ));
        }

        let current = hash_content(self.document.text().as_bytes());
        if approved
            .iter()
            .any(|f| f.is_fixable() && f.source_hash != current)
        {
            tracing::warn!(
                document = self.document.id(),
                "findings were computed against different text; leaving document untouched"
            );
            self.stale = true;
            self.state = MutationState::SpansResolved;
            return Ok(());
        }

        let resolution = resolve(approved.iter().copied());
        let mut plan: SmallVec4<EditOp> = resolution
            .winners
            .iter()
            .map(|f| EditOp {
                span: f.span,
                replacement: f.suggested_replacement.clone().unwrap_or_default(),
                finding: f.id.clone(),
                rule_id: f.rule_id.clone(),
                expected: f.matched.clone(),
            })
            .collect();
        // Descending start; at equal starts the longer span goes first so an
        // insertion point lands before the text that follows it.
        plan.sort_by(|a, b| {
            b.span
                .start
                .cmp(&a.span.start)
                .then(b.span.end.cmp(&a.span.end))
        });

        for superseded in &resolution.superseded {
            tracing::debug!(
                document = self.document.id(),
                loser = %superseded.loser,
                winner = %superseded.winner,
                "finding superseded"
            );
        }

        self.plan = plan;
        self.superseded = resolution.superseded;
        self.state = MutationState::SpansResolved;
        Ok(())
    }

    /// `SpansResolved → Rewritten`: apply the plan to a fresh buffer,
    /// verifying every edit against the original text.
    pub fn rewrite(&mut self) -> Result<(), ApplyError> {
        self.expect_state(MutationState::SpansResolved, MutationState::Rewritten)?;
        if self.stale {
            self.state = MutationState::Rewritten;
            return Ok(());
        }

        let original = self.document.text();
        let mut buffer = original.to_string();
        let mut previous: Option<Span> = None;
        let mut expected_len = original.len();

        for op in &self.plan {
            if let Err(fault) = op.span.check(original) {
                return Err(self.op_error(op, format!("span {}: {fault}", op.span)));
            }
            if previous.is_some_and(|p| op.span.end > p.start || op.span.overlaps(&p)) {
                return Err(self.op_error(op, format!("span {} overlaps a later edit", op.span)));
            }
            if original[op.span.range()] != op.expected {
                return Err(self.op_error(
                    op,
                    format!(
                        "span {} covers {:?}, expected {:?}",
                        op.span,
                        &original[op.span.range()],
                        op.expected
                    ),
                ));
            }
            buffer.replace_range(op.span.range(), &op.replacement);
            previous = Some(op.span);
            expected_len = expected_len - op.span.len() + op.replacement.len();
        }

        if buffer.len() != expected_len {
            return Err(ApplyError::Inconsistent {
                document: self.document.id().to_string(),
                rule_id: None,
                finding: None,
                cause: format!(
                    "rewritten length {} differs from planned length {expected_len}",
                    buffer.len()
                ),
            });
        }

        self.buffer = Some(buffer);
        self.state = MutationState::Rewritten;
        Ok(())
    }

    /// `Rewritten → Committed`: produce the successor document.
    pub fn commit(mut self) -> Result<Applied, ApplyError> {
        self.expect_state(MutationState::Rewritten, MutationState::Committed)?;
        self.state = MutationState::Committed;

        let edits = self.plan.len();
        let (document, outcome) = match self.buffer.take() {
            _ if self.stale => (self.document.clone(), ApplyOutcome::Stale),
            Some(text) if text != self.document.text() => {
                (self.document.with_text(text), ApplyOutcome::Rewritten)
            }
            _ => (self.document.clone(), ApplyOutcome::Unchanged),
        };

        Ok(Applied {
            document,
            outcome,
            edits: if self.stale { 0 } else { edits },
            superseded: self.superseded,
        })
    }

    fn expect_state(
        &self,
        required: MutationState,
        attempted: MutationState,
    ) -> Result<(), ApplyError> {
        if self.state == required {
            Ok(())
        } else {
            Err(ApplyError::InvalidTransition {
                document: self.document.id().to_string(),
                state: self.state.as_str(),
                attempted: attempted.as_str(),
            })
        }
    }

    fn inconsistent(&self, finding: &Finding, cause: String) -> ApplyError {
        ApplyError::Inconsistent {
            document: self.document.id().to_string(),
            rule_id: Some(finding.rule_id.clone()),
            finding: Some(finding.id.clone()),
            cause,
        }
    }

    fn op_error(&self, op: &EditOp, cause: String) -> ApplyError {
        ApplyError::Inconsistent {
            document: self.document.id().to_string(),
            rule_id: Some(op.rule_id.clone()),
            finding: Some(op.finding.clone()),
            cause,
        }
    }
}

/// Apply approved findings to `document`.
///
/// Bytes outside the winning spans are copied verbatim. On error the original
/// document is untouched and still owned by the caller.
pub fn apply(document: &Document, approved: &[&Finding]) -> Result<Applied, ApplyError> {
    let mut mutation = Mutation::new(document);
    mutation.resolve(approved)?;
    mutation.rewrite()?;
    mutation.commit()
}

/// The text `document` would have if every fixable finding were approved.
pub fn preview(document: &Document, findings: &[&Finding]) -> Result<String, ApplyError> {
    let applied = apply(document, findings)?;
    Ok(applied.document.text().to_string())
}
