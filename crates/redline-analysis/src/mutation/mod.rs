//! Mutator: turns approved findings into a rewritten document.
//!
//! Per document the rewrite moves through
//! `Unmodified → SpansResolved → Rewritten → Committed`. Any inconsistency
//! between the plan and the text aborts the document and leaves the original
//! untouched.

pub mod mutator;
pub mod resolve;

pub use mutator::{apply, preview, Applied, ApplyOutcome, EditOp, Mutation, MutationState};
pub use resolve::{resolve, Resolution, Supersession};
