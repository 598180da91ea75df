//! Pipeline data model.

pub mod collections;
pub mod document;
pub mod finding;
pub mod span;

pub use document::{Document, LineEnding, TextEncoding};
pub use finding::{Finding, FindingId, LineRange};
pub use span::{Span, SpanFault};
