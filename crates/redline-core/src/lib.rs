//! redline-core: types, errors, config, events, tracing, and cancellation
//! shared by every stage of the detect → report → approve → apply pipeline.

pub mod config;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
pub mod types;

pub use types::{Document, Finding, FindingId, LineRange, Span};
