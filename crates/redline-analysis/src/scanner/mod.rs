//! Scanner subsystem: applies a RuleSet to documents, producing findings.
//!
//! Scanning is a pure function of (document, rules). Documents are scanned
//! independently and in parallel; results come back in corpus order.

pub mod hasher;
pub mod scanner;

pub use scanner::{scan, DocumentScan, Scanner};
