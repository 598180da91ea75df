//! Observability for redline.
//! `tracing` crate with `EnvFilter`, per-stage log levels.

pub mod setup;

pub use setup::{init_tracing, init_tracing_with_filter};
