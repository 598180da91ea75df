//! Corpus providers and sinks.
//!
//! Which documents make up a corpus is the caller's business. The pipeline
//! only consumes a loaded, ordered list of documents and hands committed
//! successors back to a sink.

pub mod fs;
pub mod memory;

pub use fs::FsCorpus;
pub use memory::MemoryCorpus;

use redline_core::errors::{CorpusError, PipelineResult};
use redline_core::Document;

/// Supplies the documents of one run, in a stable order.
///
/// Documents that fail to load are reported as non-fatal errors; the rest of
/// the corpus still loads.
pub trait CorpusProvider {
    fn load(&self) -> PipelineResult<Vec<Document>>;
}

/// Receives committed documents.
pub trait CorpusSink {
    fn commit(&mut self, document: &Document) -> Result<(), CorpusError>;
}
