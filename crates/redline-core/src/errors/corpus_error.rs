//! Corpus loading and commit errors.

use std::path::PathBuf;

use super::error_code::{self, RedlineErrorCode};

/// Errors that can occur while reading or writing corpus documents.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported encoding in {document}: {message}")]
    UnsupportedEncoding { document: String, message: String },

    #[error("File too large: {path} ({size} bytes, max {max})")]
    MaxFileSizeExceeded { path: PathBuf, size: u64, max: u64 },

    #[error("Duplicate document id in corpus: {document}")]
    DuplicateDocument { document: String },

    #[error("Invalid corpus pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl RedlineErrorCode for CorpusError {
    fn error_code(&self) -> &'static str {
        error_code::CORPUS_ERROR
    }
}
