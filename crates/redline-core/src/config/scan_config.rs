//! Corpus scan configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Worker threads for per-document scanning. Default: rayon's choice.
    pub threads: Option<usize>,
    /// Skip files larger than this many bytes. Default: 1 MiB.
    pub max_file_size: Option<u64>,
    /// Glob patterns a file must match to join the corpus. Empty = all.
    #[serde(default)]
    pub include: Vec<String>,
    /// Glob patterns that remove files from the corpus.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Honour `.gitignore` while walking directories. Default: true.
    pub respect_gitignore: Option<bool>,
}

impl ScanConfig {
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(1_048_576)
    }

    pub fn effective_respect_gitignore(&self) -> bool {
        self.respect_gitignore.unwrap_or(true)
    }
}
