//! Filesystem corpus: explicit files plus directory walks honouring ignore files.

use std::fs;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;

use redline_core::config::ScanConfig;
use redline_core::errors::{CorpusError, PipelineResult};
use redline_core::types::collections::FxHashSet;
use redline_core::Document;

use super::{CorpusProvider, CorpusSink};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Text files under a project root.
///
/// Document ids are paths relative to `root` with `/` separators; files
/// outside the root keep their full path as id.
#[derive(Debug, Clone)]
pub struct FsCorpus {
    root: PathBuf,
    paths: Vec<PathBuf>,
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
    max_file_size: u64,
    respect_gitignore: bool,
}

impl FsCorpus {
    /// A corpus of `paths` (files or directories) resolved against `root`.
    /// An empty `paths` means the whole root.
    pub fn new(root: impl Into<PathBuf>, paths: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            paths,
            include: Vec::new(),
            exclude: Vec::new(),
            max_file_size: ScanConfig::default().effective_max_file_size(),
            respect_gitignore: true,
        }
    }

    /// Apply `[scan]` settings: globs, size limit and gitignore handling.
    pub fn with_config(mut self, config: &ScanConfig) -> Result<Self, CorpusError> {
        self.include = compile_patterns(&config.include)?;
        self.exclude = compile_patterns(&config.exclude)?;
        self.max_file_size = config.effective_max_file_size();
        self.respect_gitignore = config.effective_respect_gitignore();
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the document with `id` lives on disk.
    pub fn path_for(&self, id: &str) -> PathBuf {
        let path = Path::new(id);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn document_id(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(relative) => relative
                .components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => path.display().to_string(),
        }
    }

    fn selected(&self, id: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| p.matches_with(id, MATCH_OPTIONS));
        included && !self.exclude.iter().any(|p| p.matches_with(id, MATCH_OPTIONS))
    }

    /// Files a directory walk yields, sorted for a stable corpus order.
    fn walk(&self, dir: &Path, result: &mut PipelineResult<Vec<Document>>) -> Vec<PathBuf> {
        let walker = WalkBuilder::new(dir)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .git_global(false)
            .ignore(self.respect_gitignore)
            .require_git(false)
            .hidden(true)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_some_and(|t| t.is_file()) => {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => result.add_error(CorpusError::Io {
                    path: dir.to_path_buf(),
                    source: std::io::Error::other(e.to_string()),
                }),
            }
        }
        files.sort();
        files
    }

    fn read(&self, path: &Path) -> Result<Document, CorpusError> {
        let io_err = |source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        };
        let size = fs::metadata(path).map_err(io_err)?.len();
        if size > self.max_file_size {
            return Err(CorpusError::MaxFileSizeExceeded {
                path: path.to_path_buf(),
                size,
                max: self.max_file_size,
            });
        }
        let bytes = fs::read(path).map_err(io_err)?;
        Document::from_bytes(self.document_id(path), bytes)
    }
}

impl CorpusProvider for FsCorpus {
    fn load(&self) -> PipelineResult<Vec<Document>> {
        let mut result = PipelineResult::default();
        let mut seen = FxHashSet::default();
        let mut skipped = 0usize;

        let roots = if self.paths.is_empty() {
            vec![self.root.clone()]
        } else {
            self.paths.iter().map(|p| self.root.join(p)).collect()
        };

        for target in roots {
            if target.is_dir() {
                for path in self.walk(&target, &mut result) {
                    let id = self.document_id(&path);
                    if !self.selected(&id) || !seen.insert(id) {
                        continue;
                    }
                    // Walked files that are too large or not text are skipped
                    // rather than failing the corpus.
                    match self.read(&path) {
                        Ok(document) => result.data.push(document),
                        Err(e @ (CorpusError::MaxFileSizeExceeded { .. }
                        | CorpusError::UnsupportedEncoding { .. })) => {
                            tracing::debug!(path = %path.display(), reason = %e, "skipping file");
                            skipped += 1;
                        }
                        Err(e) => result.add_error(e),
                    }
                }
            } else {
                let id = self.document_id(&target);
                if !seen.insert(id.clone()) {
                    continue;
                }
                if self.exclude.iter().any(|p| p.matches_with(&id, MATCH_OPTIONS)) {
                    tracing::debug!(document = %id, "explicit path excluded by pattern");
                    continue;
                }
                match self.read(&target) {
                    Ok(document) => result.data.push(document),
                    Err(e) => result.add_error(e),
                }
            }
        }

        if skipped > 0 {
            tracing::info!(skipped, "skipped oversized or non-UTF-8 files");
        }
        tracing::info!(
            documents = result.data.len(),
            errors = result.error_count(),
            "corpus loaded"
        );
        result
    }
}

impl CorpusSink for FsCorpus {
    /// Write through a temporary sibling file, then rename over the target.
    fn commit(&mut self, document: &Document) -> Result<(), CorpusError> {
        let path = self.path_for(document.id());
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = path.with_file_name(format!(".{file_name}.redline-tmp"));
        let io_err = |p: &Path| {
            let p = p.to_path_buf();
            move |source| CorpusError::Io { path: p, source }
        };

        fs::write(&tmp, document.to_bytes()).map_err(io_err(&tmp))?;
        if let Ok(meta) = fs::metadata(&path) {
            if let Err(e) = fs::set_permissions(&tmp, meta.permissions()) {
                tracing::warn!(path = %tmp.display(), error = %e, "could not copy permissions");
            }
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_err(&path)(e));
        }
        tracing::debug!(document = document.id(), bytes = document.len(), "document written");
        Ok(())
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>, CorpusError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| CorpusError::InvalidPattern {
                pattern: p.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}
