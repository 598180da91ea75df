//! In-process corpus.

use redline_core::errors::{CorpusError, PipelineResult};
use redline_core::Document;

use super::{CorpusProvider, CorpusSink};

/// Documents held in memory. Commits replace the stored document.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    documents: Vec<Document>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(id, text)` pairs in order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, CorpusError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut corpus = Self::new();
        for (id, text) in pairs {
            corpus.insert(Document::new(id, text))?;
        }
        Ok(corpus)
    }

    pub fn insert(&mut self, document: Document) -> Result<(), CorpusError> {
        if self.get(document.id()).is_some() {
            return Err(CorpusError::DuplicateDocument {
                document: document.id().to_string(),
            });
        }
        self.documents.push(document);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id() == id)
    }

    /// Current text of `id`.
    pub fn text(&self, id: &str) -> Option<&str> {
        self.get(id).map(Document::text)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl CorpusProvider for MemoryCorpus {
    fn load(&self) -> PipelineResult<Vec<Document>> {
        PipelineResult::new(self.documents.clone())
    }
}

impl CorpusSink for MemoryCorpus {
    fn commit(&mut self, document: &Document) -> Result<(), CorpusError> {
        match self.documents.iter_mut().find(|d| d.id() == document.id()) {
            Some(slot) => *slot = document.clone(),
            None => self.documents.push(document.clone()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = MemoryCorpus::from_pairs([("a", "1"), ("a", "2")]).unwrap_err();
        assert!(matches!(err, CorpusError::DuplicateDocument { ref document } if document == "a"));
    }

    #[test]
    fn commit_replaces_in_place() {
        let mut corpus = MemoryCorpus::from_pairs([("a", "1"), ("b", "2")]).unwrap();
        let successor = corpus.get("a").unwrap().with_text("one".to_string());
        corpus.commit(&successor).unwrap();
        assert_eq!(corpus.text("a"), Some("one"));
        assert_eq!(corpus.documents()[0].id(), "a");
    }
}
