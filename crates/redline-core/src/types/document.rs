//! Documents: one named text buffer in a corpus.

use serde::{Deserialize, Serialize};

use super::finding::LineRange;
use super::span::Span;
use crate::errors::CorpusError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Dominant line terminator of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Lf,
    CrLf,
    Mixed,
    /// Single-line text.
    None,
}

impl LineEnding {
    pub fn detect(text: &str) -> Self {
        let crlf = text.matches("\r\n").count();
        let lf = text.matches('\n').count() - crlf;
        match (lf, crlf) {
            (0, 0) => Self::None,
            (_, 0) => Self::Lf,
            (0, _) => Self::CrLf,
            _ => Self::Mixed,
        }
    }
}

/// Encoding metadata captured at load time and restored on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEncoding {
    pub line_ending: LineEnding,
    /// The source bytes started with a UTF-8 byte order mark.
    pub bom: bool,
}

/// An immutable text document.
///
/// A `Document` is never edited in place. The mutator produces a successor
/// via [`Document::with_text`] once a rewrite is committed.
#[derive(Debug, Clone)]
pub struct Document {
    id: String,
    text: String,
    encoding: TextEncoding,
    line_starts: Vec<usize>,
}

impl Document {
    /// Create a document from already-decoded text.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let encoding = TextEncoding {
            line_ending: LineEnding::detect(&text),
            bom: false,
        };
        Self::with_encoding(id.into(), text, encoding)
    }

    /// Decode raw bytes as UTF-8, recording and stripping a leading BOM.
    pub fn from_bytes(id: impl Into<String>, bytes: Vec<u8>) -> Result<Self, CorpusError> {
        let id = id.into();
        let (bom, bytes) = match bytes.strip_prefix(UTF8_BOM) {
            Some(rest) => (true, rest.to_vec()),
            None => (false, bytes),
        };
        let text = String::from_utf8(bytes).map_err(|e| CorpusError::UnsupportedEncoding {
            document: id.clone(),
            message: e.utf8_error().to_string(),
        })?;
        let encoding = TextEncoding {
            line_ending: LineEnding::detect(&text),
            bom,
        };
        Ok(Self::with_encoding(id, text, encoding))
    }

    fn with_encoding(id: String, text: String, encoding: TextEncoding) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            id,
            text,
            encoding,
            line_starts,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based line number containing byte `offset`.
    pub fn line_of(&self, offset: usize) -> u32 {
        self.line_starts.partition_point(|&s| s <= offset) as u32
    }

    /// Inclusive 1-based line range covered by `span`.
    pub fn line_range(&self, span: Span) -> LineRange {
        let start = self.line_of(span.start);
        let end = if span.is_empty() {
            start
        } else {
            self.line_of(span.end - 1)
        };
        LineRange { start, end }
    }

    /// Bytes to persist: the text with its original BOM restored.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.text.len() + 3);
        if self.encoding.bom {
            out.extend_from_slice(UTF8_BOM);
        }
        out.extend_from_slice(self.text.as_bytes());
        out
    }

    /// The successor document after a committed rewrite. Identity and BOM
    /// carry over; the line ending is re-detected.
    pub fn with_text(&self, text: String) -> Document {
        let encoding = TextEncoding {
            line_ending: LineEnding::detect(&text),
            bom: self.encoding.bom,
        };
        Self::with_encoding(self.id.clone(), text, encoding)
    }
}
