//! Half-open byte ranges into a document's text.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` within a document's text.
///
/// Fields are public because spans come from external detectors; a span is
/// only trusted after [`Span::check`] has accepted it against the text it
/// claims to index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Why a span was rejected against a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanFault {
    /// `start > end`.
    Inverted,
    /// `end` lies past the end of the text.
    OutOfBounds { len: usize },
    /// An endpoint splits a multi-byte UTF-8 character.
    NotCharBoundary { offset: usize },
}

impl fmt::Display for SpanFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inverted => write!(f, "start is greater than end"),
            Self::OutOfBounds { len } => write!(f, "range exceeds text length {len}"),
            Self::NotCharBoundary { offset } => {
                write!(f, "offset {offset} is not on a UTF-8 character boundary")
            }
        }
    }
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Validate this span against `text`.
    pub fn check(&self, text: &str) -> Result<(), SpanFault> {
        if self.start > self.end {
            return Err(SpanFault::Inverted);
        }
        if self.end > text.len() {
            return Err(SpanFault::OutOfBounds { len: text.len() });
        }
        if !text.is_char_boundary(self.start) {
            return Err(SpanFault::NotCharBoundary { offset: self.start });
        }
        if !text.is_char_boundary(self.end) {
            return Err(SpanFault::NotCharBoundary { offset: self.end });
        }
        Ok(())
    }

    /// Whether two spans claim any of the same text.
    ///
    /// Non-empty spans overlap when they share at least one byte. An empty
    /// span is a point; it overlaps an identical point or a non-empty span
    /// that strictly contains it.
    pub fn overlaps(&self, other: &Span) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (false, false) => self.start < other.end && other.start < self.end,
            (true, true) => self.start == other.start,
            (true, false) => other.start < self.start && self.start < other.end,
            (false, true) => self.start < other.start && other.start < self.end,
        }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Range<usize>> for Span {
    fn from(r: Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}
