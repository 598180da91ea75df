//! The detector plug-in contract and the ordered RuleSet.

use std::fmt;
use std::sync::Arc;

use redline_core::errors::RuleError;
use redline_core::types::collections::FxHashSet;
use redline_core::{Document, Span};

/// One span flagged by a detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub span: Span,
    /// `None` deletes the span; `Some(text)` replaces it.
    pub replacement: Option<String>,
    /// Per-match detail appended to the rule's rationale.
    pub note: Option<String>,
}

impl RuleMatch {
    pub fn delete(span: Span) -> Self {
        Self {
            span,
            replacement: None,
            note: None,
        }
    }

    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: Some(replacement.into()),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// A pure, stateless span detector.
///
/// External rule authors implement this. `detect` must not depend on anything
/// but the document: the scanner relies on it being referentially transparent.
pub trait Detector: Send + Sync {
    fn id(&self) -> &str;

    fn description(&self) -> &str;

    /// Why a flagged span should change. Must be a single line.
    fn rationale(&self) -> &str;

    /// Advisory detectors flag spans for a human but are never applied.
    fn advisory(&self) -> bool {
        false
    }

    fn detect(&self, document: &Document) -> Vec<RuleMatch>;
}

type DetectFn = dyn Fn(&Document) -> Vec<RuleMatch> + Send + Sync;

/// Adapts a closure to the [`Detector`] contract.
pub struct FnDetector {
    id: String,
    description: String,
    rationale: String,
    advisory: bool,
    detect: Box<DetectFn>,
}

impl FnDetector {
    pub fn new<F>(
        id: impl Into<String>,
        description: impl Into<String>,
        rationale: impl Into<String>,
        detect: F,
    ) -> Self
    where
        F: Fn(&Document) -> Vec<RuleMatch> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            description: description.into(),
            rationale: rationale.into(),
            advisory: false,
            detect: Box::new(detect),
        }
    }

    pub fn advisory(mut self) -> Self {
        self.advisory = true;
        self
    }
}

impl Detector for FnDetector {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn rationale(&self) -> &str {
        &self.rationale
    }

    fn advisory(&self) -> bool {
        self.advisory
    }

    fn detect(&self, document: &Document) -> Vec<RuleMatch> {
        (self.detect)(document)
    }
}

/// An ordered collection of detectors with unique ids.
///
/// Order is significant: when two findings overlap, the detector that comes
/// first wins. A RuleSet is read-only once built and is shared across scan
/// workers behind an `Arc`.
#[derive(Clone, Default)]
pub struct RuleSet {
    name: String,
    detectors: Vec<Arc<dyn Detector>>,
}

impl RuleSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detectors: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a detector. Ids must be unique within the set and use only
    /// ASCII letters, digits and `.` `_` `:` `-`, so every report line
    /// stays parseable.
    pub fn push(&mut self, detector: Arc<dyn Detector>) -> Result<(), RuleError> {
        if !is_valid_rule_id(detector.id()) {
            return Err(RuleError::InvalidRule(format!(
                "rule id {:?} must be non-empty and use only ASCII letters, digits, '.', '_', ':' or '-'",
                detector.id()
            )));
        }
        if self.position(detector.id()).is_some() {
            return Err(RuleError::DuplicateRule {
                rule_id: detector.id().to_string(),
            });
        }
        self.detectors.push(detector);
        Ok(())
    }

    /// Builder form of [`RuleSet::push`].
    pub fn with(mut self, detector: impl Detector + 'static) -> Result<Self, RuleError> {
        self.push(Arc::new(detector))?;
        Ok(self)
    }

    /// Append every detector of `other` after this set's detectors.
    pub fn extend(&mut self, other: RuleSet) -> Result<(), RuleError> {
        for detector in other.detectors {
            self.push(detector)?;
        }
        if self.name.is_empty() {
            self.name = other.name;
        } else if !other.name.is_empty() {
            self.name = format!("{}+{}", self.name, other.name);
        }
        Ok(())
    }

    /// Drop detectors whose id is listed. Returns the ids that matched nothing.
    pub fn disable<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let wanted: FxHashSet<&str> = ids.into_iter().collect();
        let present: FxHashSet<&str> = self.detectors.iter().map(|d| d.id()).collect();
        let mut unknown: Vec<String> = wanted
            .iter()
            .filter(|id| !present.contains(*id))
            .map(|id| id.to_string())
            .collect();
        unknown.sort();
        self.detectors.retain(|d| !wanted.contains(d.id()));
        unknown
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.detectors.iter().position(|d| d.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&dyn Detector> {
        self.detectors
            .iter()
            .find(|d| d.id() == id)
            .map(|d| d.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Detector> {
        self.detectors.iter().map(|d| d.as_ref())
    }

    pub fn ids(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

/// Whether `id` can appear inside the `[...]` of a report line.
pub fn is_valid_rule_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '-'))
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("name", &self.name)
            .field("rules", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(id: &str) -> FnDetector {
        FnDetector::new(id, "test", "test", |_| Vec::new())
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let set = RuleSet::new("t").with(noop("a")).unwrap();
        let err = set.with(noop("a")).unwrap_err();
        assert!(matches!(err, RuleError::DuplicateRule { ref rule_id } if rule_id == "a"));
    }

    #[test]
    fn ids_must_fit_report_lines() {
        for bad in ["team todo", "a]b", "", "tab\tid", "naïve"] {
            let err = RuleSet::new("t").with(noop(bad)).unwrap_err();
            assert!(matches!(err, RuleError::InvalidRule(_)), "{bad:?} accepted");
        }
        let set = RuleSet::new("t").with(noop("team.todo_v2:core-1")).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn extend_preserves_order() {
        let mut first = RuleSet::new("one").with(noop("a")).unwrap();
        let second = RuleSet::new("two")
            .with(noop("b"))
            .unwrap()
            .with(noop("c"))
            .unwrap();
        first.extend(second).unwrap();
        assert_eq!(first.ids(), vec!["a", "b", "c"]);
        assert_eq!(first.name(), "one+two");
        assert_eq!(first.position("c"), Some(2));
    }

    #[test]
    fn disable_reports_unknown_ids() {
        let mut set = RuleSet::new("t")
            .with(noop("a"))
            .unwrap()
            .with(noop("b"))
            .unwrap();
        let unknown = set.disable(["b", "zzz"]);
        assert_eq!(set.ids(), vec!["a"]);
        assert_eq!(unknown, vec!["zzz".to_string()]);
    }
}
