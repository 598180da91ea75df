//! Deterministic overlap resolution.

use serde::{Deserialize, Serialize};

use redline_core::types::collections::FxHashMap;
use redline_core::{Finding, FindingId};

/// A finding that lost an overlap conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supersession {
    pub loser: FindingId,
    pub winner: FindingId,
    pub winner_rule: String,
}

/// Non-overlapping winners plus the losers they displaced.
#[derive(Debug, Default)]
pub struct Resolution<'a> {
    /// Winners ordered by document, then span start.
    pub winners: Vec<&'a Finding>,
    pub superseded: Vec<Supersession>,
}

impl Resolution<'_> {
    pub fn winner_of(&self, loser: &FindingId) -> Option<&Supersession> {
        self.superseded.iter().find(|s| &s.loser == loser)
    }
}

/// Resolve overlapping fixable findings.
///
/// Candidates are ranked by rule order, then earliest start, then shortest
/// span, then id. Each candidate is accepted unless it overlaps an already
/// accepted finding in the same document, in which case it is recorded as
/// superseded by the first such winner. Advisory findings take no part.
pub fn resolve<'a, I>(findings: I) -> Resolution<'a>
where
    I: IntoIterator<Item = &'a Finding>,
{
    let mut candidates: Vec<&Finding> = findings.into_iter().filter(|f| f.is_fixable()).collect();
    candidates.sort_by(|a, b| {
        a.rule_index
            .cmp(&b.rule_index)
            .then(a.span.start.cmp(&b.span.start))
            .then(a.span.len().cmp(&b.span.len()))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut accepted: FxHashMap<&str, Vec<&Finding>> = FxHashMap::default();
    let mut superseded = Vec::new();

    for candidate in candidates {
        let taken = accepted.entry(candidate.document.as_str()).or_default();
        match taken.iter().find(|w| w.span.overlaps(&candidate.span)) {
            Some(winner) => superseded.push(Supersession {
                loser: candidate.id.clone(),
                winner: winner.id.clone(),
                winner_rule: winner.rule_id.clone(),
            }),
            None => taken.push(candidate),
        }
    }

    let mut winners: Vec<&Finding> = accepted.into_values().flatten().collect();
    winners.sort_by(|a, b| {
        a.document
            .cmp(&b.document)
            .then(a.span.start.cmp(&b.span.start))
            .then(a.span.end.cmp(&b.span.end))
    });

    Resolution {
        winners,
        superseded,
    }
}
