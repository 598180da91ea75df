//! Approval decisions and their scope.

use std::fmt;

use redline_core::{Finding, FindingId};

/// Which findings an approval covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Rules(Vec<String>),
    Findings(Vec<FindingId>),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Rules(ids) => write!(f, "rules [{}]", ids.join(", ")),
            Self::Findings(ids) => {
                let ids: Vec<&str> = ids.iter().map(FindingId::as_str).collect();
                write!(f, "findings [{}]", ids.join(", "))
            }
        }
    }
}

/// The outcome of a gate. Consumed exactly once by the run it belongs to,
/// so it is deliberately not `Clone`.
#[derive(Debug, PartialEq, Eq)]
pub struct Decision {
    approved: bool,
    scope: Scope,
}

impl Decision {
    pub fn approve_all() -> Self {
        Self {
            approved: true,
            scope: Scope::All,
        }
    }

    pub fn reject() -> Self {
        Self {
            approved: false,
            scope: Scope::All,
        }
    }

    pub fn approve_rules<I, S>(rule_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            approved: true,
            scope: Scope::Rules(rule_ids.into_iter().map(Into::into).collect()),
        }
    }

    pub fn approve_findings<I>(finding_ids: I) -> Self
    where
        I: IntoIterator<Item = FindingId>,
    {
        Self {
            approved: true,
            scope: Scope::Findings(finding_ids.into_iter().collect()),
        }
    }

    pub fn approved(&self) -> bool {
        self.approved
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Approved with a scope narrower than everything.
    pub fn is_partial(&self) -> bool {
        self.approved && self.scope != Scope::All
    }

    /// Whether `finding` may be applied under this decision.
    pub fn admits(&self, finding: &Finding) -> bool {
        if !self.approved {
            return false;
        }
        match &self.scope {
            Scope::All => true,
            Scope::Rules(ids) => ids.iter().any(|id| id == &finding.rule_id),
            Scope::Findings(ids) => ids.contains(&finding.id),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.approved {
            write!(f, "approved ({})", self.scope)
        } else {
            f.write_str("rejected")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_core::{LineRange, Span};

    fn finding(id: &str, rule: &str) -> Finding {
        Finding {
            id: FindingId::new(id),
            document: "d".to_string(),
            span: Span::new(0, 1),
            lines: LineRange { start: 1, end: 1 },
            rule_id: rule.to_string(),
            rule_index: 0,
            rationale: String::new(),
            suggested_replacement: None,
            advisory: false,
            matched: String::new(),
            source_hash: 0,
        }
    }

    #[test]
    fn rejection_admits_nothing() {
        assert!(!Decision::reject().admits(&finding("a", "r")));
    }

    #[test]
    fn rule_scope_filters_by_rule() {
        let decision = Decision::approve_rules(["ai-hype-vocab"]);
        assert!(decision.is_partial());
        assert!(decision.admits(&finding("a", "ai-hype-vocab")));
        assert!(!decision.admits(&finding("b", "ai-filler-phrase")));
    }

    #[test]
    fn finding_scope_filters_by_id() {
        let decision = Decision::approve_findings([FindingId::new("a")]);
        assert!(decision.admits(&finding("a", "x")));
        assert!(!decision.admits(&finding("b", "x")));
        assert_eq!(decision.to_string(), "approved (findings [a])");
    }
}
