//! The one-line-per-finding textual contract:
//! `<document>:<lineStart>-<lineEnd> [<ruleId>] <rationale>`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use redline_core::errors::ReportError;
use redline_core::Finding;

static LINE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?P<doc>.+?):(?P<start>\d+)-(?P<end>\d+) \[(?P<rule>[^\]\s]+)\](?: (?P<rationale>.*))?$").ok()
});

/// A parsed or to-be-formatted report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub document: String,
    pub line_start: u32,
    pub line_end: u32,
    pub rule_id: String,
    pub rationale: String,
}

impl ReportLine {
    pub fn from_finding(finding: &Finding) -> Self {
        Self {
            document: escape_breaks(&finding.document),
            line_start: finding.lines.start,
            line_end: finding.lines.end,
            rule_id: finding.rule_id.clone(),
            rationale: flatten(&finding.rationale),
        }
    }

    pub fn parse(line: &str) -> Result<Self, ReportError> {
        let malformed = || ReportError::MalformedLine {
            line: line.to_string(),
        };
        let re = LINE_RE.as_ref().ok_or_else(malformed)?;
        let caps = re.captures(line).ok_or_else(malformed)?;

        let number = |name: &str| -> Result<u32, ReportError> {
            caps.name(name)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(malformed)
        };

        Ok(Self {
            document: caps["doc"].to_string(),
            line_start: number("start")?,
            line_end: number("end")?,
            rule_id: caps["rule"].to_string(),
            rationale: caps
                .name("rationale")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{} [{}] {}",
            self.document, self.line_start, self.line_end, self.rule_id, self.rationale
        )
    }
}

impl FromStr for ReportLine {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Collapse any line breaks so the contract stays one line per finding.
fn flatten(text: &str) -> String {
    if text.contains(['\n', '\r']) {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        text.to_string()
    }
}

/// Document ids are identities, so line breaks are escaped rather than
/// collapsed.
fn escape_breaks(text: &str) -> String {
    if text.contains(['\n', '\r']) {
        text.replace('\n', "\\n").replace('\r', "\\r")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_windows_style_paths() {
        let line = ReportLine::parse(r"C:\src\main.rs:3-5 [transient-moved] Comment describes a move").unwrap();
        assert_eq!(line.document, r"C:\src\main.rs");
        assert_eq!((line.line_start, line.line_end), (3, 5));
        assert_eq!(line.rule_id, "transient-moved");
        assert_eq!(line.rationale, "Comment describes a move");
    }

    #[test]
    fn rejects_lines_without_location() {
        assert!(matches!(
            ReportLine::parse("just some text"),
            Err(ReportError::MalformedLine { .. })
        ));
    }

    #[test]
    fn display_and_parse_agree() {
        let line = ReportLine {
            document: "docs/a.md".to_string(),
            line_start: 1,
            line_end: 1,
            rule_id: "ai-hype-vocab".to_string(),
            rationale: "Plain words read better ('leverage' -> 'use')".to_string(),
        };
        assert_eq!(line.to_string().parse::<ReportLine>().unwrap(), line);
    }

    #[test]
    fn document_breaks_are_escaped() {
        assert_eq!(escape_breaks("odd\nname\r.rs"), "odd\\nname\\r.rs");
        assert_eq!(escape_breaks(r"C:\src\a.rs"), r"C:\src\a.rs");
    }

    #[test]
    fn flatten_removes_breaks() {
        assert_eq!(flatten("a\nb\r\n c"), "a b c");
    }
}
