//! Console renderer: human-readable output with optional color codes.

use redline_core::errors::ReportError;

use super::ReportRenderer;
use crate::report::types::{Report, ReportEntry};

/// Console renderer for terminal output.
pub struct ConsoleRenderer {
    pub use_color: bool,
}

impl ConsoleRenderer {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_color {
            format!("{code}{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn entry(&self, entry: &ReportEntry) -> String {
        let finding = &entry.finding;
        let mut out = String::new();
        let marker = if finding.advisory {
            self.paint("\x1b[36m", "?") // cyan
        } else if entry.superseded.is_some() {
            self.paint("\x1b[90m", "~") // gray
        } else {
            self.paint("\x1b[33m", "✎") // yellow
        };
        out.push_str(&format!("  {marker} {}\n", entry.line()));

        let action = match &finding.suggested_replacement {
            _ if finding.advisory => "review (advisory, never applied)".to_string(),
            None => format!("delete {}", excerpt(&finding.matched)),
            Some(r) => format!("{} → {}", excerpt(&finding.matched), excerpt(r)),
        };
        out.push_str(&format!("      {action}\n"));

        if let Some(ref s) = entry.superseded {
            out.push_str(&format!(
                "      {}\n",
                self.paint(
                    "\x1b[90m",
                    &format!("superseded by [{}] ({})", s.winner_rule, s.winner)
                )
            ));
        }
        out
    }
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ReportRenderer for ConsoleRenderer {
    fn name(&self) -> &'static str {
        "console"
    }

    fn render(&self, report: &Report) -> Result<String, ReportError> {
        let mut output = String::new();

        output.push_str("╔══════════════════════════════════════════╗\n");
        output.push_str("║              Redline Report              ║\n");
        output.push_str("╚══════════════════════════════════════════╝\n\n");

        let mut clean = 0usize;
        for summary in &report.documents {
            if summary.findings == 0 {
                clean += 1;
                continue;
            }
            output.push_str(&format!(
                "{} ({} findings, {} fixable, {} advisory",
                self.paint("\x1b[1m", &summary.document),
                summary.findings,
                summary.fixable,
                summary.advisory
            ));
            if summary.superseded > 0 {
                output.push_str(&format!(", {} superseded", summary.superseded));
            }
            output.push_str(")\n");

            for entry in report.entries_for(&summary.document) {
                output.push_str(&self.entry(entry));
            }

            let hashes = if summary.would_change() {
                format!("{} → {}", summary.source_hash, summary.proposed_hash)
            } else {
                format!("{} (unchanged)", summary.source_hash)
            };
            output.push_str(&format!("  {}\n\n", self.paint("\x1b[90m", &hashes)));
        }

        output.push_str(&format!(
            "─── Summary: {} findings ({} fixable, {} advisory, {} superseded) in {} documents, {} clean ───\n",
            report.len(),
            report.fixable_count(),
            report.advisory_count(),
            report.superseded_count(),
            report.documents.len() - clean,
            clean
        ));

        if report.is_empty() {
            output.push_str("Result: CLEAN ✓\n");
        } else {
            output.push_str("Result: CHANGES PROPOSED ✎\n");
        }

        Ok(output)
    }
}

/// Quote a snippet for display, shortening long text.
fn excerpt(text: &str) -> String {
    const MAX: usize = 48;
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' { '⏎' } else { c })
        .collect();
    if flat.chars().count() <= MAX {
        format!("\"{flat}\"")
    } else {
        let head: String = flat.chars().take(MAX - 1).collect();
        format!("\"{head}…\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_marks_newlines_and_truncates() {
        assert_eq!(excerpt("a\nb"), "\"a⏎b\"");
        let long = "x".repeat(100);
        assert!(excerpt(&long).ends_with("…\""));
        assert_eq!(excerpt(&long).chars().count(), 50);
    }
}
