//! Line-oriented approval prompt over any reader/writer pair.

use std::io::{BufRead, Write};

use redline_core::errors::GateError;
use redline_core::FindingId;

use super::decision::Decision;
use super::ApprovalGate;
use crate::report::Report;

const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Asks a human on `input`/`output`.
///
/// Accepted answers: `y`/`yes` approves everything, `n`/`no` or an empty line
/// rejects, `r <rule ids>` approves the listed rules and `f <finding ids>` the
/// listed findings. End of input rejects.
pub struct InteractiveGate<R, W> {
    input: R,
    output: W,
    max_attempts: usize,
}

impl<R: BufRead, W: Write> InteractiveGate<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn list_findings(&mut self, report: &Report) -> std::io::Result<()> {
        writeln!(self.output, "Fixable findings:")?;
        for entry in report.entries.iter().filter(|e| e.finding.is_fixable()) {
            let note = if entry.superseded.is_some() {
                " (superseded)"
            } else {
                ""
            };
            writeln!(self.output, "  {} {}{note}", entry.finding.id, entry.line())?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> ApprovalGate for InteractiveGate<R, W> {
    fn await_decision(&mut self, report: &Report) -> Result<Decision, GateError> {
        self.list_findings(report)?;

        for _ in 0..self.max_attempts {
            write!(
                self.output,
                "Apply {} fixable findings? [y]es / [n]o / r <rule ids> / f <finding ids>: ",
                report.fixable_count()
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                tracing::info!("approval prompt reached end of input; rejecting");
                return Ok(Decision::reject());
            }

            match parse_answer(&line) {
                Some(decision) => return Ok(decision),
                None => writeln!(self.output, "Unrecognised answer: {}", line.trim())?,
            }
        }

        Err(GateError::InvalidResponse {
            attempts: self.max_attempts,
        })
    }
}

fn parse_answer(line: &str) -> Option<Decision> {
    let line = line.trim();
    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let ids: Vec<&str> = rest
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    match head.to_ascii_lowercase().as_str() {
        "y" | "yes" if ids.is_empty() => Some(Decision::approve_all()),
        "" | "n" | "no" if ids.is_empty() => Some(Decision::reject()),
        "r" | "rules" if !ids.is_empty() => Some(Decision::approve_rules(ids)),
        "f" | "findings" if !ids.is_empty() => {
            Some(Decision::approve_findings(ids.into_iter().map(FindingId::from)))
        }
        _ => None,
    }
}
