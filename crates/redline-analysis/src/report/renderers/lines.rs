//! The bare line contract, one finding per line.

use redline_core::errors::ReportError;

use super::ReportRenderer;
use crate::report::types::Report;

pub struct LinesRenderer;

impl ReportRenderer for LinesRenderer {
    fn name(&self) -> &'static str {
        "lines"
    }

    fn render(&self, report: &Report) -> Result<String, ReportError> {
        let mut output = String::new();
        for line in report.lines() {
            output.push_str(&line);
            output.push('\n');
        }
        Ok(output)
    }
}
