//! JSON renderer.

use serde::Serialize;

use redline_core::errors::ReportError;

use super::ReportRenderer;
use crate::report::types::{DocumentSummary, Report};

pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonEntry<'a> {
    line: String,
    #[serde(flatten)]
    finding: &'a redline_core::Finding,
    superseded_by: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    findings: Vec<JsonEntry<'a>>,
    documents: &'a [DocumentSummary],
    total: usize,
    fixable: usize,
    advisory: usize,
    superseded: usize,
}

impl ReportRenderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, report: &Report) -> Result<String, ReportError> {
        let doc = JsonReport {
            findings: report
                .entries
                .iter()
                .map(|e| JsonEntry {
                    line: e.line().to_string(),
                    finding: &e.finding,
                    superseded_by: e.superseded.as_ref().map(|s| s.winner.as_str()),
                })
                .collect(),
            documents: &report.documents,
            total: report.len(),
            fixable: report.fixable_count(),
            advisory: report.advisory_count(),
            superseded: report.superseded_count(),
        };
        serde_json::to_string_pretty(&doc).map_err(|e| ReportError::Render {
            format: self.name().to_string(),
            message: e.to_string(),
        })
    }
}
