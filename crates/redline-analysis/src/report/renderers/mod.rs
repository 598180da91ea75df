//! Report renderers: console, JSON and the plain line contract.

pub mod console;
pub mod json;
pub mod lines;

use redline_core::errors::ReportError;

use super::types::Report;

/// Turns a report into text for a terminal, a file or another program.
pub trait ReportRenderer: Send + Sync {
    fn name(&self) -> &'static str;
    fn render(&self, report: &Report) -> Result<String, ReportError>;
}

/// Create a renderer by format name. `color` only affects `console`.
pub fn create_renderer(format: &str, color: bool) -> Option<Box<dyn ReportRenderer>> {
    match format {
        "console" => Some(Box::new(console::ConsoleRenderer::new(color))),
        "json" => Some(Box::new(json::JsonRenderer)),
        "lines" => Some(Box::new(lines::LinesRenderer)),
        _ => None,
    }
}

/// List all available renderer format names.
pub fn available_formats() -> &'static [&'static str] {
    &["console", "json", "lines"]
}
