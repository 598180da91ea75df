//! Report rendering configuration.

use serde::{Deserialize, Serialize};

/// Renderer names accepted by `report.format`.
pub const REPORT_FORMATS: &[&str] = &["console", "json", "lines"];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// "console" | "json" | "lines". Default: "console".
    pub format: Option<String>,
    /// ANSI colour in console output. Default: true.
    pub color: Option<bool>,
}

impl ReportConfig {
    pub fn effective_format(&self) -> &str {
        self.format.as_deref().unwrap_or("console")
    }

    pub fn effective_color(&self) -> bool {
        self.color.unwrap_or(true)
    }
}
