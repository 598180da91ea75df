//! RedlineErrorCode trait for host-facing error codes.

/// Every error enum implements this to expose a stable machine-readable code
/// that hosts (CLI, editor plugins, services) can branch on.
pub trait RedlineErrorCode {
    /// Returns the error code string (e.g., "INVALID_SPAN").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const INVALID_SPAN: &str = "INVALID_SPAN";
pub const ORPHAN_FINDING: &str = "ORPHAN_FINDING";
pub const APPLY_CONSISTENCY: &str = "APPLY_CONSISTENCY";
pub const GATE_ERROR: &str = "GATE_ERROR";
pub const REPORT_ERROR: &str = "REPORT_ERROR";
pub const RULE_ERROR: &str = "RULE_ERROR";
pub const CORPUS_ERROR: &str = "CORPUS_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CANCELLED: &str = "CANCELLED";
