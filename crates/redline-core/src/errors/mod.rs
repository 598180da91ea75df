//! Error handling for redline.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod apply_error;
pub mod config_error;
pub mod corpus_error;
pub mod error_code;
pub mod gate_error;
pub mod pipeline_error;
pub mod report_error;
pub mod rule_error;
pub mod scan_error;

pub use apply_error::ApplyError;
pub use config_error::ConfigError;
pub use corpus_error::CorpusError;
pub use error_code::RedlineErrorCode;
pub use gate_error::GateError;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use report_error::ReportError;
pub use rule_error::RuleError;
pub use scan_error::ScanError;
