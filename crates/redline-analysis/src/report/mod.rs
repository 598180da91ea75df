//! Reporter: groups findings by document, annotates overlap conflicts and
//! renders the result for a human or a downstream approval UI.

pub mod builder;
pub mod line;
pub mod renderers;
pub mod types;

pub use builder::{build_report, ReportBuilder};
pub use line::ReportLine;
pub use renderers::{available_formats, create_renderer, ReportRenderer};
pub use types::{DocumentSummary, Report, ReportEntry};
