//! Configuration system for redline.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod gate_config;
pub mod redline_config;
pub mod report_config;
pub mod rules_config;
pub mod scan_config;

pub use gate_config::GateConfig;
pub use redline_config::{CliOverrides, RedlineConfig};
pub use report_config::ReportConfig;
pub use rules_config::RulesConfig;
pub use scan_config::ScanConfig;
