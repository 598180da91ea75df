//! Top-level redline configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::report_config::REPORT_FORMATS;
use super::{GateConfig, ReportConfig, RulesConfig, ScanConfig};
use crate::errors::ConfigError;

/// Project config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "redline.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`REDLINE_*`)
/// 3. Project config (`redline.toml` in project root)
/// 4. User config (`~/.redline/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RedlineConfig {
    pub scan: ScanConfig,
    pub rules: RulesConfig,
    pub gate: GateConfig,
    pub report: ReportConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub scan_threads: Option<usize>,
    pub scan_max_file_size: Option<u64>,
    pub rule_packs: Vec<String>,
    pub rule_files: Vec<String>,
    pub report_format: Option<String>,
    pub report_color: Option<bool>,
}

impl RedlineConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: RedlineConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &RedlineConfig) -> Result<(), ConfigError> {
        if config.scan.threads == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.threads".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.scan.max_file_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.max_file_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(ref format) = config.report.format {
            if !REPORT_FORMATS.contains(&format.as_str()) {
                return Err(ConfigError::ValidationFailed {
                    field: "report.format".to_string(),
                    message: format!(
                        "unknown format '{format}', expected one of {}",
                        REPORT_FORMATS.join(", ")
                    ),
                });
            }
        }
        if config.rules.packs.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed {
                field: "rules.packs".to_string(),
                message: "pack names must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut RedlineConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: RedlineConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut RedlineConfig, other: &RedlineConfig) {
        // Scan
        if other.scan.threads.is_some() {
            base.scan.threads = other.scan.threads;
        }
        if other.scan.max_file_size.is_some() {
            base.scan.max_file_size = other.scan.max_file_size;
        }
        if !other.scan.include.is_empty() {
            base.scan.include = other.scan.include.clone();
        }
        if !other.scan.exclude.is_empty() {
            base.scan.exclude = other.scan.exclude.clone();
        }
        if other.scan.respect_gitignore.is_some() {
            base.scan.respect_gitignore = other.scan.respect_gitignore;
        }

        // Rules
        if !other.rules.packs.is_empty() {
            base.rules.packs = other.rules.packs.clone();
        }
        if !other.rules.files.is_empty() {
            base.rules.files = other.rules.files.clone();
        }
        if !other.rules.disabled.is_empty() {
            base.rules.disabled = other.rules.disabled.clone();
        }

        // Gate
        if other.gate.allow_partial.is_some() {
            base.gate.allow_partial = other.gate.allow_partial;
        }
        if other.gate.skip_when_empty.is_some() {
            base.gate.skip_when_empty = other.gate.skip_when_empty;
        }

        // Report
        if other.report.format.is_some() {
            base.report.format = other.report.format.clone();
        }
        if other.report.color.is_some() {
            base.report.color = other.report.color;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `REDLINE_SCAN_THREADS`, `REDLINE_GATE_ALLOW_PARTIAL`, etc.
    fn apply_env_overrides(config: &mut RedlineConfig) {
        if let Ok(val) = std::env::var("REDLINE_SCAN_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.scan.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("REDLINE_SCAN_MAX_FILE_SIZE") {
            if let Ok(v) = val.parse::<u64>() {
                config.scan.max_file_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("REDLINE_RULES_PACKS") {
            let packs: Vec<String> = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !packs.is_empty() {
                config.rules.packs = packs;
            }
        }
        if let Ok(val) = std::env::var("REDLINE_GATE_ALLOW_PARTIAL") {
            if let Ok(v) = val.parse::<bool>() {
                config.gate.allow_partial = Some(v);
            }
        }
        if let Ok(val) = std::env::var("REDLINE_REPORT_FORMAT") {
            config.report.format = Some(val);
        }
        if let Ok(val) = std::env::var("REDLINE_REPORT_COLOR") {
            if let Ok(v) = val.parse::<bool>() {
                config.report.color = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut RedlineConfig, cli: &CliOverrides) {
        if let Some(v) = cli.scan_threads {
            config.scan.threads = Some(v);
        }
        if let Some(v) = cli.scan_max_file_size {
            config.scan.max_file_size = Some(v);
        }
        if !cli.rule_packs.is_empty() {
            config.rules.packs = cli.rule_packs.clone();
        }
        if !cli.rule_files.is_empty() {
            config.rules.files = cli.rule_files.clone();
        }
        if let Some(ref v) = cli.report_format {
            config.report.format = Some(v.clone());
        }
        if let Some(v) = cli.report_color {
            config.report.color = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the user-level config directory: `~/.redline/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".redline"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
