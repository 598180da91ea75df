use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use redline_core::config::CliOverrides;

#[derive(Parser)]
#[command(name = "redline")]
#[command(author, version, about = "Flag text spans, review them, apply only what a human approves", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug logging (overridden by REDLINE_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root: config lookup, relative paths and document ids
    #[arg(long, global = true, default_value = ".", env = "REDLINE_ROOT")]
    pub root: PathBuf,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Flags that override `redline.toml` and `REDLINE_*` variables.
#[derive(Args, Debug, Default)]
pub struct OverrideArgs {
    /// Built-in rule pack to load (repeatable)
    #[arg(long = "pack", global = true)]
    pub packs: Vec<String>,

    /// TOML rule file to load after the packs (repeatable)
    #[arg(long = "rules-file", global = true)]
    pub rule_files: Vec<String>,

    /// Report format
    #[arg(long, global = true, value_enum)]
    pub format: Option<FormatArg>,

    /// Disable ANSI colour in the console report
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Scanner worker threads
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    /// Skip files larger than this many bytes
    #[arg(long, global = true)]
    pub max_file_size: Option<u64>,
}

impl OverrideArgs {
    pub fn to_overrides(&self) -> CliOverrides {
        CliOverrides {
            scan_threads: self.threads,
            scan_max_file_size: self.max_file_size,
            rule_packs: self.packs.clone(),
            rule_files: self.rule_files.clone(),
            report_format: self.format.map(|f| f.as_str().to_string()),
            report_color: self.no_color.then_some(false),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    Console,
    Json,
    Lines,
}

impl FormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Json => "json",
            Self::Lines => "lines",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan and print the report; never modifies files
    Scan {
        /// Files or directories (default: the whole root)
        paths: Vec<PathBuf>,
    },

    /// Scan, ask for approval, and rewrite approved spans
    Apply {
        /// Files or directories (default: the whole root)
        paths: Vec<PathBuf>,

        #[command(flatten)]
        approval: ApprovalArgs,
    },

    /// List the rules the current configuration loads
    Rules,

    /// Print the effective configuration as TOML
    Config,
}

/// Pre-recorded answers for non-interactive runs. Without any of these the
/// prompt is shown on stderr and read from stdin.
#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct ApprovalArgs {
    /// Approve every fixable finding
    #[arg(short, long)]
    pub yes: bool,

    /// Reject everything (report only, exit status reflects findings)
    #[arg(long)]
    pub no: bool,

    /// Approve only findings of these rules (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub only_rules: Vec<String>,

    /// Approve only these finding ids (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub only_findings: Vec<String>,
}
