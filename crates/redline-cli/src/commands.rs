//! Subcommand execution.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use redline_analysis::corpus::{CorpusProvider, CorpusSink, FsCorpus};
use redline_analysis::gate::{ApprovalGate, Decision, InteractiveGate, PresetGate};
use redline_analysis::mutation::ApplyOutcome;
use redline_analysis::orchestrator::{Orchestrator, RunPhase};
use redline_analysis::report::{available_formats, create_renderer, ReportRenderer};
use redline_analysis::rules::load_rule_set;
use redline_core::config::RedlineConfig;
use redline_core::errors::{ConfigError, PipelineError, RedlineErrorCode};
use redline_core::FindingId;

use crate::cli::{ApprovalArgs, Cli, Commands};

/// How a command ended, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Nothing flagged, or everything approved was applied.
    Clean,
    /// Findings remain for a human to act on.
    Findings,
    /// Some documents could not be read, scanned, applied or written.
    Failed,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Clean => ExitCode::SUCCESS,
            Status::Findings => ExitCode::from(1),
            Status::Failed => ExitCode::from(2),
        }
    }
}

pub fn run(cli: Cli) -> Result<Status, PipelineError> {
    let Cli {
        command,
        root,
        overrides,
        ..
    } = cli;
    let config = RedlineConfig::load(&root, Some(&overrides.to_overrides()))?;
    tracing::debug!(root = %root.display(), "configuration loaded");

    match command {
        Commands::Scan { paths } => scan(&root, config, paths),
        Commands::Apply { paths, approval } => apply(&root, config, paths, approval),
        Commands::Rules => list_rules(&root, &config),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(Status::Clean)
        }
    }
}

fn scan(root: &Path, config: RedlineConfig, paths: Vec<PathBuf>) -> Result<Status, PipelineError> {
    let corpus = FsCorpus::new(root, paths).with_config(&config.scan)?;
    let renderer = renderer(&config)?;
    let orchestrator = Orchestrator::from_config(config, root)?;

    let loaded = corpus.load();
    warn_all(&loaded.errors);
    let prepared = orchestrator.prepare(loaded.data)?;
    warn_all(prepared.errors());
    print!("{}", renderer.render(prepared.report())?);

    let failed = !loaded.errors.is_empty() || !prepared.errors().is_empty();
    Ok(if failed {
        Status::Failed
    } else if prepared.report().is_empty() {
        Status::Clean
    } else {
        Status::Findings
    })
}

fn apply(
    root: &Path,
    config: RedlineConfig,
    paths: Vec<PathBuf>,
    approval: ApprovalArgs,
) -> Result<Status, PipelineError> {
    let mut corpus = FsCorpus::new(root, paths).with_config(&config.scan)?;
    let renderer = renderer(&config)?;
    let orchestrator = Orchestrator::from_config(config, root)?;

    let loaded = corpus.load();
    warn_all(&loaded.errors);
    let prepared = orchestrator.prepare(loaded.data)?;
    warn_all(prepared.errors());

    let result = match prepared.skip_reason() {
        Some(reason) => {
            if !prepared.report().is_empty() {
                print!("{}", renderer.render(prepared.report())?);
            }
            eprintln!("Nothing to apply ({reason}).");
            prepared.skip(reason)
        }
        None => {
            print!("{}", renderer.render(prepared.report())?);
            let mut gate = gate_for(approval);
            let decision = gate.await_decision(prepared.report())?;
            prepared.decide(decision)?
        }
    };

    let mut errors = loaded.errors;
    errors.extend(result.errors);
    let outcome = result.data;

    for applied in &outcome.applied {
        if applied.outcome == ApplyOutcome::Stale {
            eprintln!(
                "{}: text changed since it was scanned; left untouched",
                applied.document
            );
        }
    }
    for id in &outcome.changed {
        let Some(document) = outcome.document(id) else {
            continue;
        };
        if let Err(e) = corpus.commit(document) {
            let e = PipelineError::from(e);
            eprintln!("warning: {}", e.coded_string());
            errors.push(e);
        }
    }

    match outcome.phase {
        RunPhase::Applied => eprintln!(
            "Applied {} edits to {} files ({} superseded).",
            outcome.edits(),
            outcome.changed.len(),
            outcome.superseded().count()
        ),
        RunPhase::Rejected => eprintln!("Rejected; no files changed."),
        RunPhase::GateSkipped => {}
    }

    Ok(if !errors.is_empty() {
        Status::Failed
    } else if outcome.phase == RunPhase::Rejected {
        Status::Findings
    } else {
        Status::Clean
    })
}

fn list_rules(root: &Path, config: &RedlineConfig) -> Result<Status, PipelineError> {
    let rules = load_rule_set(&config.rules, root)?;
    println!("{} ({} rules)", rules.name(), rules.len());
    for detector in rules.iter() {
        let kind = if detector.advisory() { "flag" } else { "fix" };
        println!("  {:<28} {kind:<4}  {}", detector.id(), detector.description());
    }
    Ok(Status::Clean)
}

/// The pre-recorded answer if one was given on the command line, else a
/// prompt on stderr answered from stdin.
fn gate_for(approval: ApprovalArgs) -> Box<dyn ApprovalGate> {
    if approval.yes {
        Box::new(PresetGate::new(Decision::approve_all()))
    } else if approval.no {
        Box::new(PresetGate::new(Decision::reject()))
    } else if !approval.only_rules.is_empty() {
        Box::new(PresetGate::new(Decision::approve_rules(approval.only_rules)))
    } else if !approval.only_findings.is_empty() {
        Box::new(PresetGate::new(Decision::approve_findings(
            approval
                .only_findings
                .iter()
                .map(|id| FindingId::from(id.as_str())),
        )))
    } else {
        Box::new(InteractiveGate::new(io::stdin().lock(), io::stderr()))
    }
}

fn renderer(config: &RedlineConfig) -> Result<Box<dyn ReportRenderer>, ConfigError> {
    let color = config.report.effective_color() && io::stdout().is_terminal();
    let format = config.report.effective_format();
    create_renderer(format, color).ok_or_else(|| ConfigError::ValidationFailed {
        field: "report.format".to_string(),
        message: format!(
            "unknown format '{format}', expected one of {}",
            available_formats().join(", ")
        ),
    })
}

fn warn_all(errors: &[PipelineError]) {
    for e in errors {
        eprintln!("warning: {}", e.coded_string());
    }
}
