use std::process::ExitCode;

use clap::Parser;

use redline_cli::Cli;
use redline_core::errors::RedlineErrorCode;
use redline_core::tracing::{init_tracing, init_tracing_with_filter};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose && std::env::var_os("REDLINE_LOG").is_none() {
        init_tracing_with_filter("redline=debug");
    } else {
        init_tracing();
    }

    match redline_cli::run(cli) {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("error: {}", e.coded_string());
            ExitCode::from(2)
        }
    }
}
