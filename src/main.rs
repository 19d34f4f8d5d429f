//! tfbump - Terraform and Terragrunt module pin updater CLI tool
//!
//! Reads resolved dependency records and rewrites the matching module
//! declarations in a local project or reports what would change in a
//! remote GitHub repository.

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tfbump::cli::CliArgs;
use tfbump::orchestrator::Orchestrator;
use tfbump::output::{create_formatter, OutputConfig};
use tracing_subscriber::EnvFilter;

/// Exit code when some dependencies or writes failed but the run completed
const PARTIAL_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the level chosen by `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "tfbump=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("tfbump v{}", env!("CARGO_PKG_VERSION"));
        match &args.repo {
            Some(repo) => eprintln!("Source: {} (read-only)", repo),
            None => eprintln!("Target: {}", args.path.display()),
        }
        if args.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    let orchestrator = Orchestrator::new(&args)?;
    let result = orchestrator.run().await?;

    let formatter = create_formatter(OutputConfig::from_args(&args));

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    if result.has_errors() {
        if !args.json {
            for message in result.error_messages() {
                eprintln!("Error: {}", message);
            }
        }
        Ok(ExitCode::from(PARTIAL_FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
