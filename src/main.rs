// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so it never mixes with the report on stdout)
// 3. Find the documents, check every reference in them
// 4. Print the report
// 5. Exit with proper code (0 = success, 1 = broken references, 2 = error)
// =============================================================================

use anyhow::Result;
use clap::Parser;
use doc_guardian::checker::{ConcurrencyLimiter, ReferenceChecker};
use doc_guardian::cli::Cli;
use doc_guardian::config::CheckerConfig;
use doc_guardian::report::{self, Summary, EXIT_ERROR};
use doc_guardian::{discover, scan};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins when set; otherwise warnings only, or progress with -v
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let config = CheckerConfig::from_cli(&cli);
    let limiter = ConcurrencyLimiter::new(config.concurrency);
    let checker = ReferenceChecker::new(config, limiter)?;

    let documents = discover::collect_documents(&cli.paths, cli.recursive)?;
    info!(documents = documents.len(), "starting check");

    let reports = scan::check_documents(&checker, documents).await;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        report::write_json(&mut out, &reports)?;
    } else {
        report::write_text(&mut out, &reports, cli.verbose)?;
    }

    Ok(Summary::from_reports(&reports).exit_code())
}
