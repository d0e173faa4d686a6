//! Pet Care Advisor binary entry point.
//!
//! Parses one command from the arguments, runs it and prints the result to
//! stdout. All logs go to stderr.
//!
//! Coverage is excluded because the main function wires real backends and
//! the process environment.

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use petcare_advisor::advisor::Advisor;
use petcare_advisor::backends::BackendSelector;
use petcare_advisor::cli::{execute, Command, HELP};
use petcare_advisor::config::Config;
use petcare_advisor::error::AppError;
use petcare_advisor::prompts::Language;
use petcare_advisor::storage::SqliteStorage;

#[cfg_attr(coverage_nightly, coverage(off))]
fn init_logging() {
    let filter = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .parse()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
async fn run(command: Command, cancel: CancellationToken) -> Result<String, AppError> {
    let config = Config::from_env()?;
    tracing::info!(
        database = %config.database_path,
        candidates = config.local_urls.len(),
        cloud = config.has_cloud(),
        timeout_ms = config.generation_timeout_ms,
        "Configuration loaded"
    );

    let storage = SqliteStorage::new(&config.database_path).await?;
    let selector = Arc::new(BackendSelector::from_config(&config)?);
    let advisor = Advisor::new(selector.clone(), storage.clone(), storage);

    let output = execute(
        command,
        &advisor,
        &selector,
        Language::from_code(&config.language),
        cancel,
    )
    .await;

    tracing::debug!(metrics = ?selector.metrics().summary(), "Backend usage");
    output
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n\n{HELP}");
            std::process::exit(2);
        }
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    match run(command, cancel).await {
        Ok(output) => println!("{output}"),
        Err(e) if e.is_cancelled() => {
            eprintln!("{}", e.user_message());
            std::process::exit(130);
        }
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}
