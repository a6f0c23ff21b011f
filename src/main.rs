//! esdump - Index Export Tool
//!
//! Exports the full contents of every index held by a remote document
//! store to local JSON files, one file per index.
//!
//! # Features
//!
//! - Scroll-based pagination, never loading an index in one request
//! - Bounded pool of concurrent per-index export workers
//! - Atomic artifact writes, timestamped per run
//! - Per-index failure isolation with an aggregated outcome report
//!
//! # Usage
//!
//! ```bash
//! esdump --config esdump.toml
//! ```

use std::sync::Arc;
use tracing::Level;

mod cli;
mod config;
mod error;
mod export;
mod store;
mod utils;

use cli::CliInterface;
use error::Result;
use export::{ExportCoordinator, ExportReport};
use store::StoreClient;

/// Application entry point
#[tokio::main]
async fn main() {
    // Initialize the application and handle any errors
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// This function orchestrates the run:
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Construct the store client
/// 4. Run the export coordinator and report the outcome
///
/// # Returns
/// * `Result<()>` - Success or error
async fn run() -> Result<()> {
    // Parse command-line arguments and load configuration
    let cli = CliInterface::new()?;

    // Initialize logging based on verbosity
    initialize_logging(&cli);

    // Print banner if not in quiet mode
    cli.print_banner();

    let config = Arc::new(cli.config().clone());
    let store = Arc::new(StoreClient::new(&config)?);

    let coordinator = ExportCoordinator::new(Arc::clone(&config), store)
        .with_progress(!cli.args().quiet);
    let report = coordinator.run().await?;

    print_summary(&cli, &report);
    Ok(())
}

/// Print the run summary
///
/// Partial success (some indices failed) is reported but is not treated
/// as a run-level fatal error; per-index error lines have already been
/// logged by their tasks.
fn print_summary(cli: &CliInterface, report: &ExportReport) {
    if cli.args().quiet {
        return;
    }

    println!(
        "Exported {} of {} indices ({} documents)",
        report.succeeded(),
        report.total(),
        report.documents()
    );

    if !report.is_complete() {
        println!("{} index export(s) failed; see log output above", report.failed());
    }
}

/// Initialize logging system based on verbosity level
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings
fn initialize_logging(cli: &CliInterface) {
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else if cli.args().quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}
