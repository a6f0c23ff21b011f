//! Index Export Library
//!
//! This library provides the core functionality for esdump, a concurrent
//! point-in-time exporter for the indices of a remote document store.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `export`: Export pipeline (scanner, writer, coordinator, progress)
//! - `store`: Document store client and protocol trait
//! - `utils`: Utility functions and helpers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use esdump::{Config, ExportCoordinator, StoreClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::default());
//!     let store = Arc::new(StoreClient::new(&config)?);
//!
//!     let report = ExportCoordinator::new(config, store).run().await?;
//!     println!("Exported {} of {} indices", report.succeeded(), report.total());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{EsdumpError, Result};
pub use export::{ExportArtifact, ExportCoordinator, ExportReport, IndexOutcome};
pub use store::{Document, DocumentStore, ScrollPage, StoreClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
