//! Error handling module for export operations.
//!
//! This module provides the error taxonomy for the export pipeline:
//! - Fatal errors that abort before any work is scheduled (config, catalog)
//! - Per-index errors that are isolated to one export task (scan, write)
//! - Transport-level errors (I/O, HTTP)
//!
//! Failures inside one index's task are caught at the task boundary and
//! converted into a per-index outcome record; they never crash the run.

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, EsdumpError, Result, ScanError, StoreError, WriteError};
