//! Export pipeline for index snapshots
//!
//! This module implements the export pipeline:
//! - Scroll-paginated scanning of one index's full document set
//! - Atomic artifact writing, one JSON file per index
//! - Coordination of per-index export tasks across a bounded worker pool
//! - Progress feedback over the run
//!
//! # Architecture
//!
//! 1. **IndexScanner**: retrieves one index's documents page by page over
//!    a server-side scroll cursor it exclusively owns
//! 2. **writer**: serializes a document set to a timestamped artifact,
//!    written atomically via a temp path
//! 3. **ProgressTracker**: counts finished indices across workers
//!
//! These are orchestrated by the **ExportCoordinator**, which enumerates
//! the catalog once and runs one scan-then-write task per index.

pub mod coordinator;
pub mod progress;
pub mod scanner;
pub mod writer;

pub use coordinator::{ExportCoordinator, ExportReport, IndexOutcome};
pub use progress::ProgressTracker;
pub use scanner::IndexScanner;
pub use writer::{ExportArtifact, artifact_file_name, write_artifact};
