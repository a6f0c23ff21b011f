//! Export coordination across a bounded worker pool
//!
//! The coordinator enumerates the store's indices once, schedules one
//! export task per index onto a pool bounded at the configured worker
//! count, and waits for every task to finish before reporting. Failures
//! inside one index's task are captured in that index's outcome; they
//! never cancel other tasks or crash the run.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{EsdumpError, Result};
use crate::store::DocumentStore;
use crate::utils;

use super::progress::ProgressTracker;
use super::scanner::IndexScanner;
use super::writer::{ExportArtifact, write_artifact};

/// Pattern matching every index in the store.
const MATCH_ALL_PATTERN: &str = "*";

/// Outcome of one index's export task.
#[derive(Debug)]
pub struct IndexOutcome {
    /// Index this outcome belongs to.
    pub index: String,

    /// Artifact stats on success, the specific failure otherwise.
    pub result: Result<ExportArtifact>,
}

/// Aggregated outcomes of one export run.
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Per-index outcomes, one per enumerated index.
    pub outcomes: Vec<IndexOutcome>,
}

impl ExportReport {
    /// Number of indices in the run
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of successfully exported indices
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of failed indices
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    /// Whether every index was exported successfully
    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }

    /// Total documents across all successful exports
    pub fn documents(&self) -> u64 {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|a| a.documents)
            .sum()
    }
}

/// Coordinator for one export run.
pub struct ExportCoordinator {
    config: Arc<Config>,
    store: Arc<dyn DocumentStore>,
    pattern: String,
    show_progress: bool,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    ///
    /// # Arguments
    /// * `config` - Resolved settings, shared read-only with every task
    /// * `store` - Document store client
    pub fn new(config: Arc<Config>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config,
            store,
            pattern: MATCH_ALL_PATTERN.to_string(),
            show_progress: false,
        }
    }

    /// Restrict the run to indices matching a glob-style pattern
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = pattern.to_string();
        self
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Execute the export run
    ///
    /// 1. Enumerate indices; a listing failure is fatal and leaves
    ///    nothing on disk.
    /// 2. Create the endpoint-scoped output directory.
    /// 3. Schedule one task per index on the bounded pool; each task
    ///    scans then writes, and records its own outcome.
    /// 4. Wait for every task; a panicked task becomes a failed outcome.
    ///
    /// # Returns
    /// * `Result<ExportReport>` - Per-index outcomes, or a fatal error
    pub async fn run(&self) -> Result<ExportReport> {
        let indices = self.store.list_indices(&self.pattern).await?;
        info!(
            "Discovered {} indices matching '{}'",
            indices.len(),
            self.pattern
        );

        let export_dir = self.config.export_root();
        tokio::fs::create_dir_all(&export_dir).await?;

        let tracker = Arc::new(ProgressTracker::new(
            indices.len() as u64,
            self.show_progress,
        ));
        let semaphore = Arc::new(Semaphore::new(self.config.workers));

        let mut handles = Vec::with_capacity(indices.len());
        for index in indices {
            let store = Arc::clone(&self.store);
            let config = Arc::clone(&self.config);
            let semaphore = Arc::clone(&semaphore);
            let tracker = Arc::clone(&tracker);
            let dir = export_dir.clone();
            let name = index.clone();

            handles.push((
                index,
                tokio::spawn(async move {
                    let _permit = match semaphore.acquire().await {
                        Ok(permit) => permit,
                        Err(_) => {
                            return IndexOutcome {
                                index: name,
                                result: Err("worker pool closed".into()),
                            };
                        }
                    };

                    let result = export_index(store.as_ref(), &config, &dir, &name).await;

                    match &result {
                        Ok(artifact) => info!(
                            "Exported index '{}' ({} documents) -> {}",
                            name,
                            artifact.documents,
                            artifact.path.display()
                        ),
                        Err(e) => {
                            error!("Export of index '{}' failed [{}]: {}", name, e.kind(), e)
                        }
                    }
                    tracker.index_finished();

                    IndexOutcome {
                        index: name,
                        result,
                    }
                }),
            ));
        }

        // Wait for every submitted task; a panicked task still yields an
        // observable outcome instead of silently vanishing from the report.
        let (names, tasks): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
        let joined = futures::future::join_all(tasks).await;

        let mut report = ExportReport::default();
        for (index, joined) in names.into_iter().zip(joined) {
            match joined {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(e) => {
                    error!("Export task for '{}' did not complete: {}", index, e);
                    report.outcomes.push(IndexOutcome {
                        index,
                        result: Err(EsdumpError::Generic(format!("export task panicked: {e}"))),
                    });
                }
            }
        }

        tracker.finish();
        Ok(report)
    }
}

/// Export one index: scan its full document set, then write the artifact
async fn export_index(
    store: &dyn DocumentStore,
    config: &Config,
    dir: &Path,
    index: &str,
) -> Result<ExportArtifact> {
    let scanner = IndexScanner::new(store, index, config.size, &config.scroll);
    let docs = scanner.collect_all().await?;
    write_artifact(dir, index, utils::time::now_secs(), &docs).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ScanError, StoreError};
    use crate::store::{Document, ScrollPage};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory store with per-index page sequences and scan
    /// instrumentation.
    struct MockStore {
        indices: Vec<String>,
        pages: Mutex<HashMap<String, Vec<Vec<Document>>>>,
        expired: Vec<String>,
        fail_listing: bool,
        active_scans: AtomicUsize,
        max_active_scans: AtomicUsize,
        scan_delay: Duration,
    }

    impl MockStore {
        fn new(fixtures: Vec<(&str, Vec<Vec<Document>>)>) -> Self {
            let indices = fixtures.iter().map(|(name, _)| name.to_string()).collect();
            let pages = fixtures
                .into_iter()
                .map(|(name, pages)| (name.to_string(), pages))
                .collect();
            Self {
                indices,
                pages: Mutex::new(pages),
                expired: Vec::new(),
                fail_listing: false,
                active_scans: AtomicUsize::new(0),
                max_active_scans: AtomicUsize::new(0),
                scan_delay: Duration::from_millis(0),
            }
        }

        fn unavailable() -> Self {
            Self {
                fail_listing: true,
                ..Self::new(vec![])
            }
        }

        fn with_expired(mut self, index: &str) -> Self {
            self.expired.push(index.to_string());
            self
        }

        fn with_scan_delay(mut self, delay: Duration) -> Self {
            self.scan_delay = delay;
            self
        }

        fn next_page(&self, index: &str) -> ScrollPage {
            let mut pages = self.pages.lock().unwrap();
            let queue = pages.get_mut(index);
            let docs = match queue {
                Some(queue) if !queue.is_empty() => queue.remove(0),
                _ => Vec::new(),
            };
            ScrollPage {
                scroll_id: Some(format!("cursor-{index}")),
                docs,
            }
        }

        fn max_concurrent_scans(&self) -> usize {
            self.max_active_scans.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentStore for MockStore {
        async fn list_indices(&self, _pattern: &str) -> crate::error::Result<Vec<String>> {
            if self.fail_listing {
                return Err(StoreError::Unavailable("connection refused".to_string()).into());
            }
            Ok(self.indices.clone())
        }

        async fn open_scroll(
            &self,
            index: &str,
            _size: u32,
            _scroll: &str,
        ) -> crate::error::Result<ScrollPage> {
            let active = self.active_scans.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active_scans.fetch_max(active, Ordering::SeqCst);
            tokio::time::sleep(self.scan_delay).await;
            Ok(self.next_page(index))
        }

        async fn continue_scroll(
            &self,
            index: &str,
            _scroll_id: &str,
            _scroll: &str,
        ) -> crate::error::Result<ScrollPage> {
            if self.expired.iter().any(|i| i == index) {
                return Err(ScanError::CursorExpired {
                    index: index.to_string(),
                }
                .into());
            }
            tokio::time::sleep(self.scan_delay).await;
            Ok(self.next_page(index))
        }

        async fn clear_scroll(&self, _scroll_id: &str) -> crate::error::Result<()> {
            self.active_scans.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn docs(ids: std::ops::Range<u32>) -> Vec<Document> {
        ids.map(|i| json!({ "_id": i.to_string(), "_source": { "n": i } }))
            .collect()
    }

    fn test_config(dir: &Path, workers: usize, size: u32) -> Arc<Config> {
        Arc::new(Config {
            directory: dir.to_path_buf(),
            workers,
            size,
            ..Config::default()
        })
    }

    fn artifact_for<'a>(report: &'a ExportReport, index: &str) -> &'a ExportArtifact {
        report
            .outcomes
            .iter()
            .find(|o| o.index == index)
            .unwrap()
            .result
            .as_ref()
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_exports_paged_and_empty_indices() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MockStore::new(vec![
            ("a", vec![docs(0..2), docs(2..3)]),
            ("b", vec![]),
        ]));
        let config = test_config(dir.path(), 2, 2);

        let coordinator = ExportCoordinator::new(Arc::clone(&config), store);
        let report = coordinator.run().await.unwrap();

        assert_eq!(report.total(), 2);
        assert_eq!(report.succeeded(), 2);
        assert!(report.is_complete());
        assert_eq!(report.documents(), 3);

        // Index "a": 3 documents assembled from pages of 2 and 1.
        let a = artifact_for(&report, "a");
        let parsed: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&a.path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 3);

        // Index "b": empty array artifact.
        let b = artifact_for(&report, "b");
        assert_eq!(std::fs::read_to_string(&b.path).unwrap(), "[]");

        // Artifacts land under the endpoint-scoped directory.
        assert!(a.path.starts_with(config.export_root()));
    }

    #[tokio::test]
    async fn test_run_respects_worker_bound() {
        let dir = tempfile::tempdir().unwrap();
        let fixtures = ["i0", "i1", "i2", "i3", "i4", "i5"]
            .into_iter()
            .map(|name| (name, vec![docs(0..1)]))
            .collect();
        let store = Arc::new(
            MockStore::new(fixtures).with_scan_delay(Duration::from_millis(20)),
        );
        let config = test_config(dir.path(), 2, 10);

        let coordinator = ExportCoordinator::new(config, Arc::clone(&store) as Arc<dyn DocumentStore>);
        let report = coordinator.run().await.unwrap();

        assert_eq!(report.succeeded(), 6);
        assert!(
            store.max_concurrent_scans() <= 2,
            "observed {} concurrent scans",
            store.max_concurrent_scans()
        );
    }

    #[tokio::test]
    async fn test_failed_index_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            MockStore::new(vec![
                ("healthy", vec![docs(0..2), docs(2..4)]),
                ("expiring", vec![docs(0..2), docs(2..4)]),
            ])
            .with_expired("expiring"),
        );
        let config = test_config(dir.path(), 2, 2);

        let coordinator = ExportCoordinator::new(config, store);
        let report = coordinator.run().await.unwrap();

        assert_eq!(report.total(), 2);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_complete());

        // The healthy export completed and produced a valid artifact.
        let healthy = artifact_for(&report, "healthy");
        assert_eq!(healthy.documents, 4);
        let parsed: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&healthy.path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 4);

        let failed = report
            .outcomes
            .iter()
            .find(|o| o.index == "expiring")
            .unwrap();
        assert_eq!(failed.result.as_ref().unwrap_err().kind(), "cursor-expired");
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal_and_creates_nothing() {
        let parent = tempfile::tempdir().unwrap();
        let out = parent.path().join("out");
        let store = Arc::new(MockStore::unavailable());
        let config = test_config(&out, 2, 10);

        let coordinator = ExportCoordinator::new(config, store);
        let err = coordinator.run().await.unwrap_err();

        assert_eq!(err.kind(), "store-unavailable");
        assert!(!out.exists(), "no directories may be created on a fatal listing failure");
    }

    #[tokio::test]
    async fn test_empty_catalog_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MockStore::new(vec![]));
        let config = test_config(dir.path(), 2, 10);

        let coordinator = ExportCoordinator::new(config, store);
        let report = coordinator.run().await.unwrap();

        assert_eq!(report.total(), 0);
        assert!(report.is_complete());
    }
}
