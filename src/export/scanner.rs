//! Scroll-based document scanning for export operations
//!
//! This module retrieves the complete document set of one index through
//! repeated bounded-size page requests against a server-side scroll
//! cursor, without loading the whole result set in a single request.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::store::{Document, DocumentStore};

/// Batch-at-a-time scanner over one index's documents.
///
/// Each scanner owns exactly one scroll cursor for its lifetime. Pages
/// are fetched strictly in cursor order; every page request refreshes
/// the cursor's expiry on the server. The scan is finite and not
/// restartable: a failed scan is not retried from page 1.
///
/// The cursor is released on every exit path, including early failure.
pub struct IndexScanner<'a> {
    store: &'a dyn DocumentStore,
    index: String,
    size: u32,
    scroll: String,
    scroll_id: Option<String>,
    opened: bool,
    closed: bool,
    total_fetched: u64,
}

impl<'a> IndexScanner<'a> {
    /// Create a new scanner
    ///
    /// The initial page request is deferred until the first call to
    /// [`IndexScanner::next_batch`]; each call opens a fresh cursor.
    ///
    /// # Arguments
    /// * `store` - Document store to scan
    /// * `index` - Index name
    /// * `size` - Maximum documents per page
    /// * `scroll` - Cursor lifetime between page requests
    pub fn new(store: &'a dyn DocumentStore, index: &str, size: u32, scroll: &str) -> Self {
        Self {
            store,
            index: index.to_string(),
            size,
            scroll: scroll.to_string(),
            scroll_id: None,
            opened: false,
            closed: false,
            total_fetched: 0,
        }
    }

    /// Fetch the next page of documents
    ///
    /// # Returns
    /// * `Result<Option<Vec<Document>>>` - Next page, or None when exhausted
    pub async fn next_batch(&mut self) -> Result<Option<Vec<Document>>> {
        if self.closed {
            return Ok(None);
        }

        let page = if !self.opened {
            self.opened = true;
            match self
                .store
                .open_scroll(&self.index, self.size, &self.scroll)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    self.release().await;
                    return Err(e);
                }
            }
        } else {
            let scroll_id = match self.scroll_id.as_deref() {
                Some(id) => id.to_string(),
                // The store handed back documents without a continuation
                // cursor; there is nothing left to fetch.
                None => {
                    self.closed = true;
                    return Ok(None);
                }
            };

            match self
                .store
                .continue_scroll(&self.index, &scroll_id, &self.scroll)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    self.release().await;
                    return Err(e);
                }
            }
        };

        self.scroll_id = page.scroll_id;

        if page.docs.is_empty() {
            debug!(
                "Scan of '{}' exhausted after {} documents",
                self.index, self.total_fetched
            );
            self.release().await;
            Ok(None)
        } else {
            self.total_fetched += page.docs.len() as u64;
            debug!(
                "Fetched page of {} documents from '{}' (total: {})",
                page.docs.len(),
                self.index,
                self.total_fetched
            );
            Ok(Some(page.docs))
        }
    }

    /// Drain the scanner into a single document set
    ///
    /// The resulting collection is unordered; page boundaries carry no
    /// meaning to the caller.
    ///
    /// # Returns
    /// * `Result<Vec<Document>>` - All documents in the index
    pub async fn collect_all(mut self) -> Result<Vec<Document>> {
        let mut docs = Vec::new();
        while let Some(batch) = self.next_batch().await? {
            docs.extend(batch);
        }
        Ok(docs)
    }

    /// Number of documents fetched so far
    pub fn total_fetched(&self) -> u64 {
        self.total_fetched
    }

    /// Release the scroll cursor's server-side state, best effort
    async fn release(&mut self) {
        self.closed = true;
        if let Some(id) = self.scroll_id.take() {
            if let Err(e) = self.store.clear_scroll(&id).await {
                warn!("Failed to clear scroll cursor for '{}': {}", self.index, e);
            } else {
                info!(
                    "Closed scan of '{}' after fetching {} documents",
                    self.index, self.total_fetched
                );
            }
        }
    }

    /// Explicitly close the scan, clearing any open cursor
    pub async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.release().await;
        }
        Ok(())
    }
}

impl Drop for IndexScanner<'_> {
    fn drop(&mut self) {
        // The network clear cannot run here; release() covers every
        // normal exit path, so this only flags scanner misuse.
        if !self.closed && self.scroll_id.is_some() {
            debug!("IndexScanner for '{}' dropped without explicit close", self.index);
        }
    }
}
