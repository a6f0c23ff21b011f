//! Store client for the remote document store
//!
//! This module provides the HTTP client speaking the store's REST
//! protocol and the [`DocumentStore`] trait that abstracts it:
//! - Index catalog listing by name pattern
//! - Scroll-paginated match-all search (open / continue / clear)
//!
//! The trait is the seam used by the scanner and coordinator, which lets
//! tests substitute an in-memory store.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde_json::{Value, json};
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, ScanError, StoreError};

/// A single document as returned by the store, unmodified.
pub type Document = Value;

/// One page of scroll results.
#[derive(Debug, Clone)]
pub struct ScrollPage {
    /// Continuation cursor, if the store returned one.
    pub scroll_id: Option<String>,

    /// Documents in this page. An empty page signals exhaustion.
    pub docs: Vec<Document>,
}

/// Operations the export pipeline needs from a document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List the names of all indices matching a glob-style pattern.
    ///
    /// An empty result is valid and is not an error.
    async fn list_indices(&self, pattern: &str) -> Result<Vec<String>>;

    /// Open a scroll over `index` and fetch the first page.
    ///
    /// The query matches all documents; each page holds up to `size`
    /// documents and the cursor stays alive for `scroll` between pages.
    async fn open_scroll(&self, index: &str, size: u32, scroll: &str) -> Result<ScrollPage>;

    /// Fetch the next page for an open scroll cursor.
    ///
    /// Using the cursor resets its expiry.
    async fn continue_scroll(
        &self,
        index: &str,
        scroll_id: &str,
        scroll: &str,
    ) -> Result<ScrollPage>;

    /// Release a scroll cursor's server-side state.
    async fn clear_scroll(&self, scroll_id: &str) -> Result<()>;
}

/// HTTP implementation of [`DocumentStore`].
pub struct StoreClient {
    /// Underlying HTTP client, connection-pooled and shared across workers.
    http: reqwest::Client,

    /// Base URL of the store endpoint.
    base_url: String,
}

impl StoreClient {
    /// Create a new store client from configuration
    ///
    /// # Arguments
    /// * `config` - Resolved settings (host and port are used)
    ///
    /// # Returns
    /// * `Result<Self>` - New client or error
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: config.base_url(),
        })
    }

    /// Base URL of the store endpoint
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Decode a search response body into a [`ScrollPage`]
    async fn scroll_page(response: Response, index: &str) -> Result<ScrollPage> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ScanError::PageFailed {
                index: index.to_string(),
                message: format!("status {status}: {message}"),
            }
            .into());
        }

        let body: Value = response.json().await.map_err(|e| ScanError::Malformed {
            index: index.to_string(),
            message: e.to_string(),
        })?;

        parse_scroll_page(body, index)
    }
}

#[async_trait]
impl DocumentStore for StoreClient {
    async fn list_indices(&self, pattern: &str) -> Result<Vec<String>> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(pattern));
        debug!("Listing indices matching '{}'", pattern);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::BadResponse {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body: Value = response.json().await.map_err(|e| StoreError::BadResponse {
            status: status.as_u16(),
            message: e.to_string(),
        })?;

        parse_index_listing(&body)
    }

    async fn open_scroll(&self, index: &str, size: u32, scroll: &str) -> Result<ScrollPage> {
        let url = format!("{}/{}/_search", self.base_url, urlencoding::encode(index));
        let body = json!({
            "query": { "match_all": {} },
            "size": size,
        });

        debug!("Opening scroll over '{}' (size {}, ttl {})", index, size, scroll);

        let response = self
            .http
            .post(&url)
            .query(&[("scroll", scroll)])
            .json(&body)
            .send()
            .await
            .map_err(|e| ScanError::PageFailed {
                index: index.to_string(),
                message: e.to_string(),
            })?;

        Self::scroll_page(response, index).await
    }

    async fn continue_scroll(
        &self,
        index: &str,
        scroll_id: &str,
        scroll: &str,
    ) -> Result<ScrollPage> {
        let url = format!("{}/_search/scroll", self.base_url);
        let body = json!({
            "scroll": scroll,
            "scroll_id": scroll_id,
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ScanError::PageFailed {
                index: index.to_string(),
                message: e.to_string(),
            })?;

        // The store discards expired or unknown cursors with a 404.
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ScanError::CursorExpired {
                index: index.to_string(),
            }
            .into());
        }

        Self::scroll_page(response, index).await
    }

    async fn clear_scroll(&self, scroll_id: &str) -> Result<()> {
        let url = format!("{}/_search/scroll", self.base_url);
        let body = json!({ "scroll_id": [scroll_id] });

        self.http
            .delete(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        debug!("Cleared scroll cursor");
        Ok(())
    }
}

/// Extract index names from a catalog listing response
///
/// The listing body is a JSON object whose keys are the index names.
fn parse_index_listing(body: &Value) -> Result<Vec<String>> {
    match body.as_object() {
        Some(map) => Ok(map.keys().cloned().collect()),
        None => Err(StoreError::BadResponse {
            status: 200,
            message: "index listing is not a JSON object".to_string(),
        }
        .into()),
    }
}

/// Extract the scroll id and hit documents from a search response
fn parse_scroll_page(mut body: Value, index: &str) -> Result<ScrollPage> {
    let scroll_id = body
        .get("_scroll_id")
        .and_then(Value::as_str)
        .map(str::to_owned);

    let docs = match body.pointer_mut("/hits/hits").map(Value::take) {
        Some(Value::Array(hits)) => hits,
        _ => {
            return Err(ScanError::Malformed {
                index: index.to_string(),
                message: "response is missing hits.hits".to_string(),
            }
            .into());
        }
    };

    Ok(ScrollPage { scroll_id, docs })
}
