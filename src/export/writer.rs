//! Artifact writing for export operations
//!
//! This module serializes one index's document set to a single JSON
//! file. Writes are all-or-nothing: the payload goes to a temp path in
//! the target directory and is renamed into place only once fully
//! flushed, so a failed write never leaves a file claiming to be a
//! complete artifact.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::error::{Result, WriteError};
use crate::store::Document;

/// A successfully written export artifact.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// Final path of the artifact file.
    pub path: PathBuf,

    /// Number of documents in the artifact.
    pub documents: u64,

    /// Serialized size in bytes.
    pub bytes: u64,
}

/// Derive the artifact file name for one export
///
/// Timestamp-based naming keeps repeated exports of the same index from
/// overwriting each other; collisions between simultaneous runs are an
/// accepted limitation.
///
/// # Arguments
/// * `index` - Index name
/// * `timestamp` - Unix timestamp in seconds
///
/// # Returns
/// * `String` - File name of the form `<index>_<timestamp>.json`
pub fn artifact_file_name(index: &str, timestamp: i64) -> String {
    format!("{index}_{timestamp}.json")
}

/// Write one index's document set as a JSON array
///
/// The target directory must already exist. On failure no file exists
/// under the final name and the temp file is removed.
///
/// # Arguments
/// * `dir` - Directory receiving the artifact (endpoint-scoped)
/// * `index` - Index name
/// * `timestamp` - Unix timestamp used in the artifact name
/// * `docs` - Documents to serialize, written as retrieved
///
/// # Returns
/// * `Result<ExportArtifact>` - Artifact stats or error
pub async fn write_artifact(
    dir: &Path,
    index: &str,
    timestamp: i64,
    docs: &[Document],
) -> Result<ExportArtifact> {
    let file_name = artifact_file_name(index, timestamp);
    let final_path = dir.join(&file_name);
    let tmp_path = dir.join(format!("{file_name}.tmp"));

    let payload = serde_json::to_vec(docs).map_err(|e| WriteError::Serialize(e.to_string()))?;

    match write_and_rename(&tmp_path, &final_path, &payload).await {
        Ok(()) => {
            debug!(
                "Wrote artifact {} ({} documents, {} bytes)",
                final_path.display(),
                docs.len(),
                payload.len()
            );
            Ok(ExportArtifact {
                path: final_path,
                documents: docs.len() as u64,
                bytes: payload.len() as u64,
            })
        }
        Err(e) => {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            Err(e)
        }
    }
}

async fn write_and_rename(tmp_path: &Path, final_path: &Path, payload: &[u8]) -> Result<()> {
    let file = File::create(tmp_path).await.map_err(|e| WriteError::Create {
        path: tmp_path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut writer = BufWriter::with_capacity(8 * 1024 * 1024, file);
    writer.write_all(payload).await.map_err(|e| WriteError::Io {
        path: tmp_path.display().to_string(),
        message: e.to_string(),
    })?;
    writer.flush().await.map_err(|e| WriteError::Io {
        path: tmp_path.display().to_string(),
        message: e.to_string(),
    })?;

    tokio::fs::rename(tmp_path, final_path)
        .await
        .map_err(|e| WriteError::Rename {
            path: final_path.display().to_string(),
            message: e.to_string(),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_write_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let docs = vec![
            json!({ "_id": "1", "_source": { "name": "alice" } }),
            json!({ "_id": "2", "_source": { "name": "bob" } }),
        ];

        let artifact = write_artifact(dir.path(), "users", 1700000000, &docs)
            .await
            .unwrap();

        assert_eq!(artifact.documents, 2);
        assert_eq!(
            artifact.path.file_name().unwrap(),
            "users_1700000000.json"
        );

        let content = tokio::fs::read_to_string(&artifact.path).await.unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, docs);
    }

    #[test]
    fn test_write_empty_index_produces_empty_array() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let artifact = write_artifact(dir.path(), "empty", 1700000000, &[])
                .await
                .unwrap();

            assert_eq!(artifact.documents, 0);
            let content = tokio::fs::read_to_string(&artifact.path).await.unwrap();
            assert_eq!(content, "[]");
        });
    }

    #[tokio::test]
    async fn test_distinct_timestamps_never_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let docs = vec![json!({ "_id": "1" })];

        let first = write_artifact(dir.path(), "logs", 100, &docs).await.unwrap();
        let second = write_artifact(dir.path(), "logs", 101, &docs).await.unwrap();

        assert_ne!(first.path, second.path);
        assert!(first.path.exists());
        assert!(second.path.exists());
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), "clean", 100, &[json!({ "_id": "1" })])
            .await
            .unwrap();

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["clean_100.json"]);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let result = write_artifact(&missing, "broken", 100, &[]).await;
        assert!(result.is_err());
        assert!(!missing.join("broken_100.json").exists());
    }

    #[test]
    fn test_artifact_file_name() {
        assert_eq!(artifact_file_name("users", 1700000000), "users_1700000000.json");
    }
}
