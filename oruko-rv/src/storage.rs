//! Durable storage for reviewer-recorded audio
//!
//! Blobs land under the root folder's `review_audio/` directory at a path
//! keyed by submission id plus a millisecond timestamp, so retries never
//! overwrite an earlier take.

use std::path::PathBuf;

use oruko_common::{time, Result};

/// Stores review audio under one folder
#[derive(Debug, Clone)]
pub struct AudioStore {
    folder: PathBuf,
}

impl AudioStore {
    pub fn new(folder: PathBuf) -> Self {
        Self { folder }
    }

    /// Write an audio blob for a submission; returns the stored reference
    /// (relative to the root folder) to record as the submission's audio_url.
    pub async fn store_submission_audio(&self, submission_id: i64, bytes: &[u8]) -> Result<String> {
        tokio::fs::create_dir_all(&self.folder).await?;

        let file_name = format!("submission_{}_{}.webm", submission_id, time::now_ms());
        let path = self.folder.join(&file_name);
        tokio::fs::write(&path, bytes).await?;

        Ok(format!("review_audio/{}", file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_writes_blob_and_returns_reference() {
        let dir = tempfile::tempdir().unwrap();
        let store = AudioStore::new(dir.path().join("review_audio"));

        let url = store.store_submission_audio(42, b"RIFFdata").await.unwrap();
        assert!(url.starts_with("review_audio/submission_42_"));
        assert!(url.ends_with(".webm"));

        let file_name = url.strip_prefix("review_audio/").unwrap();
        let stored = std::fs::read(dir.path().join("review_audio").join(file_name)).unwrap();
        assert_eq!(stored, b"RIFFdata");
    }

    #[tokio::test]
    async fn test_retries_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = AudioStore::new(dir.path().to_path_buf());

        let first = store.store_submission_audio(7, b"take one").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.store_submission_audio(7, b"take two").await.unwrap();

        assert_ne!(first, second, "Timestamped paths must not collide across retries");
    }
}
