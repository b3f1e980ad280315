//! Request-scoped scratch directories.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

use crate::naming::sanitize_filename;
use crate::transcode::TranscodeError;

/// A uniquely named working directory for one request.
///
/// The directory and everything in it is removed when the value is dropped.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Creates a fresh directory `job-<job_id>-XXXXXX` under `root`.
    pub async fn create(root: &Path, job_id: &str) -> Result<Self, TranscodeError> {
        tokio::fs::create_dir_all(root)
            .await
            .map_err(|source| TranscodeError::Staging {
                path: root.to_path_buf(),
                source,
            })?;

        let dir = tempfile::Builder::new()
            .prefix(&format!("job-{}-", job_id))
            .tempdir_in(root)
            .map_err(|source| TranscodeError::Staging {
                path: root.to_path_buf(),
                source,
            })?;

        debug!(path = %dir.path().display(), "Created scratch directory");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path for `filename` inside the directory, reduced to its final component.
    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.dir.path().join(sanitize_filename(filename))
    }

    /// Writes `data` into the directory under `filename`.
    pub async fn stage(&self, filename: &str, data: &[u8]) -> Result<PathBuf, TranscodeError> {
        let path = self.file_path(filename);
        tokio::fs::write(&path, data)
            .await
            .map_err(|source| TranscodeError::Staging {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), bytes = data.len(), "Staged input");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_remove_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::create(root.path(), "abc").await.unwrap();
        let path = scratch.path().to_path_buf();

        assert!(path.is_dir());
        assert!(path.starts_with(root.path()));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("job-abc-"));

        drop(scratch);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_creates_missing_root() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        let scratch = ScratchDir::create(&nested, "nested").await.unwrap();
        assert!(scratch.path().starts_with(&nested));
    }

    #[tokio::test]
    async fn test_directories_are_unique_per_request() {
        let root = tempfile::tempdir().unwrap();
        let a = ScratchDir::create(root.path(), "same").await.unwrap();
        let b = ScratchDir::create(root.path(), "same").await.unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[tokio::test]
    async fn test_stage_writes_bytes_inside_directory() {
        let root = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::create(root.path(), "stage").await.unwrap();

        let path = scratch.stage("../../escape.mp4", b"video").await.unwrap();
        assert_eq!(path, scratch.path().join("escape.mp4"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"video");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unwritable_root_is_staging_error() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let err = ScratchDir::create(&blocker, "x").await.unwrap_err();
        assert!(matches!(err, TranscodeError::Staging { .. }));
    }
}
