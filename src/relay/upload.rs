//! Per-request staging of uploaded samples.
//!
//! Each upload gets its own uniquely named file inside the upload
//! directory. The file is removed when the [`StagedUpload`] is dropped, so
//! every exit path (success, provider failure, panic unwinding) cleans up.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::recognition::RecognitionError;

/// An uploaded sample persisted to disk for the lifetime of one request.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
}

impl StagedUpload {
    /// Write `bytes` to a fresh file in `dir`.
    pub async fn persist(dir: &Path, bytes: &[u8]) -> Result<Self, RecognitionError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| RecognitionError::Upload(format!("create {}: {}", dir.display(), e)))?;

        let file = tempfile::Builder::new()
            .prefix("audio_sample_")
            .suffix(".wav")
            .tempfile_in(dir)
            .map_err(|e| RecognitionError::Upload(format!("create temp file: {}", e)))?;

        tokio::fs::write(file.path(), bytes)
            .await
            .map_err(|e| RecognitionError::Upload(format!("write {}: {}", file.path().display(), e)))?;

        tracing::debug!(path = %file.path().display(), bytes = bytes.len(), "Staged upload");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read the staged sample back into memory.
    pub async fn read(&self) -> Result<Vec<u8>, RecognitionError> {
        tokio::fs::read(self.path())
            .await
            .map_err(|e| RecognitionError::Upload(format!("read {}: {}", self.path().display(), e)))
    }

    /// Delete the staged file now, reporting failures instead of ignoring them.
    pub fn remove(self) -> Result<PathBuf, RecognitionError> {
        let path = self.path().to_path_buf();
        self.file
            .close()
            .map_err(|e| RecognitionError::Upload(format!("remove {}: {}", path.display(), e)))?;
        Ok(path)
    }
}
