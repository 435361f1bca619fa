use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, MultipartError};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("multipart stream interrupted: {0}")]
    Multipart(#[from] MultipartError),
    #[error("failed to write upload to disk: {0}")]
    Io(#[from] std::io::Error),
    #[error("no file field found in multipart request")]
    MissingFile,
    #[error("upload exceeds the {0} byte limit")]
    TooLarge(u64),
}

/// An uploaded file parked on local disk.
///
/// The file is removed exactly once: explicitly through [`TempUpload::remove`],
/// or on drop if the owner bailed out early.
#[derive(Debug)]
pub struct TempUpload {
    path: Option<PathBuf>,
}

impl TempUpload {
    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or(Path::new(""))
    }

    pub async fn remove(mut self) {
        if let Some(path) = self.path.take() {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!("Removed temporary upload {}", path.display()),
                Err(e) => warn!("Failed to remove temporary upload {}: {}", path.display(), e),
            }
        }
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!("Failed to remove temporary upload {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
impl TempUpload {
    pub(crate) fn adopt(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }
}

/// Streams one multipart field into a fresh file under `dir`, giving up once
/// more than `max_bytes` have arrived.
pub async fn stream_to_file(
    mut field: Field<'_>,
    dir: &Path,
    max_bytes: u64,
) -> Result<TempUpload, UploadError> {
    let path = dir.join(format!("upload-{}", Uuid::new_v4().simple()));
    let mut file = File::create(&path).await?;
    // From here on a failure must not leave the partial file behind.
    let upload = TempUpload { path: Some(path) };

    let mut written: u64 = 0;
    while let Some(chunk) = field.chunk().await? {
        written += chunk.len() as u64;
        if written > max_bytes {
            return Err(UploadError::TooLarge(max_bytes));
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    debug!("Stored {} bytes at {}", written, upload.path().display());
    Ok(upload)
}
