use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::Command;
use tracing::{info, warn};

pub mod ffmpeg;
pub mod ffprobe;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to capture encoder stderr")]
    MissingStderr,
    #[error("failed to wait for encoder: {0}")]
    Wait(#[source] std::io::Error),
    #[error("encoder exited with {0}")]
    Failed(ExitStatus),
}

/// Locations of the external ffmpeg/ffprobe executables.
#[derive(Clone, Debug)]
pub struct MediaTools {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl MediaTools {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Runs `<tool> -version` for both binaries and logs the outcome.
    /// A missing tool is not fatal at startup: uploads fail with `status:error` instead.
    pub async fn verify(&self) {
        for tool in [&self.ffmpeg, &self.ffprobe] {
            match tool_version(tool).await {
                Some(version) => info!("✅ Found {}: {}", tool.display(), version),
                None => warn!("⚠️ {} is not runnable, transcodes will fail", tool.display()),
            }
        }
    }
}

async fn tool_version(tool: &Path) -> Option<String> {
    let output = Command::new(tool)
        .arg("-version")
        .stdin(Stdio::null())
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
}
