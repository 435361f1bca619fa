use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use uuid::Uuid;

use crate::common::upload::TempUpload;
use crate::infrastructure::media::ffmpeg::{EncodeSettings, OUTPUT_EXTENSION};

/// A fully received upload, ready to be transcoded.
#[derive(Debug)]
pub struct UploadRequest {
    pub original_name: String,
    pub file: TempUpload,
    pub settings: EncodeSettings,
}

/// Where the encoder writes and under which name the result is served.
#[derive(Debug, Clone)]
pub struct TranscodeJob {
    pub output_name: String,
    pub output_path: PathBuf,
}

impl TranscodeJob {
    pub fn new(original_name: &str, downloads_dir: &Path) -> Self {
        let output_name = output_file_name(original_name, &uniqueness_token());
        Self {
            output_path: downloads_dir.join(&output_name),
            output_name,
        }
    }
}

/// Millisecond timestamp plus a random suffix; the timestamp alone collides for
/// same-named uploads started within one millisecond.
pub fn uniqueness_token() -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{millis}-{}", &suffix[..8])
}

/// Base name of the upload without its extension, restricted to `[A-Za-z0-9_-]`.
pub fn sanitize_base_name(original_name: &str) -> String {
    let file_name = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    let cleaned: String = file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    if cleaned.trim_matches('_').is_empty() {
        "video".to_string()
    } else {
        cleaned
    }
}

pub fn output_file_name(original_name: &str, token: &str) -> String {
    format!(
        "{}_desqueezed_{}.{}",
        sanitize_base_name(original_name),
        token,
        OUTPUT_EXTENSION
    )
}
