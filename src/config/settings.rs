use std::path::PathBuf;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::env::{self, EnvKey};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 4 * 1024 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid CORS origin `{0}`")]
    InvalidOrigin(String),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub upload_dir: PathBuf,
    pub downloads_dir: PathBuf,
    pub cors_origins: Vec<HeaderValue>,
    pub max_upload_bytes: u64,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let default_upload_dir = std::env::temp_dir().join("desqueeze-uploads");

        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, DEFAULT_PORT),
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg").into(),
            ffprobe_path: env::get_or(EnvKey::FfprobePath, "ffprobe").into(),
            upload_dir: env::get(EnvKey::UploadDir)
                .map(PathBuf::from)
                .unwrap_or(default_upload_dir),
            downloads_dir: env::get_or(EnvKey::DownloadsDir, "downloads").into(),
            cors_origins: parse_origins(&env::get_or(EnvKey::CorsOrigins, DEFAULT_CORS_ORIGINS))?,
            max_upload_bytes: env::get_parsed(EnvKey::MaxUploadBytes, DEFAULT_MAX_UPLOAD_BYTES),
        })
    }
}

/// Splits a comma separated origin list, skipping blanks. Only explicit
/// origins are accepted, `*` is rejected.
pub fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| match origin {
            "*" => Err(ConfigError::InvalidOrigin(origin.to_string())),
            _ => HeaderValue::from_str(origin)
                .map_err(|_| ConfigError::InvalidOrigin(origin.to_string())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_origin_list() {
        let origins = parse_origins(DEFAULT_CORS_ORIGINS).unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "http://localhost:3000");
        assert_eq!(origins[1], "http://localhost:5173");
    }

    #[test]
    fn skips_blank_entries() {
        let origins = parse_origins(" https://a.example , ,https://b.example,").unwrap();
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn rejects_wildcard() {
        assert!(parse_origins("http://localhost:3000,*").is_err());
    }

    #[test]
    fn rejects_origin_with_control_characters() {
        let err = parse_origins("https://ok.example,bad\norigin").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOrigin(o) if o == "bad\norigin"));
    }
}
