use utoipa::ToSchema;

use crate::infrastructure::media::ffmpeg::EncodeSettings;

pub const DEFAULT_FACTOR: f64 = 1.0;
pub const DEFAULT_BITRATE: u64 = 8_000_000;

/// Multipart form accepted by `POST /upload` (documentation only, the handler
/// reads the fields one by one).
#[allow(dead_code)]
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// Source video.
    #[schema(value_type = String, format = Binary)]
    pub video: Vec<u8>,
    /// Horizontal stretch factor, clamped to at least 1.0.
    #[schema(example = "1.33")]
    pub factor: Option<String>,
    /// Output frame rate, or `copy` to keep the source rate.
    #[schema(example = "copy")]
    pub fps: Option<String>,
    /// Video bitrate in bits per second.
    #[schema(example = "8000000")]
    pub bitrate: Option<String>,
}

/// Raw text fields as they arrived; parsing is lenient and falls back to defaults.
#[derive(Debug, Default)]
pub struct RawParams {
    pub factor: Option<String>,
    pub fps: Option<String>,
    pub bitrate: Option<String>,
}

impl RawParams {
    pub fn set(&mut self, name: &str, value: String) {
        match name {
            "factor" => self.factor = Some(value),
            "fps" => self.fps = Some(value),
            "bitrate" => self.bitrate = Some(value),
            _ => {}
        }
    }

    pub fn into_settings(self) -> EncodeSettings {
        EncodeSettings {
            factor: parse_factor(self.factor.as_deref()),
            fps: parse_fps(self.fps.as_deref()),
            bitrate: parse_bitrate(self.bitrate.as_deref()),
        }
    }
}

pub fn parse_factor(raw: Option<&str>) -> f64 {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|f| f.is_finite())
        .map_or(DEFAULT_FACTOR, |f| f.max(DEFAULT_FACTOR))
}

pub fn parse_fps(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    if raw.eq_ignore_ascii_case("copy") {
        return None;
    }
    raw.parse::<u32>().ok().filter(|fps| *fps > 0)
}

pub fn parse_bitrate(raw: Option<&str>) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|b| *b > 0)
        .unwrap_or(DEFAULT_BITRATE)
}
