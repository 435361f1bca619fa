use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use tokio::process::{Child, ChildStderr, Command};
use tracing::info;

use super::{MediaError, MediaTools};

pub const VIDEO_CODEC: &str = "libx264";
pub const PIXEL_FORMAT: &str = "yuv420p";
pub const OUTPUT_EXTENSION: &str = "mp4";

/// Encoder parameters taken from the upload form.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeSettings {
    /// Horizontal stretch, always >= 1.0.
    pub factor: f64,
    /// `None` keeps the source frame rate.
    pub fps: Option<u32>,
    /// Target video bitrate in bits/second.
    pub bitrate: u64,
}

#[derive(Debug)]
pub struct EncoderSession {
    pub child: Child,
    pub stderr: ChildStderr,
}

/// Stretches the width by `factor` (kept even for 4:2:0 chroma), keeps the
/// height and resets the sample aspect ratio to square pixels.
pub fn desqueeze_filter(factor: f64) -> String {
    format!("scale=trunc(iw*{factor}/2)*2:ih,setsar=1")
}

pub fn build_args(input: &Path, output: &Path, settings: &EncodeSettings) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.into()];

    if let Some(fps) = settings.fps {
        args.push("-r".into());
        args.push(fps.to_string().into());
    }

    args.extend(
        [
            "-c:v".to_string(),
            VIDEO_CODEC.to_string(),
            "-b:v".to_string(),
            settings.bitrate.to_string(),
            "-pix_fmt".to_string(),
            PIXEL_FORMAT.to_string(),
            "-vf".to_string(),
            desqueeze_filter(settings.factor),
            "-c:a".to_string(),
            "copy".to_string(),
            "-movflags".to_string(),
            "+faststart".to_string(),
        ]
        .map(OsString::from),
    );
    args.push(output.into());

    args
}

impl MediaTools {
    /// Starts ffmpeg writing to `output`. Progress is reported on stderr, which
    /// the caller must drain or the encoder will stall on a full pipe.
    pub fn spawn_encoder(
        &self,
        input: &Path,
        output: &Path,
        settings: &EncodeSettings,
    ) -> Result<EncoderSession, MediaError> {
        let mut child = Command::new(&self.ffmpeg)
            .args(build_args(input, output, settings))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| MediaError::Spawn {
                tool: self.ffmpeg.display().to_string(),
                source,
            })?;

        let stderr = child.stderr.take().ok_or(MediaError::MissingStderr)?;

        info!(
            factor = settings.factor,
            fps = ?settings.fps,
            bitrate = settings.bitrate,
            "🎥 ffmpeg started: {} -> {}",
            input.display(),
            output.display()
        );

        Ok(EncoderSession { child, stderr })
    }
}
