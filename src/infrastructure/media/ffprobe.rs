use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use super::MediaTools;

impl MediaTools {
    /// Container duration of `input` in seconds.
    ///
    /// Best effort: any spawn, exit or parse failure yields `0.0`, which callers
    /// treat as "duration unknown".
    pub async fn probe_duration(&self, input: &Path) -> f64 {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(input)
            .stdin(Stdio::null())
            .output()
            .await;

        let output = match output {
            Ok(o) => o,
            Err(e) => {
                warn!("Failed to run ffprobe on {}: {}", input.display(), e);
                return 0.0;
            }
        };

        if !output.status.success() {
            warn!("ffprobe exited with {} for {}", output.status, input.display());
            return 0.0;
        }

        let duration = parse_duration(&String::from_utf8_lossy(&output.stdout));
        debug!(duration, "Probed {}", input.display());
        duration
    }
}

pub fn parse_duration(stdout: &str) -> f64 {
    match stdout.trim().parse::<f64>() {
        Ok(d) if d.is_finite() && d > 0.0 => d,
        _ => 0.0,
    }
}
