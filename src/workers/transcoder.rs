use crate::infrastructure::media::ffmpeg::EncodeSettings;
use crate::infrastructure::media::MediaError;
use crate::modules::transcode::events::JobEvent;
use crate::modules::transcode::model::{TranscodeJob, UploadRequest};
use crate::modules::transcode::progress::ProgressTracker;
use crate::modules::transcode::service::{PublicOrigin, TranscodeService};
use crate::state::AppState;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use url::Url;

const READ_CHUNK: usize = 8 * 1024;

/// Drives one upload from probing to the terminal line.
///
/// Runs detached from the HTTP handler: a client that goes away does not stop
/// the encoder, its events are simply dropped.
pub async fn run_job(
    state: AppState,
    upload: UploadRequest,
    origin: PublicOrigin,
    tx: mpsc::Sender<JobEvent>,
) {
    let UploadRequest {
        original_name,
        file,
        settings,
    } = upload;

    info!("🎬 Transcoding '{}' with {:?}", original_name, settings);

    let job = TranscodeJob::new(&original_name, &state.config.downloads_dir);
    let outcome = process_job(&state, file.path(), &job, &settings, &origin, &tx).await;

    file.remove().await;

    match outcome {
        Ok(url) => {
            info!("✅ Job completed: {}", job.output_path.display());
            let _ = tx.send(JobEvent::Download(url.to_string())).await;
            let _ = tx.send(JobEvent::Done).await;
        }
        Err(e) => {
            error!("❌ Failed to transcode '{}': {:#}", original_name, e);
            let _ = tx.send(JobEvent::Error).await;
        }
    }
}

async fn process_job(
    state: &AppState,
    input: &Path,
    job: &TranscodeJob,
    settings: &EncodeSettings,
    origin: &PublicOrigin,
    tx: &mpsc::Sender<JobEvent>,
) -> anyhow::Result<Url> {
    let duration = state.media.probe_duration(input).await;
    if duration > 0.0 {
        info!("⏱️ Source duration: {:.2}s", duration);
    } else {
        warn!("Duration unknown for {}, progress will not be reported", input.display());
    }

    let session = state
        .media
        .spawn_encoder(input, &job.output_path, settings)?;
    let mut child = session.child;

    let pump = tokio::spawn(pump_progress(session.stderr, duration, tx.clone()));

    let status = child.wait().await.map_err(MediaError::Wait)?;

    match pump.await {
        Ok(Err(e)) => warn!("Reading encoder output failed: {}", e),
        Err(e) => warn!("Progress task ended abnormally: {}", e),
        Ok(Ok(())) => {}
    }

    if !status.success() {
        return Err(MediaError::Failed(status).into());
    }

    Ok(TranscodeService::download_url(origin, &job.output_name)?)
}

/// Reads encoder diagnostics until EOF, forwarding each new percentage.
/// The pipe is drained to EOF even when the receiver is gone or a read fails,
/// otherwise the encoder blocks on a full pipe.
pub async fn pump_progress<R>(
    mut reader: R,
    duration: f64,
    tx: mpsc::Sender<JobEvent>,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut tracker = ProgressTracker::new(duration);
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("Encoder output unreadable, discarding the rest: {}", e);
                let _ = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await;
                return Err(e);
            }
        };
        if n == 0 {
            return Ok(());
        }

        let chunk = String::from_utf8_lossy(&buf[..n]);
        if let Some(pct) = tracker.observe(&chunk) {
            let _ = tx.send(JobEvent::Progress(pct)).await;
        }
    }
}
