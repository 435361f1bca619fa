use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures_util::stream;
use tokio::sync::mpsc;
use tracing::error;

use super::dto::UploadForm;
use super::events::JobEvent;
use super::service::{PublicOrigin, TranscodeService};
use crate::state::AppState;

// A job emits at most 101 progress lines plus two terminal lines.
const EVENT_BUFFER: usize = 128;

/// Upload a video and stream its desqueeze progress
///
/// The response is a chunked `text/plain` body of newline-terminated lines:
/// `progress:<0-100>` while encoding, then either `download:<url>` followed by
/// `status:done`, or a single `status:error`.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Line-oriented progress stream", body = String, content_type = "text/plain")
    ),
    tag = "Transcode"
)]
pub async fn upload_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    multipart: Multipart,
) -> impl IntoResponse {
    let origin = PublicOrigin::from_request(&headers, &uri, state.config.server_port);
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);

    match TranscodeService::receive_upload(&state, multipart).await {
        Ok(upload) => {
            tokio::spawn(crate::workers::transcoder::run_job(state, upload, origin, tx));
        }
        Err(e) => {
            error!("Upload rejected: {}", e);
            let _ = tx.try_send(JobEvent::Error);
        }
    }

    progress_response(rx)
}

/// Streams events as protocol lines, ending after the first terminal line or
/// when the job drops its sender.
pub fn progress_response(rx: mpsc::Receiver<JobEvent>) -> Response {
    let lines = stream::unfold((rx, false), |(mut rx, finished)| async move {
        if finished {
            return None;
        }
        let event = rx.recv().await?;
        let finished = event.is_terminal();
        Some((Ok::<_, Infallible>(Bytes::from(event.to_line())), (rx, finished)))
    });

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (
                header::HeaderName::from_static("x-accel-buffering"),
                HeaderValue::from_static("no"),
            ),
        ],
        Body::from_stream(lines),
    )
        .into_response()
}
