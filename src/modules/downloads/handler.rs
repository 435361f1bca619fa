use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;
use tracing::warn;

use crate::common::response::{ApiError, ErrorBody};
use crate::state::AppState;

/// Download a finished video as an attachment
#[utoipa::path(
    get,
    path = "/download/{name}",
    params(
        ("name" = String, Path, description = "Output file name as returned in the `download:` line")
    ),
    responses(
        (status = 200, description = "File contents", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 404, description = "Not Found", body = ErrorBody)
    ),
    tag = "Downloads"
)]
pub async fn download_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    if !is_plain_file_name(&name) {
        return ApiError::not_found("File").into_response();
    }

    let path = state.config.downloads_dir.join(&name);
    let file = match tokio::fs::File::open(&path).await {
        Ok(f) => f,
        Err(_) => return ApiError::not_found("File").into_response(),
    };

    let metadata = match file.metadata().await {
        Ok(m) if m.is_file() => m,
        Ok(_) => return ApiError::not_found("File").into_response(),
        Err(e) => {
            warn!("Failed to stat {}: {}", path.display(), e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let content_type = mime_guess::from_path(&name).first_or_octet_stream();
    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(header::CONTENT_LENGTH, metadata.len())
        .header(header::CONTENT_DISPOSITION, attachment_disposition(&name))
        .body(body)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Rejects anything that could step outside the downloads directory.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0'])
}

fn attachment_disposition(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("attachment; filename=\"{escaped}\"")
}
