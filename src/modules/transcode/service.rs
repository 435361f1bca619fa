use axum::extract::Multipart;
use axum::http::{header, HeaderMap, Uri};
use tracing::info;
use url::Url;

use super::dto::RawParams;
use super::model::UploadRequest;
use crate::common::upload::{stream_to_file, TempUpload, UploadError};
use crate::state::AppState;

/// Scheme and host the client used to reach us, for building absolute links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicOrigin {
    pub proto: String,
    pub host: String,
}

impl PublicOrigin {
    pub fn from_request(headers: &HeaderMap, uri: &Uri, fallback_port: u16) -> Self {
        let proto = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("http")
            .to_string();

        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| format!("localhost:{fallback_port}"));

        Self { proto, host }
    }
}

pub struct TranscodeService;

impl TranscodeService {
    /// Drains the multipart body: the first field carrying a filename is
    /// streamed to disk, the known text fields become encode settings.
    pub async fn receive_upload(
        state: &AppState,
        mut multipart: Multipart,
    ) -> Result<UploadRequest, UploadError> {
        let mut upload: Option<(String, TempUpload)> = None;
        let mut raw = RawParams::default();

        while let Some(mut field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) if upload.is_none() => {
                    info!("Receiving upload '{}' (field '{}')", file_name, name);
                    let file = stream_to_file(
                        field,
                        &state.config.upload_dir,
                        state.config.max_upload_bytes,
                    )
                    .await?;
                    upload = Some((file_name, file));
                }
                // Extra files are drained and discarded.
                Some(_) => while field.chunk().await?.is_some() {},
                None => raw.set(&name, field.text().await?),
            }
        }

        let (original_name, file) = upload.ok_or(UploadError::MissingFile)?;

        Ok(UploadRequest {
            original_name,
            file,
            settings: raw.into_settings(),
        })
    }

    /// `<proto>://<host>/downloads/<name>` with `name` percent-encoded as a
    /// single path segment.
    pub fn download_url(origin: &PublicOrigin, file_name: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}://{}/", origin.proto, origin.host))?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .clear()
            .push("downloads")
            .push(file_name);
        Ok(url)
    }
}
