use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::liveness,
        crate::modules::transcode::handler::upload_video,
        crate::modules::downloads::handler::download_file,
    ),
    components(
        schemas(
            crate::modules::transcode::dto::UploadForm,
            crate::common::response::ErrorBody,
        )
    ),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Transcode", description = "Upload and desqueeze a video, streaming progress"),
        (name = "Downloads", description = "Finished outputs")
    )
)]
pub struct ApiDoc;
