use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use crate::docs::ApiDoc;
use axum::Router;
use axum::routing::get;
use crate::state::AppState;

use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub const LIVENESS_MESSAGE: &str = "Desqueeze server is running";

pub fn configure_routes(state: AppState) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(state.config.cors_origins.clone()))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(liveness))
        .merge(crate::modules::transcode::router())
        .merge(crate::modules::downloads::router(&state))
        .layer(cors)
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Server is up", body = String, content_type = "text/plain")
    ),
    tag = "Health"
)]
pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}
