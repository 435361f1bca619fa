use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

pub mod handler;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/download/{name}", get(handler::download_file))
        .nest_service("/downloads", ServeDir::new(&state.config.downloads_dir))
}
