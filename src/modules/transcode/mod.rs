use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod events;
pub mod handler;
pub mod model;
pub mod progress;
pub mod service;

// The upload cap is enforced by `stream_to_file`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(handler::upload_video))
        .layer(DefaultBodyLimit::disable())
}
