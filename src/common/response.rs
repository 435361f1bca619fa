use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON body for the non-streaming routes' failures.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "error")]
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError(pub String, pub StatusCode);

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        Self(format!("{what} not found"), StatusCode::NOT_FOUND)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (message, status) = (self.0, self.1);
        let body = ErrorBody {
            status: "error",
            message,
        };
        (status, Json(body)).into_response()
    }
}
