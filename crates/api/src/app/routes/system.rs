use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn dashboard(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(services.dashboard())
}
