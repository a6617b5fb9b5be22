use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockcast_core::DomainError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let status = match &err {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::DuplicateProduct(_) => StatusCode::CONFLICT,
        DomainError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
    };
    tracing::warn!(error = %err, code = err.code(), "request rejected");
    json_error(status, err.code(), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
