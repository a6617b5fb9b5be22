use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Per-day predicted sales and recommended orders over an inclusive date range.
pub async fn daily_forecast(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::DailyForecastRequest>,
) -> axum::response::Response {
    let start = match dto::parse_date("start_date", &body.start_date) {
        Ok(d) => d,
        Err(res) => return res,
    };
    let end = match dto::parse_date("end_date", &body.end_date) {
        Ok(d) => d,
        Err(res) => return res,
    };

    match services.daily_forecast(&body.product_id, start, end) {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
