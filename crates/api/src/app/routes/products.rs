use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_product).get(list_products))
        .route("/:id", get(get_product))
        .route("/:id/sales", post(record_sale).get(list_sales))
        .route("/:id/forecast", get(get_forecast))
}

pub async fn register_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterProductRequest>,
) -> axum::response::Response {
    match services.register_product(&body.product_id, &body.name, body.shelf_life_days) {
        Ok(summary) => (StatusCode::CREATED, Json(summary)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let products = services.list_products();
    Json(serde_json::json!({
        "count": products.len(),
        "products": products,
    }))
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.product(&id) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn record_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::RecordSaleRequest>,
) -> axum::response::Response {
    let result = match body.date.as_deref() {
        Some(raw) => match dto::parse_sale_time(raw) {
            Ok(at) => services.record_sale_at(&id, body.quantity, at),
            Err(res) => return res,
        },
        None => services.record_sale(&id, body.quantity),
    };

    match result {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_sales(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.sales_history(&id) {
        Ok(sales) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "product_id": id,
                "count": sales.len(),
                "sales": sales,
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_forecast(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Query(query): Query<dto::ForecastQuery>,
) -> axum::response::Response {
    let days = query.days.unwrap_or(dto::DEFAULT_FORECAST_DAYS);
    match services.get_forecast(&id, days) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
