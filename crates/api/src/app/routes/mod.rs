use axum::{Router, routing::{get, post}};

pub mod forecast;
pub mod products;
pub mod system;

/// Router for all inventory and forecasting endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .route("/forecast", post(forecast::daily_forecast))
        .route("/dashboard", get(system::dashboard))
}
