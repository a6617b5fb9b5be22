use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use axum::http::StatusCode;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterProductRequest {
    pub product_id: String,
    pub name: String,
    pub shelf_life_days: i64,
}

#[derive(Debug, Deserialize)]
pub struct RecordSaleRequest {
    pub quantity: i64,
    /// RFC3339 timestamp or `YYYY-MM-DD`; defaults to now.
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DailyForecastRequest {
    pub product_id: String,
    pub start_date: String, // YYYY-MM-DD
    pub end_date: String,   // YYYY-MM-DD
}

/// Horizon used when `?days=` is omitted.
pub const DEFAULT_FORECAST_DAYS: i64 = 7;

// -------------------------
// Parsing helpers
// -------------------------

pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, axum::response::Response> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_date",
            format!("{field} must be formatted as YYYY-MM-DD"),
        )
    })
}

/// Sale timestamps accept either a full RFC3339 instant or a bare calendar day
/// (taken as midnight UTC).
pub fn parse_sale_time(raw: &str) -> Result<DateTime<Utc>, axum::response::Response> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let day = parse_date("date", raw)?;
    Ok(day.and_time(chrono::NaiveTime::MIN).and_utc())
}
