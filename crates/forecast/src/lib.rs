//! `stockcast-forecast`
//!
//! **Responsibility:** short-horizon demand forecasting and reorder sizing.
//!
//! This crate is intentionally **not** part of the domain model:
//! - It must not depend on the product aggregate.
//! - It must not mutate state; every call is a pure function of its inputs.
//! - Inputs arrive as owned snapshots or anything implementing [`SalesHistory`].

pub mod daily;
pub mod engine;
pub mod history;

pub use daily::{DailyPlan, MAX_PLAN_DAYS, plan_daily};
pub use engine::{
    ForecastConfig, ForecastReport, Forecaster, MovingAverageForecaster, compute_forecast,
    compute_recommended_order, order_quantity, report,
};
pub use history::{SalePoint, SalesHistory, SalesSnapshot};
