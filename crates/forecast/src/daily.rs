//! Per-day plan over a calendar date range.
//!
//! Repeats the single-horizon calculation once per day (horizon = 1), carrying a
//! projected inventory forward: each day's recommended order is assumed to be
//! received and that day's predicted sales consumed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockcast_core::{DomainError, DomainResult, Horizon, ProductId};

use crate::engine::{Forecaster, order_quantity};
use crate::history::SalesSnapshot;

/// Longest range a single plan may cover, in days (inclusive).
pub const MAX_PLAN_DAYS: i64 = 366;

/// Parallel per-day sequences for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub product_id: ProductId,
    pub dates: Vec<NaiveDate>,
    pub predicted_sales: Vec<i64>,
    pub recommended_order: Vec<i64>,
    /// Fraction of each day's order expected to exceed that day's demand.
    pub waste_risk: Vec<f64>,
}

impl DailyPlan {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Saturates at `i64::MAX`.
    pub fn total_predicted(&self) -> i64 {
        saturating_total(&self.predicted_sales)
    }

    /// Saturates at `i64::MAX`.
    pub fn total_ordered(&self) -> i64 {
        saturating_total(&self.recommended_order)
    }
}

fn saturating_total(values: &[i64]) -> i64 {
    values.iter().fold(0i64, |total, &v| total.saturating_add(v))
}

/// Plan `start..=end` for the product in `snapshot`.
pub fn plan_daily<F: Forecaster>(
    forecaster: &F,
    snapshot: &SalesSnapshot,
    start: NaiveDate,
    end: NaiveDate,
) -> DomainResult<DailyPlan> {
    if end < start {
        return Err(DomainError::invalid_argument(
            "invalid date range: end_date is before start_date",
        ));
    }
    let span = (end - start).num_days() + 1;
    if span > MAX_PLAN_DAYS {
        return Err(DomainError::invalid_argument(format!(
            "invalid date range: at most {MAX_PLAN_DAYS} days may be planned"
        )));
    }

    let capacity = span as usize;
    let mut plan = DailyPlan {
        product_id: snapshot.product_id.clone(),
        dates: Vec::with_capacity(capacity),
        predicted_sales: Vec::with_capacity(capacity),
        recommended_order: Vec::with_capacity(capacity),
        waste_risk: Vec::with_capacity(capacity),
    };

    // Demand per day does not change across the range: the history is fixed.
    let predicted = forecaster.forecast(snapshot, snapshot.shelf_life, Horizon::ONE_DAY);
    let mut projected = snapshot.inventory;

    for date in start.iter_days().take(capacity) {
        let order = order_quantity(predicted, projected, snapshot.shelf_life, Horizon::ONE_DAY);
        let waste = if order > 0 {
            (order - predicted).max(0) as f64 / order as f64
        } else {
            0.0
        };

        plan.dates.push(date);
        plan.predicted_sales.push(predicted);
        plan.recommended_order.push(order);
        plan.waste_risk.push(waste);

        projected = projected.saturating_add(order).saturating_sub(predicted);
    }

    Ok(plan)
}
