//! Moving-average demand forecast and reorder sizing.
//!
//! Model:
//! - Average the quantities of the most recent `window` sale events. The divisor
//!   is the event count, not elapsed calendar days: days without a sale are
//!   invisible and several sales on one day count as several "days".
//! - With at least `trend_min_events` events, scale the average by the ratio of
//!   the newer half's total to the older half's total (older half gets the floor
//!   share, so the newer half is one longer for odd counts).
//! - Multiply by `horizon * buffer`, where the buffer widens when the horizon
//!   outlives the shelf life. Truncate toward zero and never forecast less than
//!   one unit for a product that has sold anything.

use serde::{Deserialize, Serialize};

use stockcast_core::{DomainError, DomainResult, Horizon, ProductId, ShelfLife};

use crate::history::{SalesHistory, SalesSnapshot};

/// Tunables for [`MovingAverageForecaster`]. Defaults are the production values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of most recent sale events averaged.
    pub window: usize,
    /// Minimum event count in the window before the trend ratio is applied.
    pub trend_min_events: usize,
    /// Buffer when the horizon fits within the shelf life.
    pub buffer: f64,
    /// Buffer when the horizon exceeds the shelf life.
    pub extended_buffer: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window: 30,
            trend_min_events: 14,
            buffer: 1.1,
            extended_buffer: 1.2,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if self.window == 0 {
            return Err(DomainError::invalid_argument("window must be >= 1"));
        }
        for (name, value) in [("buffer", self.buffer), ("extended_buffer", self.extended_buffer)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(DomainError::invalid_argument(format!(
                    "{name} must be a finite positive number"
                )));
            }
        }
        Ok(())
    }
}

/// Single-horizon answer for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub product_id: ProductId,
    pub horizon_days: u32,
    pub predicted_units: i64,
    pub recommended_order: i64,
    pub current_inventory: i64,
    pub shelf_life_days: u32,
}

/// A demand model.
///
/// Implementations must be pure: the same history and parameters always give the
/// same numbers.
pub trait Forecaster: Send + Sync {
    /// Predicted total units sold over `horizon`. Zero only for an empty history.
    fn forecast<H>(&self, history: &H, shelf_life: ShelfLife, horizon: Horizon) -> i64
    where
        H: SalesHistory + ?Sized;

    /// Units to order now given `inventory` on hand.
    fn recommended_order<H>(
        &self,
        history: &H,
        shelf_life: ShelfLife,
        inventory: i64,
        horizon: Horizon,
    ) -> i64
    where
        H: SalesHistory + ?Sized,
    {
        let forecast = self.forecast(history, shelf_life, horizon);
        order_quantity(forecast, inventory, shelf_life, horizon)
    }
}

/// The moving-average-with-trend forecaster.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovingAverageForecaster {
    config: ForecastConfig,
}

impl MovingAverageForecaster {
    pub fn new(config: ForecastConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }
}

impl Forecaster for MovingAverageForecaster {
    fn forecast<H>(&self, history: &H, shelf_life: ShelfLife, horizon: Horizon) -> i64
    where
        H: SalesHistory + ?Sized,
    {
        if history.is_empty() {
            return 0;
        }
        // A validated window is >= 1, so `recent` holds at least one sale.
        let recent = history.recent_quantities(self.config.window);

        let total = wide_sum(&recent);
        let mut avg_daily = total as f64 / recent.len() as f64;

        if recent.len() >= self.config.trend_min_events {
            let (older, newer) = recent.split_at(recent.len() / 2);
            let older_total = wide_sum(older);
            let newer_total = wide_sum(newer);
            let trend_factor = if older_total > 0 {
                newer_total as f64 / older_total as f64
            } else {
                1.0
            };
            avg_daily *= trend_factor;
        }

        let buffer = if horizon.days() > shelf_life.days() {
            self.config.extended_buffer
        } else {
            self.config.buffer
        };

        // `as` truncates toward zero (and saturates), matching integer flooring of
        // the non-negative products we expect here.
        let predicted = (avg_daily * f64::from(horizon.days()) * buffer) as i64;
        predicted.max(1)
    }
}

// Sums of recorded quantities can exceed `i64` even when each sale fits.
fn wide_sum(quantities: &[i64]) -> i128 {
    quantities.iter().map(|&q| i128::from(q)).sum()
}

/// Turn a forecast into an order quantity.
///
/// Stock that already covers the horizon at the forecast rate suppresses the
/// order. Otherwise order the shortfall, capped at what can be sold before it
/// expires (`forecast * shelf_life / horizon`), never below zero.
pub fn order_quantity(forecast: i64, inventory: i64, shelf_life: ShelfLife, horizon: Horizon) -> i64 {
    let days = f64::from(horizon.days());

    let current_stock_days = if forecast > 0 {
        inventory as f64 / (forecast as f64 / days)
    } else {
        0.0
    };

    if current_stock_days >= days {
        return 0;
    }

    let raw_order = forecast.saturating_sub(inventory);
    let max_order = forecast as f64 * (f64::from(shelf_life.days()) / days);

    let recommended = if raw_order as f64 <= max_order {
        raw_order
    } else {
        max_order as i64
    };
    recommended.max(0)
}

/// Forecast with the default configuration, validating raw day counts first.
pub fn compute_forecast<H>(history: &H, shelf_life_days: i64, horizon_days: i64) -> DomainResult<i64>
where
    H: SalesHistory + ?Sized,
{
    let horizon = Horizon::new(horizon_days)?;
    let shelf_life = ShelfLife::new(shelf_life_days)?;
    Ok(MovingAverageForecaster::default().forecast(history, shelf_life, horizon))
}

/// Recommended order with the default configuration, validating raw day counts first.
pub fn compute_recommended_order<H>(
    history: &H,
    shelf_life_days: i64,
    inventory: i64,
    horizon_days: i64,
) -> DomainResult<i64>
where
    H: SalesHistory + ?Sized,
{
    let horizon = Horizon::new(horizon_days)?;
    let shelf_life = ShelfLife::new(shelf_life_days)?;
    Ok(MovingAverageForecaster::default().recommended_order(history, shelf_life, inventory, horizon))
}

/// Build the single-horizon report for a snapshot.
pub fn report<F: Forecaster>(forecaster: &F, snapshot: &SalesSnapshot, horizon: Horizon) -> ForecastReport {
    let predicted_units = forecaster.forecast(snapshot, snapshot.shelf_life, horizon);
    let recommended_order =
        order_quantity(predicted_units, snapshot.inventory, snapshot.shelf_life, horizon);

    ForecastReport {
        product_id: snapshot.product_id.clone(),
        horizon_days: horizon.days(),
        predicted_units,
        recommended_order,
        current_inventory: snapshot.inventory,
        shelf_life_days: snapshot.shelf_life.days(),
    }
}
