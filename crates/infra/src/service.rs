//! Application service: the operations every caller (HTTP, interactive loop)
//! goes through.
//!
//! Mutations run inside the store's per-product critical section. Forecasts copy
//! a [`SalesSnapshot`] under that same lock and compute outside it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stockcast_core::{Aggregate, DomainError, DomainResult, Entity, Horizon, ProductId, SaleId};
use stockcast_forecast::{
    DailyPlan, ForecastReport, Forecaster, MovingAverageForecaster, SalePoint, SalesSnapshot,
    plan_daily, report,
};
use stockcast_inventory::{Product, ProductCommand, RecordSale, RegisterProduct, SaleEvent};

use crate::store::{InMemoryProductStore, ProductStore};

/// Number of most recent sale events summed into `ProductSummary::recent_units`.
pub const RECENT_SALES_WINDOW: usize = 7;

/// Read model for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product_id: ProductId,
    pub name: String,
    pub inventory: i64,
    pub shelf_life_days: u32,
    pub sale_count: usize,
    pub recent_units: i64,
    pub total_units_sold: i64,
}

/// Result of recording one sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub product_id: ProductId,
    pub sale_id: SaleId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
    pub inventory: i64,
}

/// Aggregate view across every product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub product_count: usize,
    pub total_units_sold: i64,
    pub products: Vec<ProductSummary>,
}

fn summarize(product: &Product) -> ProductSummary {
    ProductSummary {
        product_id: product.id().clone(),
        name: product.name().to_string(),
        inventory: product.inventory(),
        shelf_life_days: product.shelf_life().map(|s| s.days()).unwrap_or_default(),
        sale_count: product.sales().len(),
        recent_units: product
            .recent_sales(RECENT_SALES_WINDOW)
            .iter()
            .fold(0i64, |total, s| total.saturating_add(s.quantity)),
        total_units_sold: product.total_units_sold(),
    }
}

fn snapshot_of(product: &Product) -> DomainResult<SalesSnapshot> {
    let shelf_life = product
        .shelf_life()
        .ok_or_else(|| DomainError::not_found(product.id().as_str()))?;

    Ok(SalesSnapshot {
        product_id: product.id().clone(),
        shelf_life,
        inventory: product.inventory(),
        sales: product
            .sales()
            .iter()
            .map(|s| SalePoint {
                occurred_at: s.occurred_at,
                quantity: s.quantity,
            })
            .collect(),
    })
}

/// Inventory + forecasting operations over an injected store and forecaster.
#[derive(Debug)]
pub struct InventoryService<S, F = MovingAverageForecaster> {
    store: S,
    forecaster: F,
}

impl InventoryService<InMemoryProductStore> {
    /// Fresh in-memory service with the default forecaster.
    pub fn in_memory() -> Self {
        Self::new(InMemoryProductStore::new(), MovingAverageForecaster::default())
    }
}

impl<S, F> InventoryService<S, F>
where
    S: ProductStore,
    F: Forecaster,
{
    pub fn new(store: S, forecaster: F) -> Self {
        Self { store, forecaster }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn forecaster(&self) -> &F {
        &self.forecaster
    }

    pub fn register_product(
        &self,
        product_id: &str,
        name: &str,
        shelf_life_days: i64,
    ) -> DomainResult<ProductSummary> {
        let product_id = ProductId::new(product_id)?;
        let product = Product::register(RegisterProduct {
            product_id: product_id.clone(),
            name: name.to_string(),
            shelf_life_days,
            occurred_at: Utc::now(),
        })?;
        let summary = summarize(&product);

        self.store.insert(product)?;
        info!(product_id = %product_id, shelf_life_days, "product registered");
        Ok(summary)
    }

    pub fn record_sale(&self, product_id: &str, quantity: i64) -> DomainResult<SaleReceipt> {
        self.record_sale_at(product_id, quantity, Utc::now())
    }

    /// Record a sale with an explicit business time. The ledger keeps recording
    /// order even when `occurred_at` is earlier than existing entries.
    pub fn record_sale_at(
        &self,
        product_id: &str,
        quantity: i64,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<SaleReceipt> {
        let product_id = ProductId::new(product_id)?;
        if quantity < 0 {
            return Err(DomainError::invalid_argument(
                "invalid quantity: must not be negative",
            ));
        }

        let sale_id = SaleId::new();
        let cmd = ProductCommand::RecordSale(RecordSale {
            product_id: product_id.clone(),
            sale_id,
            quantity,
            occurred_at,
        });

        let inventory = self.store.update(&product_id, |product| {
            product.execute(&cmd)?;
            Ok(product.inventory())
        })?;

        info!(product_id = %product_id, quantity, inventory, "sale recorded");
        Ok(SaleReceipt {
            product_id,
            sale_id,
            quantity,
            occurred_at,
            inventory,
        })
    }

    pub fn get_forecast(&self, product_id: &str, horizon_days: i64) -> DomainResult<ForecastReport> {
        let horizon = Horizon::new(horizon_days)?;
        let product_id = ProductId::new(product_id)?;
        let snapshot = self.store.read(&product_id, snapshot_of)??;

        let forecast = report(&self.forecaster, &snapshot, horizon);
        debug!(
            product_id = %product_id,
            horizon_days,
            sales = snapshot.sales.len(),
            predicted_units = forecast.predicted_units,
            recommended_order = forecast.recommended_order,
            "forecast computed"
        );
        Ok(forecast)
    }

    pub fn daily_forecast(
        &self,
        product_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<DailyPlan> {
        let product_id = ProductId::new(product_id)?;
        let snapshot = self.store.read(&product_id, snapshot_of)??;

        let plan = plan_daily(&self.forecaster, &snapshot, start, end)?;
        debug!(
            product_id = %product_id,
            %start,
            %end,
            total_predicted = plan.total_predicted(),
            total_ordered = plan.total_ordered(),
            "daily plan computed"
        );
        Ok(plan)
    }

    pub fn product(&self, product_id: &str) -> DomainResult<ProductSummary> {
        let product_id = ProductId::new(product_id)?;
        self.store.read(&product_id, summarize)
    }

    pub fn sales_history(&self, product_id: &str) -> DomainResult<Vec<SaleEvent>> {
        let product_id = ProductId::new(product_id)?;
        self.store.read(&product_id, |p| p.sales().to_vec())
    }

    /// Every product, sorted by id.
    pub fn list_products(&self) -> Vec<ProductSummary> {
        self.store
            .ids()
            .iter()
            .filter_map(|id| self.store.read(id, summarize).ok())
            .collect()
    }

    pub fn dashboard(&self) -> Dashboard {
        let products = self.list_products();
        Dashboard {
            product_count: products.len(),
            total_units_sold: products
                .iter()
                .fold(0i64, |total, p| total.saturating_add(p.total_units_sold)),
            products,
        }
    }
}
