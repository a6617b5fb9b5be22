use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockcast_core::{
    Aggregate, AggregateRoot, DomainError, Entity, Event, ProductId, SaleId, ShelfLife,
};

/// One recorded sale in a product's ledger. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleEvent {
    pub sale_id: SaleId,
    pub occurred_at: DateTime<Utc>,
    pub quantity: i64,
}

/// Aggregate root: Product.
///
/// Holds the on-hand inventory counter and the append-only sales ledger. Ledger
/// order is recording order; backdated sales are not re-sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    shelf_life: Option<ShelfLife>,
    inventory: i64,
    sales: Vec<SaleEvent>,
    version: u64,
    registered: bool,
}

impl Product {
    /// Create an empty, not-yet-registered aggregate instance.
    pub fn empty(id: ProductId) -> Self {
        Self {
            id,
            name: String::new(),
            shelf_life: None,
            inventory: 0,
            sales: Vec::new(),
            version: 0,
            registered: false,
        }
    }

    /// Build a registered product in one step.
    pub fn register(cmd: RegisterProduct) -> Result<Self, DomainError> {
        let mut product = Self::empty(cmd.product_id.clone());
        product.execute(&ProductCommand::RegisterProduct(cmd))?;
        Ok(product)
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shelf life in days, `None` until registered.
    pub fn shelf_life(&self) -> Option<ShelfLife> {
        self.shelf_life
    }

    /// On-hand units. May be negative: sales are never checked against stock.
    pub fn inventory(&self) -> i64 {
        self.inventory
    }

    /// Full ledger in recording order.
    pub fn sales(&self) -> &[SaleEvent] {
        &self.sales
    }

    /// The last `n` sales (or fewer), oldest first.
    pub fn recent_sales(&self, n: usize) -> &[SaleEvent] {
        let start = self.sales.len().saturating_sub(n);
        &self.sales[start..]
    }

    /// Sum of all recorded quantities, saturating at `i64::MAX`.
    pub fn total_units_sold(&self) -> i64 {
        self.sales
            .iter()
            .fold(0i64, |total, s| total.saturating_add(s.quantity))
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Product {
    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RegisterProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterProduct {
    pub product_id: ProductId,
    pub name: String,
    pub shelf_life_days: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordSale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSale {
    pub product_id: ProductId,
    pub sale_id: SaleId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCommand {
    RegisterProduct(RegisterProduct),
    RecordSale(RecordSale),
}

/// Event: ProductRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRegistered {
    pub product_id: ProductId,
    pub name: String,
    pub shelf_life: ShelfLife,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SaleRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecorded {
    pub product_id: ProductId,
    pub sale_id: SaleId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductEvent {
    ProductRegistered(ProductRegistered),
    SaleRecorded(SaleRecorded),
}

impl Event for ProductEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::ProductRegistered(_) => "inventory.product.registered",
            ProductEvent::SaleRecorded(_) => "inventory.product.sale_recorded",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductEvent::ProductRegistered(e) => e.occurred_at,
            ProductEvent::SaleRecorded(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Product {
    type Command = ProductCommand;
    type Event = ProductEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProductEvent::ProductRegistered(e) => {
                self.id = e.product_id.clone();
                self.name = e.name.clone();
                self.shelf_life = Some(e.shelf_life);
                self.inventory = 0;
                self.registered = true;
            }
            ProductEvent::SaleRecorded(e) => {
                // `handle` rejects quantities that would overflow the counter.
                let inventory = self.inventory.saturating_sub(e.quantity);
                self.sales.push(SaleEvent {
                    sale_id: e.sale_id,
                    occurred_at: e.occurred_at,
                    quantity: e.quantity,
                });
                self.inventory = inventory;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProductCommand::RegisterProduct(cmd) => self.handle_register(cmd),
            ProductCommand::RecordSale(cmd) => self.handle_record_sale(cmd),
        }
    }
}

impl Product {
    fn ensure_product_id(&self, product_id: &ProductId) -> Result<(), DomainError> {
        if &self.id != product_id {
            return Err(DomainError::invalid_argument("product_id mismatch"));
        }
        Ok(())
    }

    fn handle_register(&self, cmd: &RegisterProduct) -> Result<Vec<ProductEvent>, DomainError> {
        if self.registered {
            return Err(DomainError::duplicate(self.id.as_str()));
        }
        self.ensure_product_id(&cmd.product_id)?;
        if cmd.name.trim().is_empty() {
            return Err(DomainError::invalid_argument("name cannot be empty"));
        }
        let shelf_life = ShelfLife::new(cmd.shelf_life_days)?;

        Ok(vec![ProductEvent::ProductRegistered(ProductRegistered {
            product_id: cmd.product_id.clone(),
            name: cmd.name.clone(),
            shelf_life,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record_sale(&self, cmd: &RecordSale) -> Result<Vec<ProductEvent>, DomainError> {
        if !self.registered {
            return Err(DomainError::not_found(cmd.product_id.as_str()));
        }
        self.ensure_product_id(&cmd.product_id)?;

        if cmd.quantity < 0 {
            return Err(DomainError::invalid_argument(
                "invalid quantity: must not be negative",
            ));
        }
        if self.inventory.checked_sub(cmd.quantity).is_none() {
            return Err(DomainError::invalid_argument(
                "invalid quantity: inventory would overflow",
            ));
        }

        Ok(vec![ProductEvent::SaleRecorded(SaleRecorded {
            product_id: cmd.product_id.clone(),
            sale_id: cmd.sale_id,
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn test_product_id() -> ProductId {
        ProductId::new("A1").unwrap()
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn registered(shelf_life_days: i64) -> Product {
        Product::register(RegisterProduct {
            product_id: test_product_id(),
            name: "Apple".to_string(),
            shelf_life_days,
            occurred_at: test_time(),
        })
        .unwrap()
    }

    fn sale(quantity: i64) -> ProductCommand {
        ProductCommand::RecordSale(RecordSale {
            product_id: test_product_id(),
            sale_id: SaleId::new(),
            quantity,
            occurred_at: test_time(),
        })
    }

    #[test]
    fn register_emits_product_registered_event() {
        let product = Product::empty(test_product_id());
        let cmd = RegisterProduct {
            product_id: test_product_id(),
            name: "Apple".to_string(),
            shelf_life_days: 7,
            occurred_at: test_time(),
        };

        let events = product.handle(&ProductCommand::RegisterProduct(cmd)).unwrap();
        assert_eq!(events.len(), 1);
        match &events[0] {
            ProductEvent::ProductRegistered(e) => {
                assert_eq!(e.product_id, test_product_id());
                assert_eq!(e.name, "Apple");
                assert_eq!(e.shelf_life.days(), 7);
            }
            _ => panic!("Expected ProductRegistered event"),
        }
        assert_eq!(events[0].event_type(), "inventory.product.registered");
    }

    #[test]
    fn register_starts_with_zero_inventory_and_empty_ledger() {
        let product = registered(7);
        assert!(product.is_registered());
        assert_eq!(product.inventory(), 0);
        assert!(product.sales().is_empty());
        assert_eq!(product.version(), 1);
    }

    #[test]
    fn register_rejects_blank_name() {
        let product = Product::empty(test_product_id());
        let cmd = RegisterProduct {
            product_id: test_product_id(),
            name: "  ".to_string(),
            shelf_life_days: 7,
            occurred_at: test_time(),
        };

        let err = product.handle(&ProductCommand::RegisterProduct(cmd)).unwrap_err();
        match err {
            DomainError::InvalidArgument(_) => {}
            _ => panic!("Expected InvalidArgument for blank name"),
        }
    }

    #[test]
    fn register_rejects_non_positive_shelf_life() {
        for days in [0, -3] {
            let err = Product::register(RegisterProduct {
                product_id: test_product_id(),
                name: "Apple".to_string(),
                shelf_life_days: days,
                occurred_at: test_time(),
            })
            .unwrap_err();
            assert!(matches!(err, DomainError::InvalidArgument(_)));
        }
    }

    #[test]
    fn register_twice_is_duplicate_and_keeps_ledger() {
        let mut product = registered(7);
        product.execute(&sale(10)).unwrap();

        let err = product
            .execute(&ProductCommand::RegisterProduct(RegisterProduct {
                product_id: test_product_id(),
                name: "Other".to_string(),
                shelf_life_days: 3,
                occurred_at: test_time(),
            }))
            .unwrap_err();

        assert_eq!(err, DomainError::duplicate("A1"));
        assert_eq!(product.name(), "Apple");
        assert_eq!(product.sales().len(), 1);
        assert_eq!(product.shelf_life().unwrap().days(), 7);
    }

    #[test]
    fn record_sale_on_unregistered_product_is_not_found() {
        let product = Product::empty(test_product_id());
        let err = product.handle(&sale(1)).unwrap_err();
        assert_eq!(err, DomainError::not_found("A1"));
    }

    #[test]
    fn record_sale_rejects_negative_quantity_without_mutation() {
        let mut product = registered(7);
        let before = product.clone();

        let err = product.execute(&sale(-1)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert_eq!(product, before);
    }

    #[test]
    fn record_sale_rejects_foreign_product_id() {
        let product = registered(7);
        let cmd = ProductCommand::RecordSale(RecordSale {
            product_id: ProductId::new("B2").unwrap(),
            sale_id: SaleId::new(),
            quantity: 1,
            occurred_at: test_time(),
        });
        assert!(matches!(product.handle(&cmd), Err(DomainError::InvalidArgument(_))));
    }

    #[test]
    fn record_sale_decrements_inventory_without_stock_check() {
        let mut product = registered(7);
        product.execute(&sale(10)).unwrap();
        product.execute(&sale(15)).unwrap();
        product.execute(&sale(0)).unwrap();

        assert_eq!(product.inventory(), -25);
        assert_eq!(product.total_units_sold(), 25);
        assert_eq!(product.sales().len(), 3);
        assert_eq!(product.version(), 4);
    }

    #[test]
    fn record_sale_rejects_quantity_that_overflows_inventory() {
        let mut product = registered(7);
        product.execute(&sale(i64::MAX)).unwrap();
        let before = product.clone();

        let err = product.execute(&sale(i64::MAX)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert_eq!(product, before);
        assert_eq!(product.sales().len(), 1);
        assert_eq!(product.inventory(), -i64::MAX);
    }

    #[test]
    fn total_units_sold_saturates_at_the_counter_floor() {
        let mut product = registered(7);
        product.execute(&sale(i64::MAX)).unwrap();
        product.execute(&sale(1)).unwrap();

        assert_eq!(product.inventory(), i64::MIN);
        assert_eq!(product.total_units_sold(), i64::MAX);
        assert!(product.handle(&sale(1)).is_err());
        assert!(product.handle(&sale(0)).is_ok());
    }

    #[test]
    fn backdated_sales_keep_recording_order() {
        let mut product = registered(7);
        let now = test_time();
        for (offset, qty) in [(0, 1), (-5, 2), (-1, 3)] {
            product
                .execute(&ProductCommand::RecordSale(RecordSale {
                    product_id: test_product_id(),
                    sale_id: SaleId::new(),
                    quantity: qty,
                    occurred_at: now + Duration::days(offset),
                }))
                .unwrap();
        }

        let qtys: Vec<i64> = product.sales().iter().map(|s| s.quantity).collect();
        assert_eq!(qtys, vec![1, 2, 3]);
    }

    #[test]
    fn recent_sales_returns_tail_oldest_first() {
        let mut product = registered(7);
        for q in 1..=5 {
            product.execute(&sale(q)).unwrap();
        }

        let tail: Vec<i64> = product.recent_sales(3).iter().map(|s| s.quantity).collect();
        assert_eq!(tail, vec![3, 4, 5]);
        assert_eq!(product.recent_sales(50).len(), 5);
        assert!(product.recent_sales(0).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: inventory always equals minus the sum of the ledger, and the
        /// ledger grows by exactly one entry per accepted sale.
        #[test]
        fn inventory_tracks_ledger(quantities in prop::collection::vec(-5i64..500i64, 0..60)) {
            let mut product = registered(7);
            let mut accepted = 0usize;

            for q in quantities {
                if product.execute(&sale(q)).is_ok() {
                    accepted += 1;
                }
            }

            prop_assert_eq!(product.sales().len(), accepted);
            prop_assert_eq!(product.inventory(), -product.total_units_sold());
            prop_assert!(product.sales().iter().all(|s| s.quantity >= 0));
        }
    }
}
