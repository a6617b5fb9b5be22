use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use stockcast_core::{DomainError, DomainResult, Entity, ProductId};
use stockcast_inventory::Product;

use super::ProductStore;

type Slot = Arc<Mutex<Product>>;

/// In-memory product store with one mutex per product.
///
/// The outer map lock is only held long enough to find or insert a slot, so work
/// on different products never contends. State vanishes with the process.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<HashMap<ProductId, Slot>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, id: &ProductId) -> DomainResult<Slot> {
        let map = self.products.read().unwrap_or_else(PoisonError::into_inner);
        map.get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(id.as_str()))
    }
}

// A panic inside a critical section cannot leave a product half-updated: the
// aggregate only mutates in `apply`, which pushes and decrements back to back.
fn lock(slot: &Slot) -> MutexGuard<'_, Product> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ProductStore for InMemoryProductStore {
    fn insert(&self, product: Product) -> DomainResult<()> {
        let mut map = self.products.write().unwrap_or_else(PoisonError::into_inner);
        let id = product.id().clone();
        if map.contains_key(&id) {
            return Err(DomainError::duplicate(id.as_str()));
        }
        map.insert(id, Arc::new(Mutex::new(product)));
        Ok(())
    }

    fn update<R, F>(&self, id: &ProductId, f: F) -> DomainResult<R>
    where
        F: FnOnce(&mut Product) -> DomainResult<R>,
    {
        let slot = self.slot(id)?;
        let mut product = lock(&slot);
        f(&mut *product)
    }

    fn read<R, F>(&self, id: &ProductId, f: F) -> DomainResult<R>
    where
        F: FnOnce(&Product) -> R,
    {
        let slot = self.slot(id)?;
        let product = lock(&slot);
        Ok(f(&*product))
    }

    fn ids(&self) -> Vec<ProductId> {
        let map = self.products.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<ProductId> = map.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockcast_core::{Aggregate, SaleId};
    use stockcast_inventory::{ProductCommand, RecordSale, RegisterProduct};

    fn pid(s: &str) -> ProductId {
        ProductId::new(s).unwrap()
    }

    fn product(id: &str, name: &str) -> Product {
        Product::register(RegisterProduct {
            product_id: pid(id),
            name: name.to_string(),
            shelf_life_days: 7,
            occurred_at: Utc::now(),
        })
        .unwrap()
    }

    fn sale(id: &str, quantity: i64) -> ProductCommand {
        ProductCommand::RecordSale(RecordSale {
            product_id: pid(id),
            sale_id: SaleId::new(),
            quantity,
            occurred_at: Utc::now(),
        })
    }

    #[test]
    fn insert_rejects_duplicate_and_keeps_original() {
        let store = InMemoryProductStore::new();
        store.insert(product("A1", "Apple")).unwrap();
        store
            .update(&pid("A1"), |p| p.execute(&sale("A1", 4)).map(|_| ()))
            .unwrap();

        let err = store.insert(product("A1", "Apricot")).unwrap_err();
        assert_eq!(err, DomainError::duplicate("A1"));

        let (name, sales) = store
            .read(&pid("A1"), |p| (p.name().to_string(), p.sales().len()))
            .unwrap();
        assert_eq!(name, "Apple");
        assert_eq!(sales, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let store = InMemoryProductStore::new();
        assert_eq!(
            store.read(&pid("nope"), |_| ()).unwrap_err(),
            DomainError::not_found("nope")
        );
        assert!(store.update(&pid("nope"), |_| Ok(())).is_err());
    }

    #[test]
    fn ids_are_sorted() {
        let store = InMemoryProductStore::new();
        for id in ["c", "a", "b"] {
            store.insert(product(id, "x")).unwrap();
        }
        assert_eq!(store.ids(), vec![pid("a"), pid("b"), pid("c")]);
    }

    #[test]
    fn failed_update_leaves_product_unchanged() {
        let store = InMemoryProductStore::new();
        store.insert(product("A1", "Apple")).unwrap();

        let err = store
            .update(&pid("A1"), |p| p.execute(&sale("A1", -2)).map(|_| ()))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));

        let inventory = store.read(&pid("A1"), |p| p.inventory()).unwrap();
        assert_eq!(inventory, 0);
    }

    #[test]
    fn arc_wrapped_store_delegates() {
        let store = Arc::new(InMemoryProductStore::new());
        ProductStore::insert(&store, product("A1", "Apple")).unwrap();
        assert_eq!(ProductStore::ids(&store), vec![pid("A1")]);
    }
}
