//! Product store boundary.
//!
//! The store owns every registered [`Product`] for the lifetime of the process.
//! Implementations must give each product its own exclusive lock: a sale's
//! ledger append and inventory decrement happen inside one critical section, and
//! readers only ever observe a product between sales.

pub mod in_memory;

use std::sync::Arc;

use stockcast_core::{DomainResult, ProductId};
use stockcast_inventory::Product;

pub use in_memory::InMemoryProductStore;

pub trait ProductStore: Send + Sync {
    /// Add a registered product. Fails with `DuplicateProduct` if the id is taken,
    /// leaving the existing product untouched.
    fn insert(&self, product: Product) -> DomainResult<()>;

    /// Run `f` with exclusive access to one product.
    ///
    /// `f` must leave the product unchanged when it returns an error.
    fn update<R, F>(&self, id: &ProductId, f: F) -> DomainResult<R>
    where
        F: FnOnce(&mut Product) -> DomainResult<R>;

    /// Run `f` against a consistent view of one product.
    fn read<R, F>(&self, id: &ProductId, f: F) -> DomainResult<R>
    where
        F: FnOnce(&Product) -> R;

    /// All registered product ids, sorted.
    fn ids(&self) -> Vec<ProductId>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn insert(&self, product: Product) -> DomainResult<()> {
        (**self).insert(product)
    }

    fn update<R, F>(&self, id: &ProductId, f: F) -> DomainResult<R>
    where
        F: FnOnce(&mut Product) -> DomainResult<R>,
    {
        (**self).update(id, f)
    }

    fn read<R, F>(&self, id: &ProductId, f: F) -> DomainResult<R>
    where
        F: FnOnce(&Product) -> R,
    {
        (**self).read(id, f)
    }

    fn ids(&self) -> Vec<ProductId> {
        (**self).ids()
    }
}
