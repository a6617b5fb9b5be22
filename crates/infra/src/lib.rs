//! Infrastructure layer: product storage and the application service.

pub mod service;
pub mod store;


pub use service::{
    Dashboard, InventoryService, ProductSummary, RECENT_SALES_WINDOW, SaleReceipt,
};
pub use store::{InMemoryProductStore, ProductStore};
