//! Inventory domain module.
//!
//! This crate contains business rules for products and their sales ledger,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;

pub use product::{
    Product, ProductCommand, ProductEvent, ProductRegistered, RecordSale, RegisterProduct,
    SaleEvent, SaleRecorded,
};
