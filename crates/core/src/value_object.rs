//! Value objects: equality by value, not identity.
//!
//! Day counts that drive forecasting (`Horizon`, `ShelfLife`) are validated once
//! at construction, so code holding one never has to re-check positivity.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

fn positive_days(days: i64, what: &str) -> DomainResult<u32> {
    if days <= 0 {
        return Err(DomainError::invalid_argument(format!(
            "invalid {what}: must be a positive integer"
        )));
    }
    u32::try_from(days).map_err(|_| {
        DomainError::invalid_argument(format!("invalid {what}: at most {} days", u32::MAX))
    })
}

/// Number of future days a forecast or order recommendation covers (>= 1).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Horizon(u32);

impl Horizon {
    /// A single-day horizon.
    pub const ONE_DAY: Horizon = Horizon(1);

    pub fn new(days: i64) -> DomainResult<Self> {
        positive_days(days, "horizon").map(Self)
    }

    pub fn days(self) -> u32 {
        self.0
    }
}

impl ValueObject for Horizon {}

impl TryFrom<i64> for Horizon {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Horizon> for i64 {
    fn from(value: Horizon) -> Self {
        i64::from(value.0)
    }
}

/// Maximum number of days a unit stays sellable after receipt (>= 1).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ShelfLife(u32);

impl ShelfLife {
    pub fn new(days: i64) -> DomainResult<Self> {
        positive_days(days, "shelf life").map(Self)
    }

    pub fn days(self) -> u32 {
        self.0
    }
}

impl ValueObject for ShelfLife {}

impl TryFrom<i64> for ShelfLife {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShelfLife> for i64 {
    fn from(value: ShelfLife) -> Self {
        i64::from(value.0)
    }
}
