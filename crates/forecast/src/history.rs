use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockcast_core::{ProductId, ShelfLife};

/// A single sale as seen by the forecaster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalePoint {
    pub occurred_at: DateTime<Utc>,
    pub quantity: i64,
}

/// Point-in-time copy of everything a forecast needs to know about one product.
///
/// Built by callers under whatever lock guards the product, then used lock-free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSnapshot {
    pub product_id: ProductId,
    pub shelf_life: ShelfLife,
    pub inventory: i64,
    pub sales: Vec<SalePoint>,
}

/// An ordered sequence of recorded sales, oldest first.
///
/// The engine only ever looks at the most recent `window` entries, so a bounded
/// ring buffer, a query result, or a full in-memory ledger are interchangeable.
pub trait SalesHistory {
    /// Quantities of the last `window` sales (or fewer), oldest first.
    fn recent_quantities(&self, window: usize) -> Vec<i64>;

    /// True when no sale was ever recorded.
    fn is_empty(&self) -> bool {
        self.recent_quantities(1).is_empty()
    }
}

fn tail<T, I>(iter: I, len: usize, window: usize) -> Vec<T>
where
    I: Iterator<Item = T>,
{
    iter.skip(len.saturating_sub(window)).collect()
}

impl SalesHistory for [SalePoint] {
    fn recent_quantities(&self, window: usize) -> Vec<i64> {
        tail(self.iter().map(|s| s.quantity), self.len(), window)
    }

    fn is_empty(&self) -> bool {
        <[SalePoint]>::is_empty(self)
    }
}

impl SalesHistory for Vec<SalePoint> {
    fn recent_quantities(&self, window: usize) -> Vec<i64> {
        self.as_slice().recent_quantities(window)
    }

    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl SalesHistory for VecDeque<SalePoint> {
    fn recent_quantities(&self, window: usize) -> Vec<i64> {
        tail(self.iter().map(|s| s.quantity), self.len(), window)
    }

    fn is_empty(&self) -> bool {
        VecDeque::is_empty(self)
    }
}

impl SalesHistory for [i64] {
    fn recent_quantities(&self, window: usize) -> Vec<i64> {
        tail(self.iter().copied(), self.len(), window)
    }

    fn is_empty(&self) -> bool {
        <[i64]>::is_empty(self)
    }
}

impl SalesHistory for Vec<i64> {
    fn recent_quantities(&self, window: usize) -> Vec<i64> {
        self.as_slice().recent_quantities(window)
    }

    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl SalesHistory for SalesSnapshot {
    fn recent_quantities(&self, window: usize) -> Vec<i64> {
        self.sales.recent_quantities(window)
    }

    fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(qtys: &[i64]) -> Vec<SalePoint> {
        let now = Utc::now();
        qtys.iter()
            .map(|&quantity| SalePoint { occurred_at: now, quantity })
            .collect()
    }

    #[test]
    fn recent_quantities_keeps_the_tail_in_order() {
        let history = points(&[1, 2, 3, 4, 5]);
        assert_eq!(history.recent_quantities(3), vec![3, 4, 5]);
        assert_eq!(history.recent_quantities(30), vec![1, 2, 3, 4, 5]);
        assert!(history.recent_quantities(0).is_empty());
    }

    #[test]
    fn ring_buffer_and_list_agree() {
        let list = points(&[4, 8, 15, 16, 23, 42]);
        let ring: VecDeque<SalePoint> = list.iter().cloned().collect();
        assert_eq!(list.recent_quantities(4), ring.recent_quantities(4));
        assert_eq!(ring.recent_quantities(4), vec![15, 16, 23, 42]);
    }

    #[test]
    fn empty_history_reports_empty() {
        let empty: Vec<i64> = Vec::new();
        assert!(SalesHistory::is_empty(&empty));
        assert!(!SalesHistory::is_empty(&vec![0i64]));
        assert!(SalesHistory::is_empty(&VecDeque::<SalePoint>::new()));
    }

    struct Tail(Vec<i64>);

    impl SalesHistory for Tail {
        fn recent_quantities(&self, window: usize) -> Vec<i64> {
            self.0.recent_quantities(window)
        }
    }

    #[test]
    fn default_is_empty_follows_recent_quantities() {
        assert!(SalesHistory::is_empty(&Tail(Vec::new())));
        assert!(!SalesHistory::is_empty(&Tail(vec![3])));
    }
}
