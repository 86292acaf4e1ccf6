//! Combined order book: one bid side and one ask side spanning all instruments.
//!
//! Orders rest in priority order (best price first, FIFO within a price) with
//! instruments interleaved by price; eligibility is filtered per candidate
//! during a take, so a scan's cost is proportional to the resting orders it
//! visits. Supports inserting a resting order, cancel by id, and taking
//! liquidity (used by [`crate::matching`]).

use crate::types::{Order, OrderId, Side};
use std::collections::{BTreeMap, HashMap};

/// Position of an order within one side: (price priority, arrival tick, order id).
///
/// The price component is negated for bids so both sides iterate best-first
/// in ascending key order. The order id only disambiguates equal timestamps;
/// relative order of equal-timestamp orders is unspecified. Quantity is not
/// part of the key, so partial fills mutate in place and never move an order.
type BookKey = (i64, u64, u64);

fn book_key(order: &Order) -> BookKey {
    let price_priority = match order.side {
        Side::Buy => -order.price,
        Side::Sell => order.price,
    };
    (price_priority, order.timestamp, order.order_id.0)
}

/// One fill taken from the book (one per resting order touched).
#[derive(Clone, Debug)]
pub struct Fill {
    pub resting_order_id: OrderId,
    /// Execution id allocated against the resting order (its counter, incremented).
    pub execution_id: u64,
    /// The resting order's price; the incoming order gets any improvement.
    pub price: i64,
    pub quantity: u64,
    /// True if the resting order was fully consumed and removed.
    pub resting_fully_filled: bool,
}

/// Combined order book plus the id index and per-order execution counters.
#[derive(Debug, Default)]
pub struct OrderBook {
    bids: BTreeMap<BookKey, Order>,
    asks: BTreeMap<BookKey, Order>,
    /// order_id -> location of the live order. Exactly one entry per resting order.
    index: HashMap<OrderId, (Side, BookKey)>,
    /// Last execution id issued per resting order. Exists iff the order is indexed;
    /// starts at 0 when the order begins resting.
    exec_counters: HashMap<OrderId, u64>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an order that survived matching with quantity still open.
    /// Creates its index entry and a zero-valued execution counter.
    pub fn insert_resting(&mut self, order: &Order) {
        debug_assert!(order.quantity > 0, "resting order must have open quantity");
        let key = book_key(order);
        let book = match order.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        book.insert(key, order.clone());
        self.index.insert(order.order_id, (order.side, key));
        self.exec_counters.insert(order.order_id, 0);
    }

    /// Remove an order by id. Returns false if the id is not resting.
    /// This is the sole cancellation path.
    pub fn cancel_order(&mut self, order_id: OrderId) -> bool {
        let Some((side, key)) = self.index.remove(&order_id) else {
            return false;
        };
        let book = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        book.remove(&key);
        self.exec_counters.remove(&order_id);
        true
    }

    /// Take liquidity from the ask side for an incoming buy with limit
    /// `price_limit`. Fills are returned in priority order of the resting
    /// orders consumed.
    pub fn take_from_asks(&mut self, instrument: &str, price_limit: i64, quantity: u64) -> Vec<Fill> {
        self.take_side(Side::Sell, instrument, quantity, |resting_price| {
            price_limit >= resting_price
        })
    }

    /// Take liquidity from the bid side for an incoming sell with limit `price_limit`.
    pub fn take_from_bids(&mut self, instrument: &str, price_limit: i64, quantity: u64) -> Vec<Fill> {
        self.take_side(Side::Buy, instrument, quantity, |resting_price| {
            price_limit <= resting_price
        })
    }

    fn take_side(
        &mut self,
        book_side: Side,
        instrument: &str,
        mut quantity: u64,
        crosses: impl Fn(i64) -> bool,
    ) -> Vec<Fill> {
        let Self {
            bids,
            asks,
            index,
            exec_counters,
        } = self;
        let book = match book_side {
            Side::Buy => bids,
            Side::Sell => asks,
        };
        let mut fills = Vec::new();
        let mut consumed: Vec<(BookKey, OrderId)> = Vec::new();
        for (key, resting) in book.iter_mut() {
            if quantity == 0 {
                break;
            }
            // Instruments interleave by price, so an ineligible candidate never
            // ends the scan; a later candidate of the right instrument may cross.
            if resting.instrument != instrument || !crosses(resting.price) {
                continue;
            }
            let executed = quantity.min(resting.quantity);
            let counter = exec_counters.entry(resting.order_id).or_insert(0);
            *counter += 1;
            fills.push(Fill {
                resting_order_id: resting.order_id,
                execution_id: *counter,
                price: resting.price,
                quantity: executed,
                resting_fully_filled: executed == resting.quantity,
            });
            quantity -= executed;
            if executed == resting.quantity {
                consumed.push((*key, resting.order_id));
            } else {
                // Quantity is not part of the key: in-place update, position unchanged.
                resting.quantity -= executed;
            }
        }
        for (key, order_id) in consumed {
            book.remove(&key);
            index.remove(&order_id);
            exec_counters.remove(&order_id);
        }
        fills
    }

    /// The live order stored under `order_id`, if any.
    pub fn resting(&self, order_id: OrderId) -> Option<&Order> {
        let (side, key) = self.index.get(&order_id)?;
        match side {
            Side::Buy => self.bids.get(key),
            Side::Sell => self.asks.get(key),
        }
    }

    /// Number of resting orders across both sides and all instruments.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
