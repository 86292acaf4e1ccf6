//! Price-time priority matching.
//!
//! [`match_order`] runs one incoming order against the opposite side of the
//! combined book: best price first, FIFO within a price, instrument filtered
//! per candidate. Fills execute at the resting order's price. There is no
//! self-trade prevention; an aggressor may trade with an order it rested
//! earlier under a different id.

use crate::order_book::{Fill, OrderBook};
use crate::types::{Order, Side};

/// Match `order` against the opposite side of `book`. The order's quantity
/// is reduced in place by the total executed amount; the caller rests the
/// order if any quantity survives. Returns one fill per resting order
/// consumed, in priority order.
pub fn match_order(book: &mut OrderBook, order: &mut Order) -> Vec<Fill> {
    let fills = match order.side {
        Side::Buy => book.take_from_asks(&order.instrument, order.price, order.quantity),
        Side::Sell => book.take_from_bids(&order.instrument, order.price, order.quantity),
    };
    let executed: u64 = fills.iter().map(|f| f.quantity).sum();
    order.quantity -= executed;
    fills
}
