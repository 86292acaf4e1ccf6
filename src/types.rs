//! Core order and command types.
//!
//! [`Order`] is the value record for one limit order; [`Command`] is the
//! inbound message a connection delivers to the engine.

/// Unique order identifier, assigned by the caller. Unique among live orders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct OrderId(pub u64);

/// Order side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side an incoming order matches against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    pub fn is_sell(self) -> bool {
        matches!(self, Side::Sell)
    }
}

/// A single limit order.
///
/// `price` is in minor currency units. `quantity` is the remaining open
/// amount and stays strictly positive while the order is live. `timestamp`
/// is the monotonic tick captured at creation; it only breaks price ties
/// and is never recomputed, so a resting order's position in the book is
/// stable across partial fills.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub instrument: String,
    pub price: i64,
    pub quantity: u64,
    pub side: Side,
    pub timestamp: u64,
}

/// Inbound command from a connection.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Command {
    New {
        order_id: OrderId,
        instrument: String,
        price: i64,
        quantity: u64,
        side: Side,
    },
    Cancel {
        order_id: OrderId,
    },
}

impl Command {
    /// The order id this command touches; owns the lock the command runs under.
    pub fn order_id(&self) -> OrderId {
        match self {
            Command::New { order_id, .. } | Command::Cancel { order_id } => *order_id,
        }
    }
}
