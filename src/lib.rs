//! # Crossbook Matching Engine
//!
//! Limit-order matching engine with a single combined book spanning all
//! instruments: price-time priority matching, per-order execution ids, and
//! per-order-id command serialization across concurrent connections.
//!
//! ## Entry point
//!
//! Use [`Engine`] as the single entry point: create with [`Engine::new`]
//! around an [`OutputSink`], then either hand connections to
//! [`Engine::accept`] or drive it directly with [`Engine::run_locked`].
//!
//! ## Example
//!
//! ```rust
//! use crossbook_matching_engine::{Command, Engine, Event, MemorySink, OrderId, Side};
//! use std::sync::Arc;
//!
//! let sink = MemorySink::new();
//! let engine = Engine::new(Arc::new(sink.clone()));
//! let events = engine.run_locked(Command::New {
//!     order_id: OrderId(1),
//!     instrument: "ABC".into(),
//!     price: 100,
//!     quantity: 10,
//!     side: Side::Buy,
//! });
//! assert!(matches!(events[0], Event::OrderAdded { .. }));
//! ```
//!
//! ## Lower-level API
//!
//! [`OrderBook`] and [`match_order`] can be used directly if you manage
//! timestamps and event delivery yourself.

pub mod api;
pub mod clock;
pub mod command_gen;
pub mod engine;
pub mod io;
pub mod matching;
pub mod order_book;
pub mod proto;
pub mod types;

pub use command_gen::{Generator, GeneratorConfig};
pub use engine::Engine;
pub use io::{Event, InputSource, MemorySink, NullSink, OutputSink, ReadResult, StdoutSink, VecSource};
pub use matching::match_order;
pub use order_book::{Fill, OrderBook};
pub use proto::{parse_line, LineSource};
pub use types::{Command, Order, OrderId, Side};
