//! Engine: one combined order book, per-order-id command serialization, and
//! event emission.
//!
//! Each order id owns a dedicated lock, created on first sight and retained
//! for the life of the engine, so at most one command per id is in flight at
//! a time. The book itself sits behind its own mutex, which serializes all
//! book mutation; commands on different ids therefore cannot race inside the
//! shared structure. Within one command, every `OrderExecuted` event
//! precedes the terminal `OrderAdded`/`OrderDeleted` event.

use crate::clock::monotonic_micros;
use crate::io::{Event, InputSource, OutputSink, ReadResult};
use crate::matching::match_order;
use crate::order_book::OrderBook;
use crate::types::{Command, Order, OrderId};
use log::{error, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct Engine {
    book: Mutex<OrderBook>,
    /// order_id -> its lock. Entries are created on first sight and never removed.
    order_locks: Mutex<HashMap<u64, Arc<Mutex<()>>>>,
    sink: Arc<dyn OutputSink>,
}

impl Engine {
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self {
            book: Mutex::new(OrderBook::new()),
            order_locks: Mutex::new(HashMap::new()),
            sink,
        }
    }

    /// Start one detached worker for `source`. The worker runs until the
    /// source reports end-of-stream or an error; it is not joined or tracked.
    pub fn accept<S: InputSource + 'static>(self: &Arc<Self>, source: S) {
        let engine = Arc::clone(self);
        std::thread::spawn(move || engine.connection_loop(source));
    }

    fn connection_loop<S: InputSource>(&self, mut source: S) {
        loop {
            match source.read_command() {
                ReadResult::Error(e) => {
                    error!("error reading input: {}", e);
                    return;
                }
                ReadResult::EndOfFile => return,
                ReadResult::Command(command) => {
                    self.run_locked(command);
                }
            }
        }
    }

    /// Acquire the command's per-id lock, process it, and return the events
    /// it produced. Entry point for every adapter, connection loop or not.
    pub fn run_locked(&self, command: Command) -> Vec<Event> {
        let lock = self.order_lock(command.order_id());
        let _guard = lock.lock().expect("lock");
        self.process_command(command)
    }

    /// The lock owned by `order_id`, created on first sight. The map insert
    /// is guarded by the map's own mutex, released before the per-id lock is
    /// taken.
    fn order_lock(&self, order_id: OrderId) -> Arc<Mutex<()>> {
        let mut locks = self.order_locks.lock().expect("lock");
        Arc::clone(locks.entry(order_id.0).or_default())
    }

    /// Dispatch one command and return the events it produced (also forwarded
    /// to the sink). Caller must hold the command's per-id lock; use
    /// [`Engine::run_locked`] unless already inside it.
    pub fn process_command(&self, command: Command) -> Vec<Event> {
        match command {
            Command::Cancel { order_id } => {
                // The book guard stays held through emission so events leave
                // the engine in the same order the book changed.
                let mut book = self.book.lock().expect("lock");
                let found = book.cancel_order(order_id);
                info!("cancel order_id={} found={}", order_id.0, found);
                vec![self.emit(Event::OrderDeleted {
                    order_id,
                    found,
                    timestamp: monotonic_micros(),
                })]
            }
            Command::New {
                order_id,
                instrument,
                price,
                quantity,
                side,
            } => {
                let mut order = Order {
                    order_id,
                    instrument,
                    price,
                    quantity,
                    side,
                    timestamp: monotonic_micros(),
                };
                info!(
                    "new order order_id={} instrument={} side={:?} quantity={} price={}",
                    order.order_id.0, order.instrument, order.side, order.quantity, order.price
                );
                let mut book = self.book.lock().expect("lock");
                let fills = match_order(&mut book, &mut order);
                let rested = order.quantity > 0;
                if rested {
                    book.insert_resting(&order);
                }

                let mut events = Vec::with_capacity(fills.len() + 1);
                for fill in fills {
                    events.push(self.emit(Event::OrderExecuted {
                        resting_order_id: fill.resting_order_id,
                        aggressor_order_id: order.order_id,
                        execution_id: fill.execution_id,
                        executed_price: fill.price,
                        executed_quantity: fill.quantity,
                        timestamp: monotonic_micros(),
                    }));
                }
                if rested {
                    events.push(self.emit(Event::OrderAdded {
                        order_id: order.order_id,
                        instrument: order.instrument.clone(),
                        price: order.price,
                        quantity: order.quantity,
                        is_sell: order.side.is_sell(),
                        timestamp: monotonic_micros(),
                    }));
                }
                events
            }
        }
    }

    /// Number of resting orders across all instruments.
    pub fn resting_orders(&self) -> usize {
        self.book.lock().expect("lock").len()
    }

    /// Remaining open quantity of a resting order, if it is live.
    pub fn resting_quantity(&self, order_id: OrderId) -> Option<u64> {
        self.book
            .lock()
            .expect("lock")
            .resting(order_id)
            .map(|o| o.quantity)
    }

    fn emit(&self, event: Event) -> Event {
        self.sink.emit(&event);
        event
    }
}
