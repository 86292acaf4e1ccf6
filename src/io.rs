//! External collaborator contracts: command sources and event sinks.
//!
//! A connection owns one [`InputSource`]; the engine reports through one
//! shared [`OutputSink`]. Sinks: stdout as JSON lines, in-memory capture for
//! tests, or discard for benches.

use crate::types::{Command, OrderId};

/// Result of one blocking read from an input source.
#[derive(Clone, Debug)]
pub enum ReadResult {
    /// One well-formed command.
    Command(Command),
    /// Graceful end of stream; the connection terminates.
    EndOfFile,
    /// Unreadable or malformed input; reported, then the connection terminates.
    Error(String),
}

/// Blocking command source, one per connection.
pub trait InputSource: Send {
    fn read_command(&mut self) -> ReadResult;
}

/// One lifecycle or trade event. `timestamp` is monotonic microseconds
/// stamped at emission.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    OrderAdded {
        order_id: OrderId,
        instrument: String,
        price: i64,
        quantity: u64,
        is_sell: bool,
        timestamp: u64,
    },
    OrderExecuted {
        resting_order_id: OrderId,
        aggressor_order_id: OrderId,
        execution_id: u64,
        executed_price: i64,
        executed_quantity: u64,
        timestamp: u64,
    },
    OrderDeleted {
        order_id: OrderId,
        found: bool,
        timestamp: u64,
    },
}

/// Sink for engine events. Implementations write to stdout, a socket, or memory.
pub trait OutputSink: Send + Sync {
    fn emit(&self, event: &Event);
}

/// Writes one JSON line per event to stdout. Safe to use from multiple threads.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&self, event: &Event) {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{}", line);
        }
    }
}

/// Discards every event. For benchmarks.
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&self, _event: &Event) {}
}

/// In-memory sink that stores events for tests. Clone shares the same backing buffer.
#[derive(Clone, Default)]
pub struct MemorySink {
    events: std::sync::Arc<std::sync::Mutex<Vec<Event>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("lock").clone()
    }

    pub fn clear(&self) {
        self.events.lock().expect("lock").clear();
    }
}

impl OutputSink for MemorySink {
    fn emit(&self, event: &Event) {
        self.events.lock().expect("lock").push(event.clone());
    }
}

/// Scripted input source: yields queued commands in order, then end-of-stream.
pub struct VecSource {
    commands: std::vec::IntoIter<Command>,
}

impl VecSource {
    pub fn new(commands: Vec<Command>) -> Self {
        Self {
            commands: commands.into_iter(),
        }
    }
}

impl InputSource for VecSource {
    fn read_command(&mut self) -> ReadResult {
        match self.commands.next() {
            Some(command) => ReadResult::Command(command),
            None => ReadResult::EndOfFile,
        }
    }
}
