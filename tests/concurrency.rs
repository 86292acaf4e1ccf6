//! Concurrency tests: detached connection workers over scripted sources.
//!
//! Workers are fire-and-forget, so completion is observed through the book
//! and the sink rather than by joining.

use crossbook_matching_engine::{Command, Engine, Event, MemorySink, OrderId, ReadResult, Side};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn new_cmd(id: u64, instrument: &str, price: i64, qty: u64, side: Side) -> Command {
    Command::New {
        order_id: OrderId(id),
        instrument: instrument.into(),
        price,
        quantity: qty,
        side,
    }
}

fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    done()
}

/// Commands on pairwise-disjoint order ids (and non-crossing books) end in
/// the same final state regardless of how the workers interleave.
#[test]
fn disjoint_id_workers_converge_to_same_book() {
    let _ = env_logger::try_init();
    const WORKERS: u64 = 4;
    const ORDERS_PER_WORKER: u64 = 50;

    let sink = MemorySink::new();
    let engine = Arc::new(Engine::new(Arc::new(sink.clone())));

    for worker in 0..WORKERS {
        // Separate instruments and buys only, so streams never cross.
        let instrument = format!("INST{}", worker);
        let commands: Vec<Command> = (0..ORDERS_PER_WORKER)
            .map(|i| {
                let id = worker * ORDERS_PER_WORKER + i + 1;
                new_cmd(id, &instrument, 100 + i as i64, 1 + i, Side::Buy)
            })
            .collect();
        engine.accept(crossbook_matching_engine::VecSource::new(commands));
    }

    let expected = (WORKERS * ORDERS_PER_WORKER) as usize;
    assert!(
        wait_until(Duration::from_secs(10), || engine.resting_orders() == expected),
        "all workers drained: {} of {} orders resting",
        engine.resting_orders(),
        expected
    );

    // Every order rests with its full quantity; nothing crossed.
    for worker in 0..WORKERS {
        for i in 0..ORDERS_PER_WORKER {
            let id = worker * ORDERS_PER_WORKER + i + 1;
            assert_eq!(engine.resting_quantity(OrderId(id)), Some(1 + i));
        }
    }
    let events = sink.events();
    assert_eq!(events.len(), expected);
    assert!(events.iter().all(|e| matches!(e, Event::OrderAdded { .. })));
}

/// A worker whose source reports an error terminates after the commands it
/// already read; other connections are unaffected.
#[test]
fn source_error_terminates_only_that_worker() {
    let _ = env_logger::try_init();

    struct FailingSource {
        sent: bool,
    }

    impl crossbook_matching_engine::InputSource for FailingSource {
        fn read_command(&mut self) -> ReadResult {
            if self.sent {
                ReadResult::Error("broken frame".into())
            } else {
                self.sent = true;
                ReadResult::Command(Command::New {
                    order_id: OrderId(1),
                    instrument: "ABC".into(),
                    price: 100,
                    quantity: 5,
                    side: Side::Buy,
                })
            }
        }
    }

    let engine = Arc::new(Engine::new(Arc::new(MemorySink::new())));
    engine.accept(FailingSource { sent: false });
    engine.accept(crossbook_matching_engine::VecSource::new(vec![new_cmd(
        2,
        "XYZ",
        100,
        7,
        Side::Buy,
    )]));

    assert!(
        wait_until(Duration::from_secs(10), || engine.resting_orders() == 2),
        "both pre-error commands landed"
    );
    assert_eq!(engine.resting_quantity(OrderId(1)), Some(5));
    assert_eq!(engine.resting_quantity(OrderId(2)), Some(7));
}

/// Two workers racing on the same instrument still conserve quantity: the
/// total executed plus total resting equals the total submitted.
#[test]
fn crossing_workers_conserve_quantity() {
    let _ = env_logger::try_init();
    const N: u64 = 100;

    let sink = MemorySink::new();
    let engine = Arc::new(Engine::new(Arc::new(sink.clone())));

    let buys: Vec<Command> = (0..N).map(|i| new_cmd(i + 1, "ABC", 100, 10, Side::Buy)).collect();
    let sells: Vec<Command> = (0..N)
        .map(|i| new_cmd(N + i + 1, "ABC", 100, 10, Side::Sell))
        .collect();
    engine.accept(crossbook_matching_engine::VecSource::new(buys));
    engine.accept(crossbook_matching_engine::VecSource::new(sells));

    // Per command: submitted quantity = its executed total + its rested
    // residual. The resting half of a later execution was already counted by
    // that order's Added event, so summing Executed once plus Added once over
    // all events reaches the total submitted exactly when all workers drain.
    let submitted = 2 * N * 10;
    let accounted = || {
        let events = sink.events();
        let executed: u64 = events
            .iter()
            .filter_map(|e| match e {
                Event::OrderExecuted { executed_quantity, .. } => Some(*executed_quantity),
                _ => None,
            })
            .sum();
        let rested: u64 = events
            .iter()
            .filter_map(|e| match e {
                Event::OrderAdded { quantity, .. } => Some(*quantity),
                _ => None,
            })
            .sum();
        executed + rested
    };
    assert!(
        wait_until(Duration::from_secs(10), || accounted() == submitted),
        "accounted {} of {} submitted quantity",
        accounted(),
        submitted
    );
}
