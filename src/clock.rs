//! Process-wide monotonic microsecond clock.
//!
//! Stamps order arrival (the tie-break in price-time priority) and every
//! emitted event. Values are non-decreasing for the life of the process;
//! equal readings between distinct calls are allowed.

use std::sync::OnceLock;
use std::time::Instant;

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Microseconds elapsed since the first call in this process.
pub fn monotonic_micros() -> u64 {
    let epoch = EPOCH.get_or_init(Instant::now);
    epoch.elapsed().as_micros() as u64
}
