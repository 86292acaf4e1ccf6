//! Engine performance benchmarks (Criterion).
//!
//! Run: `cargo bench` or `cargo bench --bench engine`.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use crossbook_matching_engine::{
    Command, Engine, Generator, GeneratorConfig, NullSink, OrderId,
};
use std::sync::Arc;

fn bench_command_throughput(c: &mut Criterion) {
    const N: usize = 1000;
    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(N as u64));
    group.bench_function("process_command_1000", |b| {
        b.iter_batched(
            || {
                let config = GeneratorConfig {
                    seed: 42,
                    num_commands: N,
                    ..Default::default()
                };
                let engine = Engine::new(Arc::new(NullSink));
                let commands = Generator::new(config).all_commands();
                (engine, commands)
            },
            |(engine, commands)| {
                for command in commands {
                    let _ = engine.run_locked(command);
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_cancel_order(c: &mut Criterion) {
    const RESTING: usize = 500;
    const CANCELS_PER_ITER: usize = 100;
    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(CANCELS_PER_ITER as u64));
    group.bench_function("cancel_100_after_500_resting", |b| {
        b.iter_batched(
            || {
                let config = GeneratorConfig {
                    seed: 123,
                    num_commands: RESTING,
                    cancel_ratio: 0.0,
                    ..Default::default()
                };
                let engine = Engine::new(Arc::new(NullSink));
                let commands = Generator::new(config).all_commands();
                let cancel_ids: Vec<OrderId> = commands
                    .iter()
                    .take(CANCELS_PER_ITER)
                    .map(|c| c.order_id())
                    .collect();
                for command in commands {
                    let _ = engine.run_locked(command);
                }
                (engine, cancel_ids)
            },
            |(engine, cancel_ids)| {
                for order_id in cancel_ids {
                    let _ = engine.run_locked(Command::Cancel { order_id });
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_command_throughput, bench_cancel_order);
criterion_main!(benches);
