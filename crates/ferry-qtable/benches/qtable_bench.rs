//! Benchmarks for Ferry value tables
//!
//! Measures performance of:
//! - Live updates against neighbor sets of growing size
//! - Aging a departed next hop
//! - Two-way synchronization

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ferry_ens::{ConnectionLedger, EncounteredNodeSet, NodeId, Observation};
use ferry_qtable::{age_next_hop, synchronize, update_live, LearningParams, ValueTable};

fn ids(n: u64) -> Vec<NodeId> {
    (0..n).map(NodeId).collect()
}

/// Table with every pair seeded to a small non-zero value.
fn seeded_table(owner: u64, n: u64, value: f64) -> ValueTable {
    let mut table = ValueTable::new(NodeId(owner));
    let all = ids(n);
    table.initialize_all(&all);
    for d in &all {
        for h in &all {
            if *d != table.owner() && *h != table.owner() {
                table.set(*d, *h, value * ((d.0 + h.0) % 7 + 1) as f64 / 7.0);
            }
        }
    }
    table
}

fn bench_update_live(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_live");
    let params = LearningParams::default();

    for &n in &[10u64, 100, 500] {
        let mut neighbor = EncounteredNodeSet::new(NodeId(1));
        for peer in 2..n {
            neighbor.record_encounter(Observation::new(NodeId(peer), peer as f64));
        }
        let mut table = seeded_table(0, n, 0.5);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("neighbors", n), &n, |b, _| {
            b.iter(|| {
                update_live(
                    &mut table,
                    black_box(NodeId(2)),
                    NodeId(1),
                    &neighbor,
                    0.75,
                    &params,
                )
            })
        });
    }
    group.finish();
}

fn bench_aging(c: &mut Criterion) {
    let mut group = c.benchmark_group("age_next_hop");
    let params = LearningParams::default();

    for &n in &[10u64, 100, 500] {
        let mut ledger = ConnectionLedger::new();
        ledger.start(NodeId(0), NodeId(1), 0.0);
        ledger.end(NodeId(0), NodeId(1), 10.0);
        let base = seeded_table(0, n, 0.9);

        group.bench_with_input(BenchmarkId::new("destinations", n), &n, |b, _| {
            b.iter_batched(
                || base.clone(),
                |mut table| {
                    age_next_hop(
                        &mut table,
                        NodeId(1),
                        ledger.get(NodeId(0), NodeId(1)),
                        black_box(500.0),
                        &params,
                    )
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_synchronize(c: &mut Criterion) {
    let mut group = c.benchmark_group("synchronize");

    for &n in &[10u64, 50, 200] {
        let a = seeded_table(0, n, 0.4);
        let b = seeded_table(1, n, 0.8);

        group.throughput(Throughput::Elements(n * n));
        group.bench_with_input(BenchmarkId::new("nodes", n), &n, |bench, _| {
            bench.iter_batched(
                || (a.clone(), b.clone()),
                |(mut a, mut b)| synchronize(&mut a, &mut b),
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_update_live, bench_aging, bench_synchronize);
criterion_main!(benches);
