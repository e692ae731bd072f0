use std::hint::black_box;
use std::sync::Arc;
use std::thread;

use criterion::{criterion_group, criterion_main, Criterion};

use rollup::record::parse_record;
use rollup::store::AggregateStore;

fn bench_parse_record(c: &mut Criterion) {
    let line = "Yellowknife;-23.4";
    c.bench_function("parse_record", |b| {
        b.iter(|| {
            black_box(parse_record(black_box(line), ';').unwrap());
        });
    });
}

fn bench_fold_single_thread(c: &mut Criterion) {
    let store = AggregateStore::new(1);
    let mut i = 0u64;
    c.bench_function("fold_single_thread", |b| {
        b.iter(|| {
            i = i.wrapping_add(1);
            store.fold(black_box("Yellowknife"), black_box((i % 100) as f64));
        });
    });
}

fn bench_fold_contended(c: &mut Criterion) {
    // Eight threads hammering ten keys, measuring wall time for a fixed
    // amount of total work.
    c.bench_function("fold_8_threads_10_keys", |b| {
        b.iter(|| {
            let store = Arc::new(AggregateStore::new(8));
            let handles: Vec<_> = (0..8)
                .map(|t| {
                    let store = Arc::clone(&store);
                    thread::spawn(move || {
                        for i in 0..1000u64 {
                            let key = format!("station{}", (t + i) % 10);
                            store.fold(&key, i as f64);
                        }
                    })
                })
                .collect();
            for h in handles {
                h.join().unwrap();
            }
            black_box(store.key_count());
        });
    });
}

criterion_group!(
    benches,
    bench_parse_record,
    bench_fold_single_thread,
    bench_fold_contended
);
criterion_main!(benches);
