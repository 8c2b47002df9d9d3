use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use sliding_window::{SlidingWindow, SlidingWindowOptions};
use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");

    let window = SlidingWindow::with_options(SlidingWindowOptions {
        name: "bench_add",
        tick_stats: true,
        ..SlidingWindowOptions::new(Duration::from_secs(60), Duration::from_millis(100))
    })
    .unwrap();

    group.throughput(Throughput::Elements(1));
    group.bench_function("add_f64", |b| {
        let mut val = 0.0;
        b.iter(|| {
            window.add(black_box(val));
            val += 1.0;
        });
    });
    window.stop();
    if let Some(stats) = window.tick_lag_stats() {
        println!("add_f64 tick lag: p50={}ns p99={}ns max={}ns", stats.p50, stats.p99, stats.max);
    }

    group.finish();
}

fn bench_total(c: &mut Criterion) {
    let mut group = c.benchmark_group("total");

    // 3600 buckets so the full-window scan is the worst case
    let window = SlidingWindow::new_or_panic(Duration::from_secs(3600), Duration::from_secs(1));
    for i in 0..10000 {
        window.add(i as f64);
    }

    group.throughput(Throughput::Elements(1));
    group.bench_function("total_1_bucket", |b| {
        b.iter(|| black_box(window.total(black_box(Duration::from_secs(1)))));
    });
    group.bench_function("total_60_buckets", |b| {
        b.iter(|| black_box(window.total(black_box(Duration::from_secs(60)))));
    });
    group.bench_function("total_3600_buckets", |b| {
        b.iter(|| black_box(window.total(black_box(Duration::from_secs(3600)))));
    });
    group.bench_function("average_60_buckets", |b| {
        b.iter(|| black_box(window.average(black_box(Duration::from_secs(60)))));
    });

    window.stop();
    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");

    let window = Arc::new(SlidingWindow::new_or_panic(
        Duration::from_secs(10),
        Duration::from_millis(10),
    ));
    let running = Arc::new(AtomicBool::new(true));

    let writer = {
        let window = window.clone();
        let running = running.clone();
        thread::spawn(move || {
            while running.load(Ordering::Relaxed) {
                window.add(1.0);
            }
        })
    };

    group.throughput(Throughput::Elements(1));
    group.bench_function("total_under_writer", |b| {
        b.iter(|| black_box(window.total(black_box(Duration::from_secs(1)))));
    });

    running.store(false, Ordering::Relaxed);
    writer.join().unwrap();
    window.stop();
    group.finish();
}

criterion_group!(benches, bench_add, bench_total, bench_contended);
criterion_main!(benches);
