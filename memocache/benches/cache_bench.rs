//! Criterion benchmarks for memocache: hit path, miss path, contended hits.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use memocache::TtlCache;

const TTL: Duration = Duration::from_secs(60);

fn bench_hit(c: &mut Criterion) {
    let cache: TtlCache<String, usize> = TtlCache::new();
    cache.get_or_compute("apple".to_string(), |s| s.len(), TTL);

    let mut g = c.benchmark_group("hit");
    g.throughput(Throughput::Elements(1));
    g.bench_function("get_or_compute", |b| {
        b.iter(|| black_box(cache.get_or_compute("apple".to_string(), |s| s.len(), TTL)));
    });
    g.finish();
}

fn bench_miss(c: &mut Criterion) {
    let cache: TtlCache<u64, u64> = TtlCache::new();

    let mut g = c.benchmark_group("miss");
    g.throughput(Throughput::Elements(1));
    g.bench_function("zero_ttl", |b| {
        b.iter(|| black_box(cache.get_or_compute(7, |k| k * 2, Duration::ZERO)));
    });
    g.finish();
}

fn bench_contended_hits(c: &mut Criterion) {
    const OPS_PER_THREAD: u64 = 1_000;

    let mut g = c.benchmark_group("contended_hits");
    for threads in [1usize, 2, 4, 8] {
        let cache: Arc<TtlCache<u64, u64>> = Arc::new(TtlCache::new());
        for key in 0..16 {
            cache.get_or_compute(key, |k| k * 2, TTL);
        }

        g.throughput(Throughput::Elements(threads as u64 * OPS_PER_THREAD));
        g.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let cache = Arc::clone(&cache);
                        thread::spawn(move || {
                            for i in 0..OPS_PER_THREAD {
                                black_box(cache.get_or_compute(i % 16, |k| k * 2, TTL));
                            }
                        })
                    })
                    .collect();
                for h in handles {
                    h.join().unwrap();
                }
            });
        });
    }
    g.finish();
}

criterion_group!(benches, bench_hit, bench_miss, bench_contended_hits);
criterion_main!(benches);
