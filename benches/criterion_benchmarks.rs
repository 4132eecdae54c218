use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use policy_cache::policy::{Fifo, Lru, PolicyKind};
use policy_cache::BoundedCache;
use std::num::NonZeroUsize;

const CACHE_SIZE: usize = 1000;

fn make(kind: PolicyKind, cap: usize) -> BoundedCache<usize, usize, PolicyKind> {
    BoundedCache::new(NonZeroUsize::new(cap).unwrap(), kind)
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Cache Operations");

    for kind in PolicyKind::ALL {
        let mut cache = make(kind, CACHE_SIZE);
        for i in 0..CACHE_SIZE {
            cache.put(i, i);
        }

        group.bench_function(BenchmarkId::new("get hit", kind), |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });

        group.bench_function(BenchmarkId::new("get miss", kind), |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i + CACHE_SIZE)));
                }
            });
        });

        group.bench_function(BenchmarkId::new("put existing", kind), |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.put(i % CACHE_SIZE, i));
                }
            });
        });

        // Every put past the fill evicts
        let mut next = CACHE_SIZE;
        group.bench_function(BenchmarkId::new("put evicting", kind), |b| {
            b.iter(|| {
                for _ in 0..100 {
                    black_box(cache.put(next, next));
                    next += 1;
                }
            });
        });
    }

    group.finish();
}

fn static_vs_runtime_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("Policy Dispatch");

    let mut runtime = make(PolicyKind::Lru, CACHE_SIZE);
    let mut fixed: BoundedCache<usize, usize, Lru> =
        BoundedCache::new(NonZeroUsize::new(CACHE_SIZE).unwrap(), Lru);
    for i in 0..CACHE_SIZE {
        runtime.put(i, i);
        fixed.put(i, i);
    }

    group.bench_function("LRU runtime", |b| {
        b.iter(|| {
            for i in 0..100 {
                black_box(runtime.get(&(i * 7 % CACHE_SIZE)));
                black_box(runtime.put(i + CACHE_SIZE, i));
            }
        });
    });

    group.bench_function("LRU static", |b| {
        b.iter(|| {
            for i in 0..100 {
                black_box(fixed.get(&(i * 7 % CACHE_SIZE)));
                black_box(fixed.put(i + CACHE_SIZE, i));
            }
        });
    });

    group.bench_function("FIFO with listener", |b| {
        let mut cache: BoundedCache<usize, usize, Fifo> =
            BoundedCache::new(NonZeroUsize::new(CACHE_SIZE).unwrap(), Fifo);
        let mut discarded = 0usize;
        cache.set_discard_listener(move |k, _| discarded = discarded.wrapping_add(*k));
        let mut next = 0usize;
        b.iter(|| {
            for _ in 0..100 {
                black_box(cache.put(next, next));
                next += 1;
            }
        });
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark, static_vs_runtime_policy);
criterion_main!(benches);
