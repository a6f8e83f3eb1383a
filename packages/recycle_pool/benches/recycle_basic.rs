//! Basic benchmarks for the `recycle_pool` package.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::convert::Infallible;
use std::hint::black_box;
use std::thread;
use std::time::Instant;

use criterion::{Criterion, criterion_group, criterion_main};
use recycle_pool::{ObjectFactory, RecyclePool};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

const BUFFER_LEN: usize = 4096;

struct BufferFactory;

impl ObjectFactory for BufferFactory {
    type Item = Vec<u8>;
    type Error = Infallible;

    fn create(&self) -> Result<Self::Item, Self::Error> {
        Ok(vec![0; BUFFER_LEN])
    }

    fn destroy(&self, _buffer: Self::Item) -> Result<(), Self::Error> {
        Ok(())
    }
}

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("rp_single_thread");

    group.bench_function("round_trip_hit", |b| {
        let pool = RecyclePool::new(BufferFactory, 16);

        // Prime one slot so every iteration is a cache hit.
        let buffer = pool.acquire().unwrap();
        pool.release(buffer).unwrap();

        b.iter(|| {
            let buffer = pool.acquire().unwrap();
            pool.release(black_box(buffer)).unwrap();
        });
    });

    group.bench_function("round_trip_miss", |b| {
        let pool = RecyclePool::new(BufferFactory, 16);

        // Nothing is ever released, so every acquire misses and creates.
        b.iter(|| {
            let buffer = pool.acquire().unwrap();
            drop(black_box(buffer));
        });
    });

    group.bench_function("factory_direct", |b| {
        let factory = BufferFactory;

        b.iter(|| {
            let buffer = factory.create().unwrap();
            factory.destroy(black_box(buffer)).unwrap();
        });
    });

    group.finish();

    let mut contended_group = c.benchmark_group("rp_contended");

    for threads in [2_usize, 8] {
        contended_group.bench_function(format!("round_trip_{threads}_threads"), |b| {
            b.iter_custom(|iters| {
                let pool = RecyclePool::new(BufferFactory, threads);

                let start = Instant::now();

                thread::scope(|s| {
                    for _ in 0..threads {
                        s.spawn(|| {
                            for _ in 0..iters {
                                let buffer = pool.acquire().unwrap();
                                pool.release(black_box(buffer)).unwrap();
                            }
                        });
                    }
                });

                start.elapsed()
            });
        });
    }

    contended_group.finish();
}
