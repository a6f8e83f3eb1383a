//! Sharing one `RecyclePool` across threads.
//!
//! Each worker repeatedly borrows a scratch buffer from the pool, uses it, and
//! returns it. Instances released by one thread are handed out to whichever
//! thread asks next, so the number of allocations stays close to the number of
//! workers rather than the number of uses.

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use recycle_pool::{ObjectFactory, RecyclePool};

const WORKERS: usize = 4;
const ROUNDS: usize = 25_000;

#[derive(Debug)]
struct ScratchFactory {
    allocations: Arc<AtomicUsize>,
}

impl ObjectFactory for ScratchFactory {
    type Item = Vec<u64>;
    type Error = Infallible;

    fn create(&self) -> Result<Self::Item, Self::Error> {
        self.allocations.fetch_add(1, Ordering::Relaxed);
        Ok(Vec::with_capacity(1024))
    }

    fn destroy(&self, _scratch: Self::Item) -> Result<(), Self::Error> {
        Ok(())
    }
}

fn main() -> Result<(), Infallible> {
    let allocations = Arc::new(AtomicUsize::new(0));
    let factory = ScratchFactory {
        allocations: Arc::clone(&allocations),
    };

    let pool = RecyclePool::new(factory, WORKERS);

    thread::scope(|s| {
        for worker in 0..WORKERS {
            let pool = &pool;

            s.spawn(move || {
                for round in 0..ROUNDS {
                    let mut scratch = pool.acquire().unwrap();

                    scratch.extend((0..16_usize).map(|i| (worker * round + i) as u64));
                    scratch.clear();

                    pool.release(scratch).unwrap();
                }
            });
        }
    });

    println!(
        "{} round trips used {} allocation(s)",
        WORKERS * ROUNDS,
        allocations.load(Ordering::Relaxed)
    );

    Ok(())
}
