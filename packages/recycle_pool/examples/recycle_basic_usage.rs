//! Basic usage of `RecyclePool`: recycling buffers instead of reallocating them.

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use recycle_pool::{ObjectFactory, RecyclePool};

/// Hands out fixed-size buffers and counts how many it actually had to allocate.
#[derive(Debug)]
struct BufferFactory {
    allocations: Arc<AtomicUsize>,
}

impl ObjectFactory for BufferFactory {
    type Item = Vec<u8>;
    type Error = Infallible;

    fn create(&self) -> Result<Self::Item, Self::Error> {
        self.allocations.fetch_add(1, Ordering::Relaxed);
        Ok(Vec::with_capacity(4096))
    }

    fn destroy(&self, _buffer: Self::Item) -> Result<(), Self::Error> {
        Ok(())
    }
}

fn main() -> Result<(), Infallible> {
    let allocations = Arc::new(AtomicUsize::new(0));
    let factory = BufferFactory {
        allocations: Arc::clone(&allocations),
    };

    let pool = RecyclePool::new(factory, 4);

    for message in 0..8 {
        let mut buffer = pool.acquire()?;

        buffer.extend_from_slice(format!("message {message}").as_bytes());
        println!("processed {} bytes", buffer.len());

        // Recycled instances come back as-is, so reset state before releasing.
        buffer.clear();
        pool.release(buffer)?;
    }

    println!(
        "8 messages processed with {} buffer allocation(s)",
        allocations.load(Ordering::Relaxed)
    );
    println!("pool state after the run: {pool:?}");

    Ok(())
}
