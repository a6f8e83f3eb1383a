//! This package provides [`RecyclePool`], a bounded, lock-free pool that recycles
//! objects between concurrent callers.
//!
//! The pool sits in front of an [`ObjectFactory`] that knows how to create and destroy
//! instances of some resource. Acquiring from the pool hands back a recently released
//! instance when one is cached, and falls through to the factory otherwise. Releasing
//! caches the instance in a fixed-size slot array, or hands it back to the factory for
//! destruction when every slot is taken.
//!
//! All coordination happens through atomic compare-and-swap operations on a single
//! reservation counter and on the individual slots. There are no locks and no blocking
//! primitives anywhere: the pool is lock-free (some thread always makes progress),
//! though an individual thread may retry under sustained contention.
//!
//! # Features
//!
//! - **Lock-free**: acquire and release are short CAS loops; no mutex, no parking.
//! - **Bounded**: at most `capacity` instances are cached; excess releases are
//!   destroyed through the factory.
//! - **Transparent**: the pool implements [`ObjectFactory`] itself, so it can be
//!   layered anywhere a factory is expected, including in front of another pool.
//! - **Error-neutral**: the pool introduces no error kinds of its own; every failure
//!   comes from the wrapped factory and is propagated unchanged.
//!
//! # Example
//!
//! ```rust
//! use recycle_pool::{ObjectFactory, RecyclePool};
//!
//! struct BufferFactory;
//!
//! impl ObjectFactory for BufferFactory {
//!     type Item = Vec<u8>;
//!     type Error = std::convert::Infallible;
//!
//!     fn create(&self) -> Result<Self::Item, Self::Error> {
//!         Ok(Vec::with_capacity(4096))
//!     }
//!
//!     fn destroy(&self, _buffer: Self::Item) -> Result<(), Self::Error> {
//!         Ok(())
//!     }
//! }
//!
//! let pool = RecyclePool::new(BufferFactory, 16);
//!
//! let mut buffer = pool.acquire()?;
//! buffer.extend_from_slice(b"hello");
//!
//! // Recycled instances are returned as-is, so reset any state before releasing.
//! buffer.clear();
//! pool.release(buffer)?;
//!
//! // The cached buffer comes back on the next acquire, allocation already done.
//! let buffer = pool.acquire()?;
//! assert_eq!(buffer.capacity(), 4096);
//! # Ok::<(), std::convert::Infallible>(())
//! ```
//!
//! # What the pool does not promise
//!
//! - No ordering guarantee under concurrency. A single thread observes LIFO behavior,
//!   but concurrent callers may receive any cached instance or a fresh one.
//! - No retention guarantee. A released instance may occasionally be destroyed even
//!   though the pool had spare capacity, when the release loses a race for its slot.
//!   This is rare and intentional; see [`RecyclePool::release`].
//! - No lifetime tracking. Between acquire and release an instance belongs entirely
//!   to the caller; releasing an instance twice, or using it after release, is a
//!   caller bug the pool cannot detect.

mod factory;
mod pool;

pub use factory::*;
pub use pool::*;
