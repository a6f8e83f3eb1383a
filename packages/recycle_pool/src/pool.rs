use std::fmt;
use std::marker::PhantomData;
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};

use crate::ObjectFactory;

/// A bounded, lock-free cache of instances layered in front of an [`ObjectFactory`].
///
/// The pool holds up to `capacity` released instances in a fixed slot array and hands
/// them back out on [`acquire`](Self::acquire). A cache miss falls through to
/// [`ObjectFactory::create`]; releasing into a full pool falls through to
/// [`ObjectFactory::destroy`]. The pool itself implements [`ObjectFactory`], so it can
/// stand in for the factory it wraps.
///
/// # Synchronization
///
/// The only shared state is the slot array and a reservation counter, both accessed
/// exclusively through atomic operations. A thread first wins a compare-exchange on the
/// counter, which grants it the exclusive right to fill or empty one specific slot,
/// then performs the matching atomic slot operation. Between those two steps the
/// counter and the slot contents deliberately disagree; the loser of any such overlap
/// observes an unexpected slot state and starts its attempt over. No retry leaves
/// partial state behind.
///
/// Progress is lock-free rather than wait-free: whenever a compare-exchange fails, a
/// competing thread's matching compare-exchange has succeeded, but a single thread may
/// retry an unbounded number of times under sustained contention.
///
/// # Example
///
/// ```rust
/// use std::convert::Infallible;
///
/// use recycle_pool::{ObjectFactory, RecyclePool};
///
/// struct StringFactory;
///
/// impl ObjectFactory for StringFactory {
///     type Item = String;
///     type Error = Infallible;
///
///     fn create(&self) -> Result<Self::Item, Self::Error> {
///         Ok(String::with_capacity(256))
///     }
///
///     fn destroy(&self, _instance: Self::Item) -> Result<(), Self::Error> {
///         Ok(())
///     }
/// }
///
/// let pool = RecyclePool::new(StringFactory, 8);
///
/// let s = pool.acquire()?;
/// assert!(pool.is_empty());
///
/// pool.release(s)?;
/// assert_eq!(pool.len(), 1);
/// # Ok::<(), Infallible>(())
/// ```
///
/// # Thread safety
///
/// The pool is [`Send`] and [`Sync`] when the factory allows it; see the trait impls
/// below. An instance handed out by [`acquire`](Self::acquire) belongs exclusively to
/// the receiving caller until it is passed back to [`release`](Self::release). The pool
/// does not track instances while they are out, so double-release or use-after-release
/// is a caller bug outside the pool's guarantees.
pub struct RecyclePool<F: ObjectFactory> {
    /// Creates instances on cache misses and destroys them on overflow.
    factory: F,

    /// The cached instances. Each cell is either null (empty) or a pointer obtained
    /// from `Box::into_raw` in `release`, owned by the slot until swapped out again.
    slots: Box<[AtomicPtr<F::Item>]>,

    /// Index of the first empty slot, doubling as the count of cached instances.
    ///
    /// This is a reservation counter, not an exact occupancy count at every instant:
    /// a thread must win a compare-exchange on it before touching the slot it guards,
    /// and until that slot access completes the two are out of step.
    top: AtomicUsize,

    /// The automatic `Send`/`Sync` impls would ignore that the slots own instances of
    /// `F::Item`; suppress them and declare the correct bounds manually below.
    _owns_items: PhantomData<*mut F::Item>,
}

// SAFETY: Moving the pool to another thread moves the factory and every cached
// instance along with it, which is sound exactly when both are `Send`.
unsafe impl<F> Send for RecyclePool<F>
where
    F: ObjectFactory + Send,
    F::Item: Send,
{
}

// SAFETY: Through a shared pool, instances released on one thread are handed out on
// another, so `F::Item` must be `Send`; the factory is invoked concurrently through
// `&F`, so `F` must be `Sync`. Nothing hands out `&F::Item`, so `F::Item: Sync` is
// not required.
unsafe impl<F> Sync for RecyclePool<F>
where
    F: ObjectFactory + Sync,
    F::Item: Send,
{
}

impl<F: ObjectFactory> RecyclePool<F> {
    /// Creates a pool that caches up to `capacity` released instances in front of
    /// `factory`.
    ///
    /// The pool starts empty; nothing is created eagerly.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. A pool that cannot cache anything is a
    /// configuration mistake, not a runtime condition.
    #[must_use]
    pub fn new(factory: F, capacity: usize) -> Self {
        assert!(
            capacity > 0,
            "a pool with zero capacity cannot cache anything"
        );

        let slots = (0..capacity)
            .map(|_| AtomicPtr::new(ptr::null_mut()))
            .collect();

        Self {
            factory,
            slots,
            top: AtomicUsize::new(0),
            _owns_items: PhantomData,
        }
    }

    /// The maximum number of instances the pool can cache.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The number of cached instances the reservation counter currently accounts for.
    ///
    /// Exact while the pool is quiescent. While acquires and releases are in flight
    /// this is a snapshot that in-progress operations may already have moved past.
    #[must_use]
    pub fn len(&self) -> usize {
        self.top.load(Ordering::Relaxed)
    }

    /// Whether the pool currently accounts for no cached instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hands out an instance, reusing a cached one when available.
    ///
    /// When the pool believes itself empty the request falls through to
    /// [`ObjectFactory::create`] without retrying; concurrent callers racing on an
    /// empty pool each independently receive a fresh instance.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`ObjectFactory::create`] unchanged. The pool itself
    /// never fails and is left in a consistent state when the factory errors.
    #[cfg_attr(test, mutants::skip)] // Most mutations turn the retry loop into a spin, not a failure.
    pub fn acquire(&self) -> Result<F::Item, F::Error> {
        loop {
            let n = self.top.load(Ordering::Relaxed);

            if n == 0 {
                // Nothing cached. No counter mutation has happened on this path, so
                // a factory error surfaces with the pool untouched.
                return self.factory.create();
            }

            // Reserve the topmost occupied slot. Losing means another thread moved
            // the counter first; start over against its new value.
            if self
                .top
                .compare_exchange_weak(n, n - 1, Ordering::AcqRel, Ordering::Relaxed)
                .is_err()
            {
                continue;
            }

            // The reservation grants us exclusive right to empty slot `n - 1`.
            // SAFETY: The compare-exchange succeeded with 0 < n <= capacity, and the
            // slot array is exactly `capacity` long.
            let slot = unsafe { self.slots.get_unchecked(n - 1) };

            let cached = slot.swap(ptr::null_mut(), Ordering::Acquire);

            if !cached.is_null() {
                // SAFETY: Every non-null slot pointer originates from `Box::into_raw`
                // in `release`, and the swap above transferred sole ownership to us.
                let instance = unsafe { Box::from_raw(cached) };
                return Ok(*instance);
            }

            // The slot was reserved by a concurrent release that has not stored its
            // instance yet. Our counter decrement stands and keeps the books
            // consistent; simply start over.
        }
    }

    /// Returns an instance to the pool, caching it for a later
    /// [`acquire`](Self::acquire).
    ///
    /// When every slot is spoken for, the instance is handed to
    /// [`ObjectFactory::destroy`] instead and the counter is left untouched.
    ///
    /// An instance may occasionally be destroyed even though the pool had spare
    /// capacity at the moment of the call: a release that loses its slot to a
    /// concurrent acquire re-reads the counter and can find the pool full on the
    /// second pass. This is rare and intentional; closing the window would require
    /// blocking.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`ObjectFactory::destroy`] unchanged. The pool itself
    /// never fails.
    #[cfg_attr(test, mutants::skip)] // Most mutations turn the retry loop into a spin, not a failure.
    pub fn release(&self, instance: F::Item) -> Result<(), F::Error> {
        let cached = Box::into_raw(Box::new(instance));

        loop {
            let n = self.top.load(Ordering::Relaxed);

            if n == self.slots.len() {
                // Every slot is spoken for; the instance goes back to the factory.
                // SAFETY: `cached` came from `Box::into_raw` above and was never
                // stored in a slot, so we still own it.
                let instance = unsafe { Box::from_raw(cached) };
                return self.factory.destroy(*instance);
            }

            // Reserve the first empty slot.
            if self
                .top
                .compare_exchange_weak(n, n + 1, Ordering::AcqRel, Ordering::Relaxed)
                .is_err()
            {
                continue;
            }

            // The reservation grants us exclusive right to fill slot `n`, the slot
            // that our increment declared newly occupied.
            // SAFETY: The compare-exchange succeeded with n < capacity.
            let slot = unsafe { self.slots.get_unchecked(n) };

            if slot
                .compare_exchange(
                    ptr::null_mut(),
                    cached,
                    Ordering::Release,
                    Ordering::Relaxed,
                )
                .is_ok()
            {
                return Ok(());
            }

            // The slot still holds an instance whose acquire reserved it but has not
            // collected it yet. Our counter increment stands; start over.
        }
    }
}

/// The pool is itself a factory for the instances it caches, decorating the factory
/// it wraps. This allows pools to stack and to be passed anywhere a factory is
/// expected.
impl<F: ObjectFactory> ObjectFactory for RecyclePool<F> {
    type Item = F::Item;
    type Error = F::Error;

    fn create(&self) -> Result<Self::Item, Self::Error> {
        self.acquire()
    }

    fn destroy(&self, instance: Self::Item) -> Result<(), Self::Error> {
        self.release(instance)
    }
}

impl<F: ObjectFactory> Drop for RecyclePool<F> {
    fn drop(&mut self) {
        // Sweep every slot rather than [0, top): transient races can leave an
        // occupied slot that the counter no longer accounts for.
        for slot in &mut self.slots {
            let cached = std::mem::replace(slot.get_mut(), ptr::null_mut());

            if cached.is_null() {
                continue;
            }

            // SAFETY: Non-null slot pointers come from `Box::into_raw` in `release`
            // and we have exclusive access to the pool here.
            let instance = unsafe { Box::from_raw(cached) };

            if let Err(_error) = self.factory.destroy(*instance) {
                // A destructor has no caller to surface factory errors to.
            }
        }
    }
}

impl<F: ObjectFactory> fmt::Debug for RecyclePool<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecyclePool")
            .field("capacity", &self.capacity())
            .field("cached", &self.len())
            .finish_non_exhaustive()
    }
}
