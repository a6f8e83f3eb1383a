/// Creates and destroys instances of some resource on demand.
///
/// Implementations supply the two ends of an instance's life: [`create`](Self::create)
/// brings a fresh instance into existence and [`destroy`](Self::destroy) permanently
/// disposes of one. What happens inside either operation is entirely the factory's
/// business; callers treat the factory as a black box.
///
/// [`RecyclePool`](crate::RecyclePool) wraps any factory and implements this same
/// trait, so a pool can be dropped in transparently wherever a factory is expected.
///
/// # Example
///
/// ```rust
/// use recycle_pool::ObjectFactory;
///
/// struct BoxedIntFactory;
///
/// impl ObjectFactory for BoxedIntFactory {
///     type Item = Box<u64>;
///     type Error = std::convert::Infallible;
///
///     fn create(&self) -> Result<Self::Item, Self::Error> {
///         Ok(Box::new(0))
///     }
///
///     fn destroy(&self, _instance: Self::Item) -> Result<(), Self::Error> {
///         // Dropping the box is all the cleanup this resource needs.
///         Ok(())
///     }
/// }
///
/// let factory = BoxedIntFactory;
/// let instance = factory.create()?;
/// factory.destroy(instance)?;
/// # Ok::<(), std::convert::Infallible>(())
/// ```
pub trait ObjectFactory {
    /// The type of instance this factory produces.
    type Item;

    /// The error reported when an instance cannot be created or destroyed.
    type Error;

    /// Creates a fresh instance.
    ///
    /// Takes `&self` because callers such as [`RecyclePool`](crate::RecyclePool)
    /// invoke the factory concurrently through a shared reference.
    ///
    /// # Errors
    ///
    /// Returns the factory's error when the underlying resource cannot be produced,
    /// for example on resource exhaustion.
    fn create(&self) -> Result<Self::Item, Self::Error>;

    /// Permanently disposes of an instance previously returned by
    /// [`create`](Self::create).
    ///
    /// # Errors
    ///
    /// Returns the factory's error when disposal fails.
    fn destroy(&self, instance: Self::Item) -> Result<(), Self::Error>;
}
