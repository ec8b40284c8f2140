//! Pool contracts and default pool implementations.
//!
//! - [`Rent`] - Minimal acquire/release contract shared by all pools
//! - [`StoragePool`] - Sized lease/reclaim contract for raw storage blocks
//! - [`BucketPool`] - Thread-safe, size-bucketed free list of storage blocks
//! - [`ObjectPool`] - Get/put pool for heavier reusable instances

mod object;
mod storage;

pub use object::{DEFAULT_MAX_IDLE, ObjectPool};
pub use storage::{BucketPool, DEFAULT_BLOCK_LEN, MAX_PER_CLASS, MAX_POOLED_LEN, StoragePool};

/// The minimal rent/return contract implemented by every pool.
///
/// `Rent` is the uniform surface for callers that only need "give me a
/// reusable value, take it back later" without caring how the pool sizes
/// or stores it. [`BucketPool`] rents default-sized storage blocks;
/// [`ObjectPool`] rents instances built by its factory.
///
/// # Example
///
/// ```
/// use rentbuf::{ObjectPool, Rent};
///
/// let pool = ObjectPool::new(|| Vec::<u8>::with_capacity(64));
/// let mut scratch = pool.rent();
/// scratch.push(1);
/// pool.give_back(scratch);
/// ```
pub trait Rent {
    /// The type of value handed out by this pool.
    type Item;

    /// Takes a value from the pool, creating one if none is idle.
    fn rent(&self) -> Self::Item;

    /// Returns a value to the pool for later reuse.
    ///
    /// The pool may drop the value instead of caching it (for example when
    /// its idle capacity is already full); callers must not rely on a
    /// returned value being handed out again.
    fn give_back(&self, item: Self::Item);
}
