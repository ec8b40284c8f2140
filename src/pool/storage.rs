//! Size-bucketed storage pool for raw element blocks.

use std::sync::{Mutex, PoisonError};

use super::Rent;

/// Default block length rented through the [`Rent`] contract (elements).
pub const DEFAULT_BLOCK_LEN: usize = 256;

/// Maximum number of idle blocks kept per size class.
pub const MAX_PER_CLASS: usize = 4;

/// Largest block length the pool will cache; bigger blocks are dropped on
/// reclaim rather than held idle.
pub const MAX_POOLED_LEN: usize = 1 << 20;

/// The lease/reclaim contract for raw storage blocks.
///
/// A `StoragePool` hands out owned blocks of at least the requested length
/// (the block may be larger - callers must check `block.len()`, not assume
/// the requested size) and takes them back for reuse. Implementations must
/// be safe to share across threads; [`PooledBuffer`](crate::PooledBuffer)
/// holds its pool behind an `Arc` and reclaims storage from whichever
/// thread releases the buffer.
pub trait StoragePool<T>: Send + Sync {
    /// Leases a block of at least `min_len` elements.
    ///
    /// A `min_len` of 0 yields an empty block.
    fn lease(&self, min_len: usize) -> Box<[T]>;

    /// Returns a block to the pool.
    ///
    /// The pool decides whether to cache or drop it; either way the caller
    /// has given up ownership. Element values in a reclaimed block are
    /// reset before the block is handed out again.
    fn reclaim(&self, block: Box<[T]>);
}

/// A thread-safe free list of storage blocks, bucketed by power-of-two
/// size class.
///
/// `lease` rounds the requested length up to the next power of two and
/// reuses an idle block of that class when one is available, allocating a
/// fresh default-initialized block otherwise. `reclaim` resets the block's
/// elements and caches it unless the class already holds [`MAX_PER_CLASS`]
/// idle blocks or the block exceeds [`MAX_POOLED_LEN`].
///
/// Blocks whose length is not a power of two (blocks that did not originate
/// here) are accepted and simply dropped.
///
/// # Example
///
/// ```
/// use rentbuf::{BucketPool, StoragePool};
///
/// let pool = BucketPool::<u8>::new();
/// let block = pool.lease(100);
/// assert!(block.len() >= 100);
/// pool.reclaim(block);
///
/// // Same class, so the cached block is reused.
/// let again = pool.lease(100);
/// assert_eq!(again.len(), 128);
/// ```
#[derive(Debug)]
pub struct BucketPool<T> {
    /// Idle blocks, indexed by size-class exponent (`len == 1 << class`).
    classes: Mutex<Vec<Vec<Box<[T]>>>>,
}

impl<T: Default + Clone> BucketPool<T> {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self {
            classes: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of idle blocks currently cached across all
    /// size classes.
    pub fn idle_blocks(&self) -> usize {
        let classes = self
            .classes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        classes.iter().map(|bucket| bucket.len()).sum()
    }
}

impl<T: Default + Clone> Default for BucketPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default + Clone + Send> StoragePool<T> for BucketPool<T> {
    fn lease(&self, min_len: usize) -> Box<[T]> {
        if min_len == 0 {
            return Vec::new().into_boxed_slice();
        }

        let rounded = min_len.next_power_of_two();
        let class = rounded.trailing_zeros() as usize;

        {
            let mut classes = self
                .classes
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(bucket) = classes.get_mut(class) {
                if let Some(block) = bucket.pop() {
                    return block;
                }
            }
        }

        vec![T::default(); rounded].into_boxed_slice()
    }

    fn reclaim(&self, mut block: Box<[T]>) {
        let len = block.len();
        if len == 0 || len > MAX_POOLED_LEN || !len.is_power_of_two() {
            return;
        }

        // Reset element values so a reused block never leaks old data.
        block.fill(T::default());

        let class = len.trailing_zeros() as usize;
        let mut classes = self
            .classes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if classes.len() <= class {
            classes.resize_with(class + 1, Vec::new);
        }
        if classes[class].len() < MAX_PER_CLASS {
            classes[class].push(block);
        }
    }
}

impl<T: Default + Clone + Send> Rent for BucketPool<T> {
    type Item = Box<[T]>;

    fn rent(&self) -> Box<[T]> {
        self.lease(DEFAULT_BLOCK_LEN)
    }

    fn give_back(&self, item: Box<[T]>) {
        self.reclaim(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_rounds_up() {
        let pool = BucketPool::<u32>::new();
        assert_eq!(pool.lease(5).len(), 8);
        assert_eq!(pool.lease(8).len(), 8);
        assert_eq!(pool.lease(9).len(), 16);
    }

    #[test]
    fn test_lease_zero_is_empty() {
        let pool = BucketPool::<u32>::new();
        assert_eq!(pool.lease(0).len(), 0);
    }

    #[test]
    fn test_reclaim_then_reuse() {
        let pool = BucketPool::<u8>::new();
        let mut block = pool.lease(100);
        block[0] = 0xFF;
        pool.reclaim(block);
        assert_eq!(pool.idle_blocks(), 1);

        let again = pool.lease(100);
        assert_eq!(again.len(), 128);
        // Reclaimed storage is reset before reuse.
        assert_eq!(again[0], 0);
        assert_eq!(pool.idle_blocks(), 0);
    }

    #[test]
    fn test_class_cap() {
        let pool = BucketPool::<u8>::new();
        for _ in 0..MAX_PER_CLASS + 3 {
            pool.reclaim(vec![0u8; 64].into_boxed_slice());
        }
        assert_eq!(pool.idle_blocks(), MAX_PER_CLASS);
    }

    #[test]
    fn test_oversized_and_foreign_blocks_dropped() {
        let pool = BucketPool::<u8>::new();
        pool.reclaim(vec![0u8; MAX_POOLED_LEN * 2].into_boxed_slice());
        pool.reclaim(vec![0u8; 100].into_boxed_slice()); // not a power of two
        assert_eq!(pool.idle_blocks(), 0);
    }

    #[test]
    fn test_rent_contract_uses_default_block() {
        let pool = BucketPool::<u8>::new();
        let block = pool.rent();
        assert_eq!(block.len(), DEFAULT_BLOCK_LEN);
        pool.give_back(block);
        assert_eq!(pool.idle_blocks(), 1);
    }

    #[test]
    fn test_shared_across_threads() {
        use std::sync::Arc;

        let pool = Arc::new(BucketPool::<u64>::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let block = pool.lease(32);
                        pool.reclaim(block);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(pool.idle_blocks() <= MAX_PER_CLASS);
    }
}
