//! The PooledBuffer type - one leased storage block and a write cursor.

use std::fmt;
use std::sync::Arc;

use crate::error::RentError;
use crate::pool::StoragePool;

/// A fixed-capacity buffer whose storage is leased from a [`StoragePool`].
///
/// `PooledBuffer` owns exactly one storage block at a time and tracks how
/// many elements have been committed to it. It never grows: a write request
/// beyond the remaining capacity fails with
/// [`RentError::CapacityExceeded`]. Transparent growth is the job of
/// [`GrowableWriter`](crate::GrowableWriter), which drives this type's
/// acquire/release contract internally.
///
/// # Ownership and threading
///
/// The buffer is a single-writer object with no internal synchronization;
/// all mutation goes through `&mut self`, so exclusive access is enforced
/// by the borrow checker. Only the pool behind it is shared.
///
/// # Lifecycle
///
/// [`release`](Self::release) returns the storage to the pool and leaves
/// the buffer in a storage-less, zero-capacity state. It is idempotent and
/// also runs on drop, so leased blocks always find their way back.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rentbuf::{BucketPool, PooledBuffer};
///
/// let pool = Arc::new(BucketPool::<i32>::new());
/// let mut buf = PooledBuffer::acquire(pool, 4);
///
/// buf.append(10)?;
/// buf.append(20)?;
/// assert_eq!(buf.written_region(), &[10, 20]);
///
/// buf.release();
/// assert_eq!(buf.capacity(), 0);
/// # Ok::<(), rentbuf::RentError>(())
/// ```
pub struct PooledBuffer<T> {
    pool: Arc<dyn StoragePool<T>>,
    storage: Option<Box<[T]>>,
    written: usize,
}

impl<T> PooledBuffer<T> {
    /// Leases a block of at least `min_capacity` elements from `pool`.
    ///
    /// The leased block may be larger than requested; check
    /// [`capacity`](Self::capacity) for the actual size. The write cursor
    /// starts at 0.
    pub fn acquire(pool: Arc<dyn StoragePool<T>>, min_capacity: usize) -> Self {
        let storage = pool.lease(min_capacity);
        Self {
            pool,
            storage: Some(storage),
            written: 0,
        }
    }

    /// Returns the unwritten tail of the buffer.
    ///
    /// With a `size_hint` of 0 the entire remaining capacity is returned
    /// (possibly an empty slice). A non-zero `size_hint` guarantees the
    /// returned slice holds at least that many elements, or fails with
    /// [`RentError::CapacityExceeded`] - this type never grows.
    ///
    /// Elements written into the region are not visible in
    /// [`written_region`](Self::written_region) until committed with
    /// [`advance`](Self::advance).
    pub fn writable_region(&mut self, size_hint: usize) -> Result<&mut [T], RentError> {
        let remaining = self.remaining();
        if size_hint > remaining {
            return Err(RentError::CapacityExceeded {
                requested: size_hint,
                remaining,
            });
        }
        let written = self.written;
        match &mut self.storage {
            Some(block) => Ok(&mut block[written..]),
            None => Ok(&mut []),
        }
    }

    /// Commits `count` elements as written.
    ///
    /// Fails with [`RentError::CapacityExceeded`] if the cursor would move
    /// past the end of the storage block.
    pub fn advance(&mut self, count: usize) -> Result<(), RentError> {
        let remaining = self.remaining();
        if count > remaining {
            return Err(RentError::CapacityExceeded {
                requested: count,
                remaining,
            });
        }
        self.written += count;
        Ok(())
    }

    /// Writes a single element and commits it.
    ///
    /// Fails with [`RentError::CapacityExceeded`] when the buffer is full.
    pub fn append(&mut self, item: T) -> Result<(), RentError> {
        let region = self.writable_region(1)?;
        region[0] = item;
        self.advance(1)
    }

    /// Returns everything committed so far, in insertion order.
    pub fn written_region(&self) -> &[T] {
        match &self.storage {
            Some(block) => &block[..self.written],
            None => &[],
        }
    }

    /// Returns the storage block to the pool and resets the buffer to a
    /// storage-less, zero-capacity state.
    ///
    /// Idempotent: releasing an already-released buffer is a no-op, never
    /// an error. Also runs on drop.
    pub fn release(&mut self) {
        if let Some(block) = self.storage.take() {
            self.pool.reclaim(block);
        }
        self.written = 0;
    }

    /// The total capacity of the current storage block (0 once released).
    pub fn capacity(&self) -> usize {
        self.storage.as_ref().map_or(0, |block| block.len())
    }

    /// The number of elements committed so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// The number of uncommitted elements the storage can still hold.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.written
    }

    /// Whether the storage has been returned to the pool.
    pub fn is_released(&self) -> bool {
        self.storage.is_none()
    }
}

impl<T: Default> PooledBuffer<T> {
    /// Resets the written region to default values and the cursor to 0.
    ///
    /// The storage block is retained, not returned to the pool.
    pub fn clear(&mut self) {
        if let Some(block) = &mut self.storage {
            block[..self.written].fill_with(T::default);
        }
        self.written = 0;
    }
}

impl<T> Drop for PooledBuffer<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T> fmt::Debug for PooledBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("capacity", &self.capacity())
            .field("written", &self.written)
            .field("released", &self.is_released())
            .finish()
    }
}
