//! The GrowableWriter type - amortized O(1) append over pooled storage.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::buffer::PooledBuffer;
use crate::error::RentError;
use crate::pool::StoragePool;

/// Default baseline capacity for a writer created with
/// [`GrowableWriter::new`] (elements).
pub const DEFAULT_BASELINE_CAPACITY: usize = 256;

/// A write buffer with unbounded append capacity and amortized O(1) cost
/// per element.
///
/// `GrowableWriter` composes a [`PooledBuffer`]. When a write request
/// exceeds the current buffer's remaining capacity, the writer acquires a
/// larger buffer from the pool, copies the written region across, and
/// releases the old buffer - capacity doubles on each growth, so the total
/// number of copied elements across any sequence of N appends stays O(N).
///
/// Unlike [`PooledBuffer`], writable-region requests here never fail for
/// capacity reasons; they grow instead.
///
/// # Capacity after `clear`
///
/// [`clear`](Self::clear) releases the current buffer and acquires a fresh
/// one at the *original baseline capacity* - grown capacity is deliberately
/// not remembered. This trades throughput on bursty workloads (the next
/// burst regrows) for returning large blocks to the pool promptly. Callers
/// with stable large batches who want to keep capacity can append into the
/// same writer without clearing.
///
/// # Threading
///
/// Single-writer, no internal synchronization; mutation goes through
/// `&mut self`. Only the pool behind the writer is shared.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rentbuf::{BucketPool, GrowableWriter};
///
/// let pool = Arc::new(BucketPool::<i32>::new());
/// let mut writer = GrowableWriter::with_baseline(pool, 4)?;
///
/// for value in [10, 20, 30, 40, 50, 60] {
///     writer.append(value)?;
/// }
///
/// assert_eq!(writer.written_region(), &[10, 20, 30, 40, 50, 60]);
/// assert!(writer.capacity() >= 6);
/// # Ok::<(), rentbuf::RentError>(())
/// ```
pub struct GrowableWriter<T> {
    pool: Arc<dyn StoragePool<T>>,
    current: PooledBuffer<T>,
    baseline: usize,
    grows: usize,
    copied_total: usize,
}

impl<T: Default + Clone> GrowableWriter<T> {
    /// Creates a writer with [`DEFAULT_BASELINE_CAPACITY`].
    pub fn new(pool: Arc<dyn StoragePool<T>>) -> Self {
        let current = PooledBuffer::acquire(Arc::clone(&pool), DEFAULT_BASELINE_CAPACITY);
        Self {
            pool,
            current,
            baseline: DEFAULT_BASELINE_CAPACITY,
            grows: 0,
            copied_total: 0,
        }
    }

    /// Creates a writer whose first buffer (and every buffer after a
    /// [`clear`](Self::clear)) is sized at `baseline` elements.
    ///
    /// # Errors
    ///
    /// Returns [`RentError::InvalidArgument`] if `baseline` is 0.
    pub fn with_baseline(
        pool: Arc<dyn StoragePool<T>>,
        baseline: usize,
    ) -> Result<Self, RentError> {
        if baseline == 0 {
            return Err(RentError::InvalidArgument {
                message: "baseline capacity must be non-zero",
            });
        }
        let current = PooledBuffer::acquire(Arc::clone(&pool), baseline);
        Ok(Self {
            pool,
            current,
            baseline,
            grows: 0,
            copied_total: 0,
        })
    }

    /// Returns a writable region of at least `size_hint` elements, growing
    /// first if the current buffer cannot satisfy the request.
    ///
    /// A `size_hint` of 0 means "whatever is free": the writer still
    /// guarantees at least one free element, growing a full buffer.
    /// Unlike [`PooledBuffer::writable_region`], this never fails with a
    /// capacity error.
    pub fn writable_region(&mut self, size_hint: usize) -> Result<&mut [T], RentError> {
        let needed = size_hint.max(1);
        if self.current.remaining() < needed {
            self.grow(needed)?;
        }
        self.current.writable_region(size_hint)
    }

    /// Commits `count` elements as written.
    ///
    /// Mirrors [`PooledBuffer::advance`]: advancing past the current
    /// capacity fails with [`RentError::CapacityExceeded`]. Only regions
    /// actually handed out by [`writable_region`](Self::writable_region)
    /// hold committed-to storage.
    pub fn advance(&mut self, count: usize) -> Result<(), RentError> {
        self.current.advance(count)
    }

    /// Appends a single element, growing as needed.
    pub fn append(&mut self, item: T) -> Result<(), RentError> {
        let region = self.writable_region(1)?;
        region[0] = item;
        self.current.advance(1)
    }

    /// Appends all elements of `items`, growing at most once.
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<(), RentError> {
        if items.is_empty() {
            return Ok(());
        }
        let region = self.writable_region(items.len())?;
        region[..items.len()].clone_from_slice(items);
        self.current.advance(items.len())
    }

    /// Replaces the current buffer with one of at least
    /// `max(size_hint + written, written * 2)` elements, copying the
    /// written region across and releasing the old buffer to the pool.
    fn grow(&mut self, size_hint: usize) -> Result<(), RentError> {
        let written = self.current.written();
        let new_capacity = (size_hint + written).max(written * 2);

        let mut replacement = PooledBuffer::acquire(Arc::clone(&self.pool), new_capacity);
        if written > 0 {
            let region = replacement.writable_region(written)?;
            region[..written].clone_from_slice(self.current.written_region());
            replacement.advance(written)?;
        }
        self.current.release();
        self.current = replacement;

        self.grows += 1;
        self.copied_total += written;
        Ok(())
    }

    /// Releases the current buffer and acquires a fresh one at the
    /// original baseline capacity.
    ///
    /// Grown capacity is not retained; see the type-level docs for the
    /// trade-off.
    pub fn clear(&mut self) {
        self.current.release();
        self.current = PooledBuffer::acquire(Arc::clone(&self.pool), self.baseline);
    }

    /// Releases the current buffer without acquiring a replacement.
    ///
    /// Idempotent; also runs on drop. A write after `dispose` regrows from
    /// the released zero-capacity buffer through the normal growth path.
    pub fn dispose(&mut self) {
        self.current.release();
    }
}

impl<T> GrowableWriter<T> {
    /// Returns everything committed so far, in insertion order.
    pub fn written_region(&self) -> &[T] {
        self.current.written_region()
    }

    /// The number of elements committed so far.
    pub fn written(&self) -> usize {
        self.current.written()
    }

    /// The capacity of the current buffer.
    pub fn capacity(&self) -> usize {
        self.current.capacity()
    }

    /// The number of growth cycles performed since construction.
    pub fn grow_count(&self) -> usize {
        self.grows
    }

    /// The total number of elements copied across all growth cycles since
    /// construction. For N appends this stays within a small constant
    /// multiple of N.
    pub fn copied_elements(&self) -> usize {
        self.copied_total
    }
}

impl GrowableWriter<u8> {
    /// Copies the written region into an immutable [`Bytes`] and clears
    /// the writer back to its baseline capacity.
    pub fn freeze(&mut self) -> Bytes {
        let frozen = Bytes::copy_from_slice(self.written_region());
        self.clear();
        frozen
    }
}

impl<T> Drop for GrowableWriter<T> {
    fn drop(&mut self) {
        self.current.release();
    }
}

impl<T> fmt::Debug for GrowableWriter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowableWriter")
            .field("capacity", &self.capacity())
            .field("written", &self.written())
            .field("baseline", &self.baseline)
            .field("grows", &self.grows)
            .finish()
    }
}
