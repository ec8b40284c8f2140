//! Bounds-checked writer over caller-provided storage.

use crate::error::RentError;

/// A writer over a caller-provided slice - the allocation-free counterpart
/// of [`PooledBuffer`](crate::PooledBuffer) for stack-scoped scratch space.
///
/// The writer never allocates and never grows; requests beyond the slice's
/// remaining capacity fail with [`RentError::CapacityExceeded`].
///
/// # Example
///
/// ```
/// use rentbuf::ArrayWriter;
///
/// let mut scratch = [0u8; 8];
/// let mut writer = ArrayWriter::new(&mut scratch);
///
/// writer.append(1)?;
/// writer.append(2)?;
/// assert_eq!(writer.written_region(), &[1, 2]);
/// # Ok::<(), rentbuf::RentError>(())
/// ```
#[derive(Debug)]
pub struct ArrayWriter<'a, T> {
    storage: &'a mut [T],
    written: usize,
}

impl<'a, T> ArrayWriter<'a, T> {
    /// Wraps `storage` with the write cursor at 0.
    pub fn new(storage: &'a mut [T]) -> Self {
        Self {
            storage,
            written: 0,
        }
    }

    /// Returns the unwritten tail; a `size_hint` of 0 returns the whole
    /// remaining capacity.
    ///
    /// Fails with [`RentError::CapacityExceeded`] if fewer than
    /// `size_hint` elements remain.
    pub fn writable_region(&mut self, size_hint: usize) -> Result<&mut [T], RentError> {
        let remaining = self.remaining();
        if size_hint > remaining {
            return Err(RentError::CapacityExceeded {
                requested: size_hint,
                remaining,
            });
        }
        Ok(&mut self.storage[self.written..])
    }

    /// Commits `count` elements as written.
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
    pub fn append(&mut self, item: T) -> Result<(), RentError> {
        let region = self.writable_region(1)?;
        region[0] = item;
        self.advance(1)
    }

    /// Everything committed so far, in insertion order.
    pub fn written_region(&self) -> &[T] {
        &self.storage[..self.written]
    }

    /// Resets the write cursor to 0. Element values are left in place;
    /// the caller owns the storage.
    pub fn clear(&mut self) {
        self.written = 0;
    }

    /// The total capacity of the underlying slice.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The number of elements committed so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// The number of elements the slice can still hold.
    pub fn remaining(&self) -> usize {
        self.storage.len() - self.written
    }
}
