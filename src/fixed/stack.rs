//! Array-backed stack with a const-generic capacity.

use crate::error::RentError;

/// A fixed-capacity stack that never allocates.
///
/// `push` on a full stack and `pop` on an empty stack fail with
/// [`RentError::InvalidState`]; there is no silent overwrite or sentinel
/// value.
///
/// # Example
///
/// ```
/// use rentbuf::FixedStack;
///
/// let mut stack: FixedStack<u8, 2> = FixedStack::new();
/// stack.push(1)?;
/// stack.push(2)?;
/// assert!(stack.push(3).is_err());
/// assert_eq!(stack.pop()?, 2);
/// # Ok::<(), rentbuf::RentError>(())
/// ```
#[derive(Debug)]
pub struct FixedStack<T, const N: usize> {
    slots: [Option<T>; N],
    len: usize,
}

impl<T, const N: usize> FixedStack<T, N> {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            len: 0,
        }
    }

    /// Pushes `item` onto the stack.
    ///
    /// # Errors
    ///
    /// Returns [`RentError::InvalidState`] when the stack is full.
    pub fn push(&mut self, item: T) -> Result<(), RentError> {
        if self.len == N {
            return Err(RentError::InvalidState {
                message: "stack is full",
            });
        }
        self.slots[self.len] = Some(item);
        self.len += 1;
        Ok(())
    }

    /// Pops the most recently pushed item.
    ///
    /// # Errors
    ///
    /// Returns [`RentError::InvalidState`] when the stack is empty.
    pub fn pop(&mut self) -> Result<T, RentError> {
        if self.len == 0 {
            return Err(RentError::InvalidState {
                message: "stack is empty",
            });
        }
        self.len -= 1;
        match self.slots[self.len].take() {
            Some(item) => Ok(item),
            None => Err(RentError::InvalidState {
                message: "stack slot unexpectedly empty",
            }),
        }
    }

    /// A reference to the top item, if any.
    pub fn peek(&self) -> Option<&T> {
        match self.len {
            0 => None,
            len => self.slots[len - 1].as_ref(),
        }
    }

    /// The number of items on the stack.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the stack holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the stack is at capacity.
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// The fixed capacity `N`.
    pub fn capacity(&self) -> usize {
        N
    }
}

impl<T, const N: usize> Default for FixedStack<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_order() {
        let mut stack: FixedStack<u32, 4> = FixedStack::new();
        stack.push(1).unwrap();
        stack.push(2).unwrap();
        stack.push(3).unwrap();
        assert_eq!(stack.pop().unwrap(), 3);
        assert_eq!(stack.pop().unwrap(), 2);
        assert_eq!(stack.pop().unwrap(), 1);
    }

    #[test]
    fn test_push_full_fails() {
        let mut stack: FixedStack<u8, 1> = FixedStack::new();
        stack.push(0).unwrap();
        assert!(matches!(
            stack.push(1),
            Err(RentError::InvalidState { .. })
        ));
        assert!(stack.is_full());
    }

    #[test]
    fn test_pop_empty_fails() {
        let mut stack: FixedStack<u8, 1> = FixedStack::new();
        assert!(matches!(stack.pop(), Err(RentError::InvalidState { .. })));
    }

    #[test]
    fn test_peek_does_not_remove() {
        let mut stack: FixedStack<u8, 2> = FixedStack::new();
        assert!(stack.peek().is_none());
        stack.push(9).unwrap();
        assert_eq!(stack.peek(), Some(&9));
        assert_eq!(stack.len(), 1);
    }
}
