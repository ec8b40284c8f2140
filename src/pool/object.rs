//! Get/put pool for heavier reusable instances.

use std::sync::{Mutex, PoisonError};

use super::Rent;

/// Default maximum number of idle instances an [`ObjectPool`] keeps.
pub const DEFAULT_MAX_IDLE: usize = 16;

/// A thread-safe pool of reusable instances built by a factory closure.
///
/// `rent` pops an idle instance or builds a fresh one; `give_back` runs the
/// optional reset closure and caches the instance unless the idle list is
/// already at capacity, in which case the instance is dropped.
///
/// # Example
///
/// ```
/// use rentbuf::{ObjectPool, Rent};
///
/// let pool = ObjectPool::new(|| String::with_capacity(128))
///     .with_reset(|s| s.clear());
///
/// let mut line = pool.rent();
/// line.push_str("hello");
/// pool.give_back(line);
///
/// // The reset closure ran, so the reused instance is empty.
/// assert!(pool.rent().is_empty());
/// ```
pub struct ObjectPool<T> {
    factory: Box<dyn Fn() -> T + Send + Sync>,
    reset: Option<Box<dyn Fn(&mut T) + Send + Sync>>,
    idle: Mutex<Vec<T>>,
    max_idle: usize,
}

impl<T> ObjectPool<T> {
    /// Creates a pool that builds instances with `factory`.
    pub fn new(factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            reset: None,
            idle: Mutex::new(Vec::new()),
            max_idle: DEFAULT_MAX_IDLE,
        }
    }

    /// Sets a reset closure applied to every instance on `give_back`,
    /// before it becomes available for reuse.
    pub fn with_reset(mut self, reset: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.reset = Some(Box::new(reset));
        self
    }

    /// Sets the maximum number of idle instances to keep (default
    /// [`DEFAULT_MAX_IDLE`]). Instances returned beyond this are dropped.
    pub fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = max_idle;
        self
    }

    /// Returns the number of idle instances currently cached.
    pub fn idle_count(&self) -> usize {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T> Rent for ObjectPool<T> {
    type Item = T;

    fn rent(&self) -> T {
        let reused = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        reused.unwrap_or_else(|| (self.factory)())
    }

    fn give_back(&self, mut item: T) {
        if let Some(reset) = &self.reset {
            reset(&mut item);
        }
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < self.max_idle {
            idle.push(item);
        }
    }
}

impl<T> std::fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPool")
            .field("idle", &self.idle_count())
            .field("max_idle", &self.max_idle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rent_builds_when_empty() {
        let pool = ObjectPool::new(|| vec![0u8; 8]);
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(pool.rent().len(), 8);
    }

    #[test]
    fn test_give_back_then_reuse() {
        let pool = ObjectPool::new(Vec::<u32>::new);
        let mut v = pool.rent();
        v.push(42);
        pool.give_back(v);
        assert_eq!(pool.idle_count(), 1);

        // No reset configured, so the instance keeps its contents.
        let v = pool.rent();
        assert_eq!(v, vec![42]);
    }

    #[test]
    fn test_reset_runs_on_give_back() {
        let pool = ObjectPool::new(Vec::<u32>::new).with_reset(|v| v.clear());
        let mut v = pool.rent();
        v.extend([1, 2, 3]);
        pool.give_back(v);
        assert!(pool.rent().is_empty());
    }

    #[test]
    fn test_max_idle_cap() {
        let pool = ObjectPool::new(String::new).with_max_idle(2);
        for _ in 0..5 {
            pool.give_back(String::new());
        }
        assert_eq!(pool.idle_count(), 2);
    }
}
