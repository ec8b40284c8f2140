//! The RentGuard type - atomic reference counting with exactly-once teardown.

use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::RentError;

type Teardown<T> = Box<dyn FnOnce(T) + Send>;

/// Shared state behind a guard and all of its handles.
struct Shared<T> {
    references: AtomicUsize,
    dropped: AtomicBool,
    resource: Mutex<Option<T>>,
    teardown: Mutex<Option<Teardown<T>>>,
}

impl<T> Shared<T> {
    fn lock_resource(&self) -> MutexGuard<'_, Option<T>> {
        self.resource.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs the teardown path if the resource is still present.
    ///
    /// The resource is taken out of the mutex first, so no lock is held
    /// while the callback runs. Taking it is what makes teardown
    /// exactly-once: a second caller finds `None` and does nothing.
    fn tear_down(&self) {
        let resource = self.lock_resource().take();
        let teardown = self
            .teardown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(resource) = resource {
            match teardown {
                Some(callback) => callback(resource),
                None => drop(resource),
            }
        }
    }
}

impl<T> Drop for Shared<T> {
    fn drop(&mut self) {
        // A guard discarded without its handles ever reaching zero (for
        // example, one that was never rented from) still tears its
        // resource down exactly once.
        self.tear_down();
    }
}

/// A shared-ownership wrapper around one resource, torn down exactly once
/// when the atomic holder count drops to zero.
///
/// `RentGuard` issues [`Handle`]s via [`rent`](Self::rent); each handle
/// represents one increment of the shared counter and is consumed by one
/// [`Handle::release`] (or by being dropped). When the count transitions
/// from 1 to 0 the guard becomes permanently *dropped*: the optional
/// teardown callback runs with the resource (or the resource is simply
/// dropped), and every later `rent` fails with
/// [`RentError::InvalidState`].
///
/// # Concurrency
///
/// `rent` and `release` are safe to call from arbitrary threads; the count
/// is a single atomic and the 1-to-0 transition is decided on the result
/// of the atomic decrement itself, so exactly one releaser runs the
/// teardown. The wrapped resource's own thread-safety is *not* provided
/// here - a mutable resource still needs caller-side synchronization.
///
/// # Caller obligation
///
/// The guard does not serialize "stop renting" decisions: a `rent` racing
/// what another thread believes is the final release may either succeed
/// before the decrement or fail afterwards. Callers that invalidate a
/// resource and move on must stop handing the old guard out themselves
/// (typically by swapping to a new guard first). A handle that loses this
/// race observes the torn-down state as an error from
/// [`Handle::value`], never a dangling resource.
///
/// # Example
///
/// ```
/// use rentbuf::RentGuard;
///
/// let guard = RentGuard::with_teardown(String::from("conn"), |resource| {
///     println!("closing {}", resource);
/// });
///
/// let mut a = guard.rent()?;
/// let mut b = guard.rent()?;
/// assert_eq!(&*a.value()?, "conn");
///
/// a.release();        // resource still alive
/// b.release();        // last one out: teardown runs here, exactly once
///
/// assert!(guard.rent().is_err());
/// # Ok::<(), rentbuf::RentError>(())
/// ```
pub struct RentGuard<T> {
    shared: Arc<Shared<T>>,
}

impl<T> RentGuard<T> {
    /// Wraps `resource` in a live guard with a holder count of 0.
    pub fn new(resource: T) -> Self {
        Self::build(resource, None)
    }

    /// Wraps `resource` and registers `teardown` to be invoked with it
    /// when the holder count drops to zero.
    pub fn with_teardown(resource: T, teardown: impl FnOnce(T) + Send + 'static) -> Self {
        Self::build(resource, Some(Box::new(teardown)))
    }

    fn build(resource: T, teardown: Option<Teardown<T>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                references: AtomicUsize::new(0),
                dropped: AtomicBool::new(false),
                resource: Mutex::new(Some(resource)),
                teardown: Mutex::new(teardown),
            }),
        }
    }

    /// Issues a new armed [`Handle`], incrementing the holder count.
    ///
    /// # Errors
    ///
    /// Returns [`RentError::InvalidState`] once the guard has been
    /// dropped (its count reached zero at least once).
    pub fn rent(&self) -> Result<Handle<T>, RentError> {
        if self.shared.dropped.load(Ordering::Acquire) {
            return Err(RentError::InvalidState {
                message: "guard already dropped",
            });
        }
        self.shared.references.fetch_add(1, Ordering::AcqRel);
        Ok(Handle {
            shared: Arc::clone(&self.shared),
            armed: true,
        })
    }

    /// The number of outstanding handles.
    pub fn references(&self) -> usize {
        self.shared.references.load(Ordering::Acquire)
    }

    /// Whether the guard has reached its terminal dropped state.
    pub fn is_dropped(&self) -> bool {
        self.shared.dropped.load(Ordering::Acquire)
    }
}

impl<T> Clone for RentGuard<T> {
    /// Clones the guard, sharing the same counter and resource.
    ///
    /// Cloning is not renting: the holder count is unchanged and both
    /// clones observe the same dropped state.
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for RentGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RentGuard")
            .field("references", &self.references())
            .field("dropped", &self.is_dropped())
            .finish()
    }
}

/// One counted share of a [`RentGuard`]'s resource.
///
/// A handle is *armed* from creation until its first
/// [`release`](Self::release); further releases are no-ops. Dropping an
/// armed handle releases it, so a handle can never leak its count.
pub struct Handle<T> {
    shared: Arc<Shared<T>>,
    armed: bool,
}

impl<T> Handle<T> {
    /// Borrows the wrapped resource.
    ///
    /// # Errors
    ///
    /// Returns [`RentError::InvalidState`] if this handle has already been
    /// released, or if the resource has been torn down (possible only when
    /// a rent raced the final release; see [`RentGuard`]'s caller
    /// obligation).
    pub fn value(&self) -> Result<ValueRef<'_, T>, RentError> {
        if !self.armed {
            return Err(RentError::InvalidState {
                message: "handle already released",
            });
        }
        let guard = self.shared.lock_resource();
        if guard.is_none() {
            return Err(RentError::InvalidState {
                message: "resource already torn down",
            });
        }
        Ok(ValueRef { guard })
    }

    /// Releases this share, decrementing the holder count.
    ///
    /// The first call disarms the handle; if the decrement observes the
    /// count going from 1 to 0 the guard transitions to its terminal
    /// dropped state and the teardown runs, exactly once. Releasing an
    /// already-released handle is a no-op.
    pub fn release(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        if self.shared.references.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.shared.dropped.store(true, Ordering::Release);
            self.shared.tear_down();
        }
    }

    /// Whether this handle still holds its count.
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

impl<T> Drop for Handle<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle").field("armed", &self.armed).finish()
    }
}

/// A borrowed view of a guard's resource, obtained from
/// [`Handle::value`].
///
/// Holds the resource lock for its lifetime, so keep it short-lived;
/// teardown cannot take the resource out while a `ValueRef` exists.
pub struct ValueRef<'a, T> {
    guard: MutexGuard<'a, Option<T>>,
}

impl<T> Deref for ValueRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Checked Some at construction, and the held lock keeps teardown
        // from taking the resource in the meantime.
        self.guard.as_ref().expect("resource present while ValueRef exists")
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}
