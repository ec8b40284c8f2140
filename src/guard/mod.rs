//! Reference-counted resource guards.
//!
//! - [`RentGuard`] - Shared-ownership wrapper with exactly-once teardown
//! - [`Handle`] - One counted share of a guard's resource
//! - [`ValueRef`] - Borrowed view of the resource through a live handle

mod arc;

pub use arc::{Handle, RentGuard, ValueRef};
