//! rentbuf
//!
//! Allocation-free data accumulation primitives for Rust.
//!
//! `rentbuf` provides two intertwined building blocks for high-throughput
//! code that must not churn the allocator:
//!
//! - [`GrowableWriter`] / [`PooledBuffer`] - a pool-backed write buffer
//!   with amortized O(1) append, built on copy-and-release growth against
//!   a size-bucketed storage pool
//! - [`RentGuard`] / [`Handle`] - an atomic reference-counted guard that
//!   lets many concurrent holders share one resource and guarantees
//!   exactly-once teardown when the last holder releases
//!
//! The crate intentionally:
//! - does NOT implement a general-purpose allocator
//! - does NOT manage threads or perform I/O
//! - does NOT retry or log failures (fail-fast, caller decides)
//!
//! It only does one thing: **lease storage → accumulate → release, safely**
//!
//! # Writing
//!
//! ```
//! use std::sync::Arc;
//! use rentbuf::{BucketPool, GrowableWriter};
//!
//! let pool = Arc::new(BucketPool::<u32>::new());
//! let mut writer = GrowableWriter::with_baseline(pool, 4)?;
//!
//! for value in 0..100u32 {
//!     writer.append(value)?;
//! }
//!
//! assert_eq!(writer.written(), 100);
//! assert_eq!(writer.written_region()[99], 99);
//! # Ok::<(), rentbuf::RentError>(())
//! ```
//!
//! # Sharing
//!
//! ```
//! use rentbuf::RentGuard;
//!
//! let guard = RentGuard::with_teardown(vec![0u8; 1024], |buf| {
//!     // runs exactly once, when the last handle is released
//!     drop(buf);
//! });
//!
//! let mut first = guard.rent()?;
//! let mut second = guard.rent()?;
//!
//! assert_eq!(first.value()?.len(), 1024);
//! first.release();
//! second.release(); // teardown fires here
//! # Ok::<(), rentbuf::RentError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod error;
mod fixed;
mod guard;
mod pool;
mod writer;

//
// Public surface (intentionally tiny)
//

pub use buffer::PooledBuffer;
pub use error::RentError;
pub use fixed::{ArrayWriter, FixedStack};
pub use guard::{Handle, RentGuard, ValueRef};
pub use pool::{
    BucketPool, DEFAULT_BLOCK_LEN, DEFAULT_MAX_IDLE, MAX_PER_CLASS, MAX_POOLED_LEN, ObjectPool,
    Rent, StoragePool,
};
pub use writer::{DEFAULT_BASELINE_CAPACITY, GrowableWriter};
