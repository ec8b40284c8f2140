//! Growable writer built on pooled buffers.
//!
//! - [`GrowableWriter`] - Unbounded append capacity via copy-and-release growth

mod growable;

pub use growable::{DEFAULT_BASELINE_CAPACITY, GrowableWriter};
