//! Fixed-capacity, allocation-free peripheral types.
//!
//! - [`ArrayWriter`] - Bounds-checked writer over a caller-provided slice
//! - [`FixedStack`] - Array-backed stack with a const-generic capacity

mod stack;
mod writer;

pub use stack::FixedStack;
pub use writer::ArrayWriter;
