//! Pool-backed buffer types.
//!
//! - [`PooledBuffer`] - Owner of one leased storage block plus a write cursor

mod pooled;

pub use pooled::PooledBuffer;
