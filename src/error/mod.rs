//! Error types for rentbuf.

use std::fmt;

/// Errors that can occur during buffer, pool, and guard operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RentError {
    /// An argument was invalid (zero where a non-zero value is required).
    InvalidArgument {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// A write or advance request exceeded the remaining capacity of a
    /// fixed-capacity buffer.
    CapacityExceeded {
        /// The number of elements requested.
        requested: usize,
        /// The number of elements actually remaining.
        remaining: usize,
    },

    /// The operation is not valid in the object's current state, such as
    /// renting from a guard that has already been dropped, or popping an
    /// empty stack.
    InvalidState {
        /// Description of the state violation.
        message: &'static str,
    },
}

impl fmt::Display for RentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RentError::InvalidArgument { message } => {
                write!(f, "invalid argument: {}", message)
            }
            RentError::CapacityExceeded {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "capacity exceeded: requested {} elements, {} remaining",
                    requested, remaining
                )
            }
            RentError::InvalidState { message } => {
                write!(f, "invalid state: {}", message)
            }
        }
    }
}

impl std::error::Error for RentError {}
