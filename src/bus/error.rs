//! Data bus error types

use thiserror::Error;

/// Errors raised by a data bus implementation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BusError {
    /// The bus is not reachable
    #[error("Data bus disconnected")]
    Disconnected,
    /// Unsubscribe was called with a handle the bus does not know
    #[error("Unknown subscription handle {handle}")]
    UnknownSubscription { handle: u32 },
    /// The update feed of an established subscription failed
    #[error("Subscription feed error: {message}")]
    Feed { message: String },
}

/// Result type for data bus operations
pub type BusResult<T> = Result<T, BusError>;
