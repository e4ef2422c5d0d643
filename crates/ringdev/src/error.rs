use thiserror::Error;

/// A caller broke the store's contract.
///
/// These are programming errors rather than runtime conditions: the operation
/// that reports one is aborted before it touches `head` or `tail`. They must
/// never be folded into a "0 bytes" result, which is how saturation is
/// reported.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContractViolation {
    /// `get_byte` was called while the store held no bytes.
    #[error("caller bug: read a byte from an empty store")]
    Empty,
    /// `get_bytes` asked for more bytes than the store currently holds.
    #[error("caller bug: requested {requested} bytes but only {available} are stored")]
    Overdraw {
        /// Bytes the caller asked for.
        requested: usize,
        /// Bytes actually stored at the time of the call.
        available: usize,
    },
    /// An endpoint handle was used after its transport shut down.
    #[error("caller bug: endpoint used after its transport was dropped")]
    Detached,
}

/// Invalid [`ChannelOptions`](crate::ChannelOptions).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The requested capacity is below [`MIN_CAPACITY`](crate::MIN_CAPACITY).
    #[error("capacity {capacity} is below the minimum of {minimum} bytes")]
    #[allow(missing_docs)]
    CapacityTooSmall { capacity: usize, minimum: usize },
}

/// Failure reported by a [`WriteEndpoint`](crate::WriteEndpoint) or
/// [`ReadEndpoint`](crate::ReadEndpoint).
#[derive(Debug, Error)]
pub enum EndpointError {
    /// The caller misused the channel; see [`ContractViolation`].
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    /// Moving bytes to or from the caller's memory failed. The store is left
    /// as it was before the request.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EndpointError> for std::io::Error {
    fn from(err: EndpointError) -> Self {
        match err {
            EndpointError::Io(e) => e,
            EndpointError::Contract(violation) => std::io::Error::other(violation),
        }
    }
}
