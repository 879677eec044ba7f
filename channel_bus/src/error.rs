//! Facade-level error types

use channel_registry::RegistryError;
use channel_transport::TransportError;
use thiserror::Error;

/// Error types for bus operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// Registration failed (duplicate call binding)
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The boundary-crossing primitive failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A call produced no result: the responder reported an unresolved
    /// channel or the handler surfaced an error
    #[error("call on channel '{name}' failed: {reason}")]
    CallFailed {
        /// Channel name the call addressed
        name: String,
        /// Error text surfaced by the responder
        reason: String,
    },

    /// The operation is only available on the privileged side
    #[error("operation is only available on the host side")]
    NotHost,

    /// A host-side remote call needs exactly one target peer
    #[error("remote call from the host side requires a single target peer")]
    NoTargetPeer,
}
