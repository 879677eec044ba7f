//! Boundary-crossing traits and transport errors

use crate::frames::{CallFrame, CallReply, NotifyFrame};
use channel_types::PeerId;
use thiserror::Error;

/// Error types for boundary-crossing operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No link is attached for the addressed peer
    #[error("peer {0} is not attached")]
    PeerUnavailable(PeerId),

    /// The link's far side is gone
    #[error("link disconnected")]
    Disconnected,

    /// A reply arrived whose correlation does not match the request
    #[error("reply correlation does not match the in-flight request")]
    CorrelationMismatch,

    /// An inbound call frame carried no channel name
    ///
    /// Distinct from an unresolved channel: this frame cannot even be
    /// routed, and the responder treats it as a precondition violation.
    #[error("call frame carried no channel name")]
    MissingChannelName,

    /// Frame encoding or decoding failed
    #[error("codec error: {0}")]
    Codec(String),
}

/// One direction of a boundary crossing
///
/// A concrete transport implements this once per direction: the
/// unprivileged side holds a single uplink to the privileged side; the
/// privileged side holds one link per attached peer. Both operations are
/// synchronous — `call` blocks its thread until the reply for this request
/// arrives, which is what keeps one call in flight per call site.
pub trait BoundaryLink: Send + Sync {
    /// Delivers a fire-and-forget frame to the far side
    fn notify(&self, frame: NotifyFrame) -> Result<(), TransportError>;

    /// Delivers a call frame and blocks until its reply arrives
    fn call(&self, frame: CallFrame) -> Result<CallReply, TransportError>;

    /// Delivers a call frame and verifies the reply's correlation
    ///
    /// A reply answering some other request is rejected here instead of
    /// being handed to the wrong waiter.
    fn call_correlated(&self, frame: CallFrame) -> Result<CallReply, TransportError> {
        let request_id = frame.id;
        let reply = self.call(frame)?;
        if reply.correlation != request_id {
            return Err(TransportError::CorrelationMismatch);
        }
        Ok(reply)
    }
}

/// The receiving side of a boundary crossing
///
/// Implemented by the responder that owns the registry on the far side.
/// `origin` is `Some` when the initiator was an unprivileged peer, so the
/// privileged side's handlers learn who fired.
pub trait InboundEndpoint: Send + Sync {
    /// Accepts a fire-and-forget delivery
    fn deliver_notify(&self, origin: Option<PeerId>, frame: NotifyFrame);

    /// Accepts a call delivery and produces its reply
    fn deliver_call(
        &self,
        origin: Option<PeerId>,
        frame: CallFrame,
    ) -> Result<CallReply, TransportError>;
}
