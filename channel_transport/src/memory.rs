//! Same-process boundary links
//!
//! An in-memory link pairs an initiator with the responder on the other
//! side of the (simulated) boundary, delivering frames synchronously.
//! Integration tests and demos wire a host and several peers over these.

use crate::frames::{CallFrame, CallReply, NotifyFrame};
use crate::link::{BoundaryLink, InboundEndpoint, TransportError};
use channel_types::PeerId;
use std::sync::{Arc, Weak};

/// In-memory boundary link
///
/// Holds the far side's endpoint weakly, so a dropped context reads as a
/// disconnected link rather than being kept alive by its initiators.
pub struct MemoryLink {
    /// Identity stamped onto deliveries crossing peer-to-host
    origin: Option<PeerId>,
    endpoint: Weak<dyn InboundEndpoint>,
}

impl MemoryLink {
    /// Creates a peer's uplink into the host's endpoint
    ///
    /// Deliveries over this link carry `origin`, so host-side handlers
    /// learn which peer fired.
    pub fn to_host(origin: PeerId, host: &Arc<dyn InboundEndpoint>) -> Arc<Self> {
        Arc::new(Self {
            origin: Some(origin),
            endpoint: Arc::downgrade(host),
        })
    }

    /// Creates the host's link down into one peer's endpoint
    ///
    /// Deliveries over this link carry no origin; the privileged side is
    /// not a peer.
    pub fn to_peer(peer_endpoint: &Arc<dyn InboundEndpoint>) -> Arc<Self> {
        Arc::new(Self {
            origin: None,
            endpoint: Arc::downgrade(peer_endpoint),
        })
    }

    fn endpoint(&self) -> Result<Arc<dyn InboundEndpoint>, TransportError> {
        self.endpoint.upgrade().ok_or(TransportError::Disconnected)
    }
}

impl BoundaryLink for MemoryLink {
    fn notify(&self, frame: NotifyFrame) -> Result<(), TransportError> {
        self.endpoint()?.deliver_notify(self.origin, frame);
        Ok(())
    }

    fn call(&self, frame: CallFrame) -> Result<CallReply, TransportError> {
        self.endpoint()?.deliver_call(self.origin, frame)
    }
}
