//! Handler payloads and handler signatures
//!
//! Arguments and results are ordered lists of tagged values. Channels carry
//! no schema; the shape of each list is an out-of-band agreement between the
//! initiator and the handler for that channel name.

use crate::PeerId;
use std::sync::Arc;

/// A single tagged argument or result value
pub type ChannelValue = serde_json::Value;

/// An ordered argument or result list
pub type ChannelArgs = Vec<ChannelValue>;

/// The unit handed to a handler for one delivery
///
/// `origin` is `Some` exactly when a remote delivery was initiated by the
/// opposite role: the receiving side learns which peer fired, prepended to
/// the handler's view of the arguments.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Originating peer, for remote deliveries initiated by the other side
    pub origin: Option<PeerId>,
    /// Ordered argument list
    pub args: ChannelArgs,
}

impl Delivery {
    /// Creates a delivery with no originating peer (local, or host-to-peer)
    pub fn local(args: ChannelArgs) -> Self {
        Self { origin: None, args }
    }

    /// Creates a delivery carrying the originating peer
    pub fn from_peer(origin: PeerId, args: ChannelArgs) -> Self {
        Self {
            origin: Some(origin),
            args,
        }
    }
}

/// Handler for notify channels
///
/// Invoked for effect only; failures propagate in the handler's own
/// execution context, not through the dispatcher.
pub type NotifyHandler = Arc<dyn Fn(&Delivery) + Send + Sync>;

/// Handler for call channels
///
/// Returns the full ordered result list, or an error string the transport
/// surfaces to the initiating caller.
pub type CallHandler = Arc<dyn Fn(&Delivery) -> Result<ChannelArgs, String> + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_delivery_local_has_no_origin() {
        let delivery = Delivery::local(vec![json!(1), json!("a")]);
        assert!(delivery.origin.is_none());
        assert_eq!(delivery.args.len(), 2);
    }

    #[test]
    fn test_delivery_from_peer_carries_origin() {
        let peer = PeerId::new();
        let delivery = Delivery::from_peer(peer, vec![json!(true)]);
        assert_eq!(delivery.origin, Some(peer));
    }

    #[test]
    fn test_call_handler_signature() {
        let handler: CallHandler = Arc::new(|delivery| Ok(delivery.args.clone()));
        let result = handler(&Delivery::local(vec![json!(4)])).unwrap();
        assert_eq!(result, vec![json!(4)]);
    }
}
