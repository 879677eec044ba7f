//! Receiving-side delivery processing
//!
//! The responder owns the resolution step (wait briefly for a handler that
//! has not registered yet) and the dispatch step (fan out a notify, or
//! invoke the single call handler and capture its results). Registration
//! order across independently-initializing modules is not guaranteed; the
//! grace window absorbs that race instead of requiring strict ordering.

use channel_registry::Registry;
use channel_transport::{CallFrame, CallReply, InboundEndpoint, NotifyFrame, TransportError};
use channel_types::{ChannelArgs, Delivery, PeerId, Scope};
use log::warn;
use std::sync::Arc;
use std::time::Duration;

/// Resolution loop and dispatcher for one execution context
pub struct Responder {
    registry: Arc<Registry>,
    grace: Duration,
}

impl Responder {
    /// Creates a responder over a context's registry
    pub fn new(registry: Arc<Registry>, grace: Duration) -> Self {
        Self { registry, grace }
    }

    fn delivery(origin: Option<PeerId>, args: ChannelArgs) -> Delivery {
        match origin {
            Some(peer) => Delivery::from_peer(peer, args),
            None => Delivery::local(args),
        }
    }

    /// Processes an inbound notify delivery
    ///
    /// Every handler registered for (scope, name) runs in registration
    /// order, strictly sequentially, each seeing the same delivery. Handler
    /// failures are not caught here; propagation belongs to the handler's
    /// own execution context. An unresolved channel after the grace window
    /// is warn-and-drop: the sender expects no acknowledgment.
    pub fn handle_notify(&self, scope: Scope, origin: Option<PeerId>, frame: NotifyFrame) {
        match self.registry.wait_for_notify(scope, &frame.channel, self.grace) {
            Some(handlers) => {
                let delivery = Self::delivery(origin, frame.args);
                for handler in &handlers {
                    handler(&delivery);
                }
            }
            None => {
                warn!(
                    "dropping notify for unresolved {} channel '{}'",
                    scope, frame.channel
                );
            }
        }
    }

    /// Processes an inbound call delivery and produces its reply
    ///
    /// A frame with no channel name at all is a precondition violation,
    /// distinct from an unresolved channel: it fails the delivery itself
    /// rather than producing an error reply.
    pub fn handle_call(
        &self,
        scope: Scope,
        origin: Option<PeerId>,
        frame: CallFrame,
    ) -> Result<CallReply, TransportError> {
        if frame.channel.is_empty() {
            return Err(TransportError::MissingChannelName);
        }
        match self.registry.wait_for_call(scope, &frame.channel, self.grace) {
            Some(handler) => {
                let delivery = Self::delivery(origin, frame.args);
                Ok(match handler(&delivery) {
                    Ok(results) => CallReply::ok(frame.id, results),
                    Err(reason) => CallReply::err(frame.id, reason),
                })
            }
            None => {
                warn!(
                    "no handler resolved for {} call channel '{}'",
                    scope, frame.channel
                );
                Ok(CallReply::err(
                    frame.id,
                    format!("unresolved channel '{}'", frame.channel),
                ))
            }
        }
    }
}

/// Inbound traffic from a boundary link always lands in the remote tables
impl InboundEndpoint for Responder {
    fn deliver_notify(&self, origin: Option<PeerId>, frame: NotifyFrame) {
        self.handle_notify(Scope::Remote, origin, frame);
    }

    fn deliver_call(
        &self,
        origin: Option<PeerId>,
        frame: CallFrame,
    ) -> Result<CallReply, TransportError> {
        self.handle_call(Scope::Remote, origin, frame)
    }
}
