//! The bus facade
//!
//! One `Bus` per execution context. It owns that context's registry,
//! readiness barrier, and responder, plus the transport wiring for its
//! side of the boundary: a peer table on the host side, a single uplink
//! on the peer side.

use crate::config::BusConfig;
use crate::error::BusError;
use crate::responder::Responder;
use channel_registry::{ReadinessBarrier, Registry};
use channel_transport::{
    BoundaryLink, CallFrame, InboundEndpoint, NotifyFrame, PeerHub, Target, TransportError,
};
use channel_types::{ChannelArgs, ChannelValue, Delivery, Scope};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Channel name of the built-in existence probe
///
/// Bound on every context at start; its handler is the local existence
/// check, so the probe is defined on top of the same call mechanism it is
/// used to verify.
pub const VERIFY_CHANNEL: &str = "channel.verify";

/// Which side of the remote boundary a context occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The privileged side; addresses peers explicitly
    Host,
    /// An unprivileged side; all remote traffic goes to the host
    Peer,
}

enum Wiring {
    Unwired,
    Host(Arc<PeerHub>),
    Peer(Arc<dyn BoundaryLink>),
}

/// Named-channel dispatch for one execution context
pub struct Bus {
    side: Side,
    config: BusConfig,
    registry: Arc<Registry>,
    barrier: ReadinessBarrier,
    responder: Arc<Responder>,
    wiring: Mutex<Wiring>,
}

impl Bus {
    /// Creates an unwired bus for one side of the boundary
    ///
    /// Registration works immediately; `send` and `get` block until one of
    /// the start methods has wired the transport.
    pub fn new(side: Side, config: BusConfig) -> Self {
        let registry = Arc::new(Registry::new(config.debug));
        let responder = Arc::new(Responder::new(registry.clone(), config.grace_window));
        Self {
            side,
            config,
            registry,
            barrier: ReadinessBarrier::new(),
            responder,
            wiring: Mutex::new(Wiring::Unwired),
        }
    }

    /// Returns which side of the boundary this bus occupies
    pub fn side(&self) -> Side {
        self.side
    }

    /// Returns this bus's configuration
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Returns the endpoint a transport delivers inbound traffic to
    pub fn endpoint(&self) -> Arc<dyn InboundEndpoint> {
        self.responder.clone()
    }

    fn wiring(&self) -> MutexGuard<'_, Wiring> {
        self.wiring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wires a host-side bus to its peer table and opens the barrier
    pub fn start_host(&self, hub: Arc<PeerHub>) {
        self.bind_verify_channel();
        *self.wiring() = Wiring::Host(hub);
        self.barrier.set_ready();
    }

    /// Wires a peer-side bus to its uplink and opens the barrier
    pub fn start_peer(&self, uplink: Arc<dyn BoundaryLink>) {
        self.bind_verify_channel();
        *self.wiring() = Wiring::Peer(uplink);
        self.barrier.set_ready();
    }

    /// Binds the existence-probe handler: the local check, no peer argument
    fn bind_verify_channel(&self) {
        let registry = self.registry.clone();
        // A second start leaves the original binding in place.
        let _ = self.registry.bind_call(
            Scope::Remote,
            VERIFY_CHANNEL,
            Arc::new(move |delivery: &Delivery| {
                let name = delivery
                    .args
                    .first()
                    .and_then(ChannelValue::as_str)
                    .ok_or_else(|| "verification probe without a channel name".to_string())?;
                Ok(vec![ChannelValue::Bool(registry.exists(name))])
            }),
        );
    }

    /// Registers a notify handler; unlimited handlers per (scope, name)
    pub fn add<F>(&self, scope: Scope, name: &str, handler: F)
    where
        F: Fn(&Delivery) + Send + Sync + 'static,
    {
        self.registry.add_notify(scope, name, Arc::new(handler));
    }

    /// Binds the call handler for (scope, name); exactly one per name
    pub fn bind<F>(&self, scope: Scope, name: &str, handler: F) -> Result<(), BusError>
    where
        F: Fn(&Delivery) -> Result<ChannelArgs, String> + Send + Sync + 'static,
    {
        self.registry.bind_call(scope, name, Arc::new(handler))?;
        Ok(())
    }

    /// Clears every registration for `name`, in all scopes and kinds
    pub fn remove(&self, name: &str) {
        self.registry.remove(name);
    }

    /// Returns whether `name` is registered in any table of this context
    pub fn exists(&self, name: &str) -> bool {
        self.registry.exists(name)
    }

    /// Fire-and-forget delivery
    ///
    /// Blocks on the readiness barrier first. Local scope delivers
    /// in-process (target ignored). Remote scope from a peer always goes
    /// to the host; from the host it fans out per the target, with
    /// all-peers going through the broadcast primitive. A transport
    /// failure fails this specific send.
    pub fn send(
        &self,
        target: Target,
        scope: Scope,
        name: &str,
        args: ChannelArgs,
    ) -> Result<(), BusError> {
        self.barrier.wait();
        match scope {
            Scope::Local => {
                self.responder
                    .handle_notify(Scope::Local, None, NotifyFrame::new(name, args));
                Ok(())
            }
            Scope::Remote => {
                let frame = NotifyFrame::new(name, args);
                match self.side {
                    Side::Peer => {
                        let uplink = match &*self.wiring() {
                            Wiring::Peer(link) => link.clone(),
                            _ => return Err(TransportError::Disconnected.into()),
                        };
                        uplink.notify(frame)?;
                        Ok(())
                    }
                    Side::Host => {
                        let hub = match &*self.wiring() {
                            Wiring::Host(hub) => hub.clone(),
                            _ => return Err(TransportError::Disconnected.into()),
                        };
                        match &target {
                            Target::AllPeers | Target::None => hub.broadcast_notify(&frame)?,
                            addressed => {
                                for link in hub.links_for(addressed)? {
                                    link.notify(frame.clone())?;
                                }
                            }
                        }
                        Ok(())
                    }
                }
            }
        }
    }

    /// Broadcasts a remote notify to every attached peer
    ///
    /// Host-side convenience; fails with [`BusError::NotHost`] elsewhere.
    pub fn send_all_peers(&self, name: &str, args: ChannelArgs) -> Result<(), BusError> {
        if self.side != Side::Host {
            return Err(BusError::NotHost);
        }
        self.send(Target::AllPeers, Scope::Remote, name, args)
    }

    /// Request/response delivery
    ///
    /// Blocks on the readiness barrier, then blocks the issuing thread
    /// until this call's own reply (or failure) arrives. Remote calls from
    /// the host need exactly one target peer.
    pub fn get(
        &self,
        target: Target,
        scope: Scope,
        name: &str,
        args: ChannelArgs,
    ) -> Result<ChannelArgs, BusError> {
        self.barrier.wait();
        let reply = match scope {
            Scope::Local => {
                self.responder
                    .handle_call(Scope::Local, None, CallFrame::new(name, args))?
            }
            Scope::Remote => {
                let link = match self.side {
                    Side::Peer => match &*self.wiring() {
                        Wiring::Peer(link) => link.clone(),
                        _ => return Err(TransportError::Disconnected.into()),
                    },
                    Side::Host => {
                        let peer = target.single_peer().ok_or(BusError::NoTargetPeer)?;
                        match &*self.wiring() {
                            Wiring::Host(hub) => hub.link(peer)?,
                            _ => return Err(TransportError::Disconnected.into()),
                        }
                    }
                };
                link.call_correlated(CallFrame::new(name, args))?
            }
        };
        reply.result.map_err(|reason| BusError::CallFailed {
            name: name.to_string(),
            reason,
        })
    }

    /// Existence probe
    ///
    /// True when `name` is registered in any local table. When it is not:
    /// a peer-side bus answers false outright, with no cross-boundary
    /// probe; a host-side bus with a single target peer asks that peer over
    /// the verification channel. The probe is never issued for the
    /// verification channel's own name, which closes the recursion.
    pub fn verify(&self, target: Target, name: &str) -> Result<bool, BusError> {
        if self.registry.exists(name) {
            return Ok(true);
        }
        if self.side == Side::Peer || name == VERIFY_CHANNEL {
            return Ok(false);
        }
        let Some(peer) = target.single_peer() else {
            return Ok(false);
        };
        let results = self.get(
            Target::Peer(peer),
            Scope::Remote,
            VERIFY_CHANNEL,
            vec![ChannelValue::String(name.to_string())],
        )?;
        Ok(results
            .first()
            .and_then(ChannelValue::as_bool)
            .unwrap_or(false))
    }
}
