//! Same-process wiring helpers
//!
//! Connects one host bus and any number of peer buses over in-memory
//! links, then opens their barriers. Peers start first: a peer firing the
//! moment its barrier opens lands in the host responder, where the grace
//! window covers any registrations still in flight.

use crate::bus::Bus;
use channel_transport::{MemoryLink, PeerHub};
use channel_types::PeerId;
use std::sync::Arc;

/// Wires a host and its peers over in-memory links and starts them all
///
/// Returns the assigned peer ids, in the same order as `peers`.
pub fn wire_in_memory(host: &Bus, peers: &[&Bus]) -> Vec<PeerId> {
    let hub = Arc::new(PeerHub::new());
    let host_endpoint = host.endpoint();

    let mut ids = Vec::with_capacity(peers.len());
    for peer in peers {
        let id = PeerId::new();
        hub.attach(id, MemoryLink::to_peer(&peer.endpoint()));
        peer.start_peer(MemoryLink::to_host(id, &host_endpoint));
        ids.push(id);
    }

    host.start_host(hub);
    ids
}
