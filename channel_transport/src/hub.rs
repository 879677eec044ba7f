//! Privileged-side link table

use crate::frames::NotifyFrame;
use crate::link::{BoundaryLink, TransportError};
use crate::target::Target;
use channel_types::PeerId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Link table for the privileged side
///
/// Holds one boundary link per attached peer and resolves a [`Target`]
/// into the links a delivery fans out over. Broadcast-to-all is its own
/// primitive rather than a fan-out spelled by the caller.
pub struct PeerHub {
    links: Mutex<HashMap<PeerId, Arc<dyn BoundaryLink>>>,
}

impl PeerHub {
    /// Creates an empty hub
    pub fn new() -> Self {
        Self {
            links: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PeerId, Arc<dyn BoundaryLink>>> {
        self.links.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attaches a peer's link, replacing any previous link for that peer
    pub fn attach(&self, peer: PeerId, link: Arc<dyn BoundaryLink>) {
        self.lock().insert(peer, link);
    }

    /// Detaches a peer
    pub fn detach(&self, peer: PeerId) {
        self.lock().remove(&peer);
    }

    /// Returns the link for one peer
    pub fn link(&self, peer: PeerId) -> Result<Arc<dyn BoundaryLink>, TransportError> {
        self.lock()
            .get(&peer)
            .cloned()
            .ok_or(TransportError::PeerUnavailable(peer))
    }

    /// Resolves a target into the links a delivery fans out over
    ///
    /// Addressing an unattached peer fails the whole operation; the caller
    /// asked for that specific peer.
    pub fn links_for(&self, target: &Target) -> Result<Vec<Arc<dyn BoundaryLink>>, TransportError> {
        match target {
            Target::Peer(peer) => Ok(vec![self.link(*peer)?]),
            Target::Peers(peers) => peers.iter().map(|peer| self.link(*peer)).collect(),
            Target::None | Target::AllPeers => Ok(self.lock().values().cloned().collect()),
        }
    }

    /// Delivers one notify frame to every attached peer
    pub fn broadcast_notify(&self, frame: &NotifyFrame) -> Result<(), TransportError> {
        let links: Vec<_> = self.lock().values().cloned().collect();
        for link in links {
            link.notify(frame.clone())?;
        }
        Ok(())
    }

    /// Returns the ids of all attached peers
    pub fn peer_ids(&self) -> Vec<PeerId> {
        self.lock().keys().copied().collect()
    }

    /// Returns the number of attached peers
    pub fn count(&self) -> usize {
        self.lock().len()
    }
}

impl Default for PeerHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::{CallFrame, CallReply};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLink {
        notifies: AtomicUsize,
    }

    impl CountingLink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                notifies: AtomicUsize::new(0),
            })
        }
    }

    impl BoundaryLink for CountingLink {
        fn notify(&self, _frame: NotifyFrame) -> Result<(), TransportError> {
            self.notifies.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn call(&self, frame: CallFrame) -> Result<CallReply, TransportError> {
            Ok(CallReply::ok(frame.id, Vec::new()))
        }
    }

    #[test]
    fn test_attach_and_link_lookup() {
        let hub = PeerHub::new();
        let peer = PeerId::new();
        hub.attach(peer, CountingLink::new());
        assert!(hub.link(peer).is_ok());
        assert_eq!(hub.count(), 1);
    }

    #[test]
    fn test_unattached_peer_is_unavailable() {
        let hub = PeerHub::new();
        let peer = PeerId::new();
        assert_eq!(
            hub.link(peer).err(),
            Some(TransportError::PeerUnavailable(peer))
        );
    }

    #[test]
    fn test_detach_removes_link() {
        let hub = PeerHub::new();
        let peer = PeerId::new();
        hub.attach(peer, CountingLink::new());
        hub.detach(peer);
        assert_eq!(hub.count(), 0);
        assert!(hub.link(peer).is_err());
    }

    #[test]
    fn test_links_for_peer_set() {
        let hub = PeerHub::new();
        let a = PeerId::new();
        let b = PeerId::new();
        let c = PeerId::new();
        hub.attach(a, CountingLink::new());
        hub.attach(b, CountingLink::new());
        hub.attach(c, CountingLink::new());

        let links = hub.links_for(&Target::Peers(vec![a, c])).unwrap();
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_links_for_set_with_missing_peer_fails() {
        let hub = PeerHub::new();
        let a = PeerId::new();
        let ghost = PeerId::new();
        hub.attach(a, CountingLink::new());

        let result = hub.links_for(&Target::Peers(vec![a, ghost]));
        assert_eq!(result.err(), Some(TransportError::PeerUnavailable(ghost)));
    }

    #[test]
    fn test_broadcast_reaches_every_peer_once() {
        let hub = PeerHub::new();
        let links: Vec<_> = (0..3).map(|_| CountingLink::new()).collect();
        for link in &links {
            hub.attach(PeerId::new(), link.clone());
        }

        hub.broadcast_notify(&NotifyFrame::new("tick", Vec::new()))
            .unwrap();

        for link in &links {
            assert_eq!(link.notifies.load(Ordering::SeqCst), 1);
        }
    }
}
