//! Addressing for privileged-side remote traffic

use channel_types::PeerId;

/// Who a remote delivery is addressed to
///
/// Meaningful only for remote traffic issued from the privileged side,
/// which has three addressing modes. Local sends and unprivileged-side
/// remote sends ignore the target (`None`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Target {
    /// No explicit target: ignored for local scope; for a privileged-side
    /// remote send, equivalent to all peers
    #[default]
    None,
    /// Exactly one peer
    Peer(PeerId),
    /// A set of peers, each receiving its own delivery
    Peers(Vec<PeerId>),
    /// Every currently attached peer, via the broadcast primitive
    AllPeers,
}

impl Target {
    /// Returns the single addressed peer, if this target names exactly one
    pub fn single_peer(&self) -> Option<PeerId> {
        match self {
            Target::Peer(peer) => Some(*peer),
            _ => None,
        }
    }
}

impl From<PeerId> for Target {
    fn from(peer: PeerId) -> Self {
        Target::Peer(peer)
    }
}

impl From<Vec<PeerId>> for Target {
    fn from(peers: Vec<PeerId>) -> Self {
        Target::Peers(peers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_peer_extraction() {
        let peer = PeerId::new();
        assert_eq!(Target::Peer(peer).single_peer(), Some(peer));
        assert_eq!(Target::AllPeers.single_peer(), None);
        assert_eq!(Target::Peers(vec![peer]).single_peer(), None);
    }

    #[test]
    fn test_target_from_conversions() {
        let peer = PeerId::new();
        assert_eq!(Target::from(peer), Target::Peer(peer));
        assert_eq!(Target::from(vec![peer]), Target::Peers(vec![peer]));
    }
}
