//! # Channel Transport
//!
//! This crate defines the boundary-crossing layer of the dispatch system:
//! wire frames, the link trait a concrete transport implements, and the
//! privileged-side peer table.
//!
//! ## Philosophy
//!
//! - **Correlated, not multiplexed**: a call site carries one in-flight
//!   request at a time; the reply's correlation id must match, and a
//!   mismatch is a transport error rather than a misrouted wakeup.
//! - **Errors re-raised, never swallowed**: a failing link fails the
//!   specific send or get that used it. Retries belong to the caller.
//! - **Role-directed routing**: an unprivileged initiator always targets
//!   the privileged side; the privileged side addresses one peer, a set,
//!   or all peers through a distinct broadcast primitive.

pub mod frames;
pub mod hub;
pub mod link;
pub mod memory;
pub mod target;

pub use frames::{CallFrame, CallReply, FrameId, NotifyFrame};
pub use hub::PeerHub;
pub use link::{BoundaryLink, InboundEndpoint, TransportError};
pub use memory::MemoryLink;
pub use target::Target;
