//! # Channel Bus
//!
//! This crate is the public face of the named-channel dispatch layer: it
//! lets independent execution contexts (a privileged host and unprivileged
//! peers, or modules within one context) communicate by channel name
//! instead of direct references.
//!
//! ## Philosophy
//!
//! - **Availability over strictness**: a momentarily unresolved channel is
//!   a diagnostic, never a crash; notify senders are never blocked by
//!   receiver-side problems.
//! - **Startup races are absorbed, not forbidden**: the readiness barrier
//!   holds traffic until wiring completes, and the grace window tolerates a
//!   handler registering just after a delivery arrives.
//! - **One call in flight per site**: a `get` blocks its thread until its
//!   own reply arrives; concurrency wants distinct sites or notify.
//!
//! ## Interaction shapes
//!
//! Four, from the two axes: notify (fan-out, fire-and-forget) vs call
//! (single handler, request/response), each in local or remote scope.

pub mod bus;
pub mod config;
pub mod error;
pub mod responder;
pub mod wiring;

pub use bus::{Bus, Side, VERIFY_CHANNEL};
pub use config::BusConfig;
pub use error::BusError;
pub use responder::Responder;
pub use wiring::wire_in_memory;

pub use channel_transport::Target;
pub use channel_types::{ChannelArgs, ChannelValue, Delivery, Kind, PeerId, Scope};
