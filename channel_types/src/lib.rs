//! # Channel Types
//!
//! This crate defines the fundamental types shared by the named-channel
//! dispatch layer.
//!
//! ## Philosophy
//!
//! - **Names, not references**: callers and handlers agree on a string
//!   channel name; neither side holds a reference to the other.
//! - **Explicit over implicit**: scope (local vs remote) and kind (notify
//!   vs call) are typed enums, never inferred from call shape.
//! - **Opaque payloads**: arguments and results are ordered lists of
//!   tagged values; the expected shape per channel is agreed out-of-band.
//!
//! ## Key Types
//!
//! - [`PeerId`]: identifier for an addressable party across the boundary
//! - [`Scope`] / [`Kind`]: the two axes every channel is keyed on
//! - [`Delivery`]: the unit handed to handlers (origin peer + arguments)

pub mod channel;
pub mod delivery;
pub mod ids;

pub use channel::{Kind, Scope};
pub use delivery::{CallHandler, ChannelArgs, ChannelValue, Delivery, NotifyHandler};
pub use ids::PeerId;
