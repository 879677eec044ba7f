//! # Channel Registry
//!
//! This crate implements name-keyed handler registration for the dispatch
//! layer, plus the readiness barrier that gates traffic during startup.
//!
//! ## Philosophy
//!
//! - **One map, one invariant**: all four (scope, kind) tables live in a
//!   single map keyed by the full (scope, kind, name) tuple, so the
//!   call-channel cardinality rule is enforced in exactly one place.
//! - **Owned, not global**: a registry is a plain owned object, one per
//!   execution context, threaded through explicitly.
//! - **Wait, don't spin**: lookups that tolerate a late registration block
//!   on a condition variable signaled by registration, bounded by a grace
//!   window on a monotonic clock.

pub mod barrier;
pub mod registry;

pub use barrier::ReadinessBarrier;
pub use registry::{Registry, RegistryError};
