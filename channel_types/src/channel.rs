//! Channel classification axes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a channel crosses an execution-context boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Communication within one execution context (module to module)
    Local,
    /// Communication across an execution-context boundary
    Remote,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Local => write!(f, "local"),
            Scope::Remote => write!(f, "remote"),
        }
    }
}

/// Whether a channel fans out to many handlers or routes to exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// Fire-and-forget; zero or more handlers, invoked in registration order
    Notify,
    /// Request/response; exactly one handler
    Call,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Notify => write!(f, "notify"),
            Kind::Call => write!(f, "call"),
        }
    }
}
