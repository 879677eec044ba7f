//! Wire frames for boundary-crossing deliveries

use channel_types::ChannelArgs;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a frame
///
/// Every request frame carries one; the reply echoes it back as its
/// correlation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId(Uuid);

impl FrameId {
    /// Creates a new random frame ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a frame ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for FrameId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({})", self.0)
    }
}

/// Fire-and-forget delivery frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotifyFrame {
    /// Unique identifier for this frame
    pub id: FrameId,
    /// Target channel name
    pub channel: String,
    /// Ordered argument list
    pub args: ChannelArgs,
}

impl NotifyFrame {
    /// Creates a notify frame for a channel
    pub fn new(channel: impl Into<String>, args: ChannelArgs) -> Self {
        Self {
            id: FrameId::new(),
            channel: channel.into(),
            args,
        }
    }
}

/// Request frame for a call channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallFrame {
    /// Unique identifier, echoed back as the reply's correlation
    pub id: FrameId,
    /// Target channel name
    pub channel: String,
    /// Ordered argument list
    pub args: ChannelArgs,
}

impl CallFrame {
    /// Creates a call frame for a channel
    pub fn new(channel: impl Into<String>, args: ChannelArgs) -> Self {
        Self {
            id: FrameId::new(),
            channel: channel.into(),
            args,
        }
    }
}

/// Reply frame for a call channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallReply {
    /// The request frame this reply answers
    pub correlation: FrameId,
    /// Full ordered result list, or the error text the responder surfaced
    pub result: Result<ChannelArgs, String>,
}

impl CallReply {
    /// Creates a successful reply carrying the handler's result list
    pub fn ok(correlation: FrameId, results: ChannelArgs) -> Self {
        Self {
            correlation,
            result: Ok(results),
        }
    }

    /// Creates an error reply
    pub fn err(correlation: FrameId, reason: impl Into<String>) -> Self {
        Self {
            correlation,
            result: Err(reason.into()),
        }
    }
}
