//! Wire types shared with the remote coordinating host.

use alloc::string::String;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Protocol version carried by [`Announcement`].
pub const ANNOUNCEMENT_VERSION: u32 = 1;

/// Payload a project sends to the remote server when announcing itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub version: u32,
    pub project_guid: String,
}

impl Announcement {
    pub fn new(project_guid: String) -> Self {
        Self {
            version: ANNOUNCEMENT_VERSION,
            project_guid,
        }
    }
}

/// Error type for host transport operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Underlying session is gone.
    ConnectionLost,
    /// Outbound channel cannot accept more messages (backpressure).
    ChannelFull,
    /// Message could not be encoded or decoded.
    Serialization(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::ConnectionLost => write!(f, "connection lost"),
            TransportError::ChannelFull => write!(f, "outbound channel full"),
            TransportError::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TransportError {}
