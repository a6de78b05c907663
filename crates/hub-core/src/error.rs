//! Error types for hub-core operations.

use alloc::string::String;
use core::fmt;
use hub_model::TransportError;

/// Error type for lifecycle and routing operations.
///
/// Command failures never show up here; they are in-band data on
/// `CommandOutcome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    /// The guid is not present in the registry being operated on.
    ProjectNotFound(String),
    /// The project was detached and can no longer route messages.
    ProjectDetached(String),
    /// The project has neither a controller nor a host session.
    NotRoutable(String),
    /// Host transport failure.
    Transport(TransportError),
}

impl fmt::Display for HubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HubError::ProjectNotFound(guid) => {
                write!(f, "project not found: \"{guid}\"")
            }
            HubError::ProjectDetached(guid) => {
                write!(f, "project \"{guid}\" is detached")
            }
            HubError::NotRoutable(guid) => {
                write!(
                    f,
                    "project \"{guid}\" has neither a controller nor a host session"
                )
            }
            HubError::Transport(err) => write!(f, "transport error: {err}"),
        }
    }
}

impl From<TransportError> for HubError {
    fn from(err: TransportError) -> Self {
        HubError::Transport(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HubError {}
