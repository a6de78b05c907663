//! Host-side transport traits.
//!
//! A `HostTransport` is the byte channel behind an established wireless
//! session; connection setup/teardown belongs to the radio collaborator,
//! reached through `NetworkProvider`. Neither trait retries or backs off.

use alloc::boxed::Box;
use hub_model::TransportError;

/// Trait for an established session to a remote peer/server.
pub trait HostTransport: Send {
    /// Send a message to the coordinating server.
    fn send_to_server(&mut self, message: &str) -> Result<(), TransportError>;

    /// Send a message to a specific remote project.
    fn send_to_project(&mut self, message: &str, target_guid: &str) -> Result<(), TransportError>;

    /// Close the session.
    fn close(&mut self) -> Result<(), TransportError>;
}

/// Platform capability that establishes wireless sessions.
///
/// Concrete controller variants supply an implementation; there is no
/// default. Connecting blocks until success or failure is known.
pub trait NetworkProvider: Send {
    fn connect(&mut self) -> Result<Box<dyn HostTransport>, TransportError>;
}
