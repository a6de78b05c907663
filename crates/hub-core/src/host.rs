//! Established host sessions.
//!
//! A session wraps the transport behind a blocking mutex and is shared via
//! `Arc`: whichever controller or project holds a handle keeps the session
//! alive, and the transport is dropped when the last holder releases it.
//! Reconnection and backoff are collaborator concerns, not handled here.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::cell::RefCell;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use hub_model::TransportError;
use hub_shared::transport::HostTransport;

/// Shared handle to an established host session.
pub type HostSessionHandle = Arc<HostSession>;

/// An established session to a remote peer/server.
pub struct HostSession {
    transport: Mutex<CriticalSectionRawMutex, RefCell<Box<dyn HostTransport>>>,
}

impl HostSession {
    pub fn new(transport: Box<dyn HostTransport>) -> HostSessionHandle {
        Arc::new(Self {
            transport: Mutex::new(RefCell::new(transport)),
        })
    }

    pub fn send_to_server(&self, message: &str) -> Result<(), TransportError> {
        self.transport
            .lock(|transport| transport.borrow_mut().send_to_server(message))
    }

    pub fn send_to_project(
        &self,
        message: &str,
        target_guid: &str,
    ) -> Result<(), TransportError> {
        self.transport
            .lock(|transport| transport.borrow_mut().send_to_project(message, target_guid))
    }

    pub fn close(&self) -> Result<(), TransportError> {
        self.transport.lock(|transport| transport.borrow_mut().close())
    }
}

/// Result of a connect attempt, consumed by both controller and project.
pub struct HostConnectionResult {
    pub is_successful: bool,
    pub session: Option<HostSessionHandle>,
}

impl HostConnectionResult {
    pub fn connected(session: HostSessionHandle) -> Self {
        Self {
            is_successful: true,
            session: Some(session),
        }
    }

    pub fn failed() -> Self {
        Self {
            is_successful: false,
            session: None,
        }
    }
}
