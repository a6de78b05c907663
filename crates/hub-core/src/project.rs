//! Project interface.
//!
//! A project is one logical unit of device behavior, bound at construction
//! to exactly one of a local [`Controller`] (the live local handler) or a
//! remote host session (a remote proxy), never both. Each project keeps its
//! own mutex-guarded set of related sub-projects, keyed by guid.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use hub_model::outcome::CommandOutcome;
use hub_model::wire::Announcement;

use crate::controller::Controller;
use crate::error::HubError;
use crate::host::{HostConnectionResult, HostSessionHandle};

/// Capability queries a concrete project kind must answer.
///
/// A missing specialization is a type error at the construction site, not
/// a logged runtime stub.
pub trait ProjectCapabilities: Send + Sync {
    /// Project type ids this project may attach as sub-projects.
    fn related_project_type_ids(&self) -> &[u32];
}

/// Capability list fixed at construction time.
pub struct StaticCapabilities {
    type_ids: Vec<u32>,
}

impl StaticCapabilities {
    pub fn new(type_ids: Vec<u32>) -> Self {
        Self { type_ids }
    }

    /// A project kind that attaches no sub-projects.
    pub fn none() -> Self {
        Self::new(Vec::new())
    }
}

impl ProjectCapabilities for StaticCapabilities {
    fn related_project_type_ids(&self) -> &[u32] {
        &self.type_ids
    }
}

/// What happened to a message handed to [`Project::send_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Executed locally through the controller codec.
    Executed(CommandOutcome),
    /// Routed to the remote side, which owns execution.
    Forwarded,
}

/// One logical project, local or remote.
pub struct Project {
    project_guid: String,
    project_type_id: u32,
    response_version: u32,
    controller: Option<Arc<Controller>>,
    host: Mutex<CriticalSectionRawMutex, RefCell<Option<HostSessionHandle>>>,
    related: Mutex<CriticalSectionRawMutex, RefCell<Vec<Arc<Project>>>>,
    capabilities: Box<dyn ProjectCapabilities>,
    detached: AtomicBool,
}

impl Project {
    /// Bind a fresh project to the local controller.
    ///
    /// Registers the project in the controller registry and installs an
    /// interrupt callback that re-reads the controller's last message and
    /// dispatches it to this project. The callback holds a weak reference,
    /// so a dropped project never keeps the controller's slot alive.
    pub fn attach_local(
        controller: Arc<Controller>,
        project_guid: String,
        project_type_id: u32,
        response_version: u32,
        capabilities: Box<dyn ProjectCapabilities>,
    ) -> Arc<Self> {
        controller.attach(project_type_id, &project_guid, response_version);

        let project = Arc::new(Self {
            project_guid,
            project_type_id,
            response_version,
            controller: Some(controller.clone()),
            host: Mutex::new(RefCell::new(None)),
            related: Mutex::new(RefCell::new(Vec::new())),
            capabilities,
            detached: AtomicBool::new(false),
        });

        let weak: Weak<Self> = Arc::downgrade(&project);
        controller.register_interrupt_callback(move || {
            let Some(project) = weak.upgrade() else {
                return;
            };
            let Some(controller) = project.controller.as_ref() else {
                return;
            };
            if let Some(message) = controller.last_interrupt_message() {
                project.handle_inbound(&message);
            }
        });

        project
    }

    /// A remote proxy for a project living behind a host session.
    pub fn new_remote(
        host: HostSessionHandle,
        project_guid: String,
        project_type_id: u32,
        response_version: u32,
        capabilities: Box<dyn ProjectCapabilities>,
    ) -> Arc<Self> {
        Arc::new(Self {
            project_guid,
            project_type_id,
            response_version,
            controller: None,
            host: Mutex::new(RefCell::new(Some(host))),
            related: Mutex::new(RefCell::new(Vec::new())),
            capabilities,
            detached: AtomicBool::new(false),
        })
    }

    pub fn guid(&self) -> &str {
        &self.project_guid
    }

    pub fn project_type_id(&self) -> u32 {
        self.project_type_id
    }

    pub fn response_version(&self) -> u32 {
        self.response_version
    }

    pub fn is_local(&self) -> bool {
        self.controller.is_some()
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    pub fn related_project_type_ids(&self) -> &[u32] {
        self.capabilities.related_project_type_ids()
    }

    /// Give this project a host session (for announcements and remote
    /// routing), replacing any previous one.
    pub fn set_host_session(&self, session: HostSessionHandle) {
        self.host.lock(|host| *host.borrow_mut() = Some(session));
    }

    fn host_session(&self) -> Option<HostSessionHandle> {
        self.host.lock(|host| host.borrow().clone())
    }

    /// Route one message.
    ///
    /// Local projects execute through the controller codec; remote proxies
    /// forward over the host session. A project with neither is a
    /// configuration error, logged and aborted.
    pub fn send_message(&self, message: &str) -> Result<SendOutcome, HubError> {
        if self.is_detached() {
            log::warn!("send_message on detached project \"{}\"", self.project_guid);
            return Err(HubError::ProjectDetached(self.project_guid.clone()));
        }

        if let Some(controller) = &self.controller {
            return Ok(SendOutcome::Executed(controller.receive_from_project(message)));
        }

        match self.host_session() {
            Some(session) => {
                session.send_to_project(message, &self.project_guid)?;
                Ok(SendOutcome::Forwarded)
            }
            None => {
                log::error!(
                    "project \"{}\" has neither a controller nor a host session",
                    self.project_guid
                );
                Err(HubError::NotRoutable(self.project_guid.clone()))
            }
        }
    }

    /// Inbound delivery from the controller's interrupt path.
    ///
    /// Local projects answer by executing the command; the outcome is
    /// bridged to the host session when one exists. Remote proxies forward
    /// the raw message to the side that owns execution.
    pub fn handle_inbound(&self, message: &str) {
        if self.is_detached() {
            log::warn!(
                "dropping inbound message for detached project \"{}\"",
                self.project_guid
            );
            return;
        }

        if let Some(controller) = &self.controller {
            let outcome = controller.receive_from_project(message);
            log::debug!(
                "project \"{}\" executed command {}: successful={} value={}",
                self.project_guid,
                outcome.command_id,
                outcome.is_successful,
                outcome.value
            );
            if let Some(session) = self.host_session() {
                match serde_json::to_string(&outcome) {
                    Ok(json) => {
                        if let Err(err) = session.send_to_server(&json) {
                            log::warn!("failed to bridge outcome to host: {err}");
                        }
                    }
                    Err(err) => log::warn!("failed to encode outcome: {err}"),
                }
            }
            return;
        }

        match self.host_session() {
            Some(session) => {
                if let Err(err) = session.send_to_project(message, &self.project_guid) {
                    log::warn!("failed to forward message to remote project: {err}");
                }
            }
            None => log::error!(
                "project \"{}\" has neither a controller nor a host session",
                self.project_guid
            ),
        }
    }

    /// Attach a related sub-project, keyed by guid. Re-attaching a guid
    /// already present is a logged no-op.
    pub fn attach_related_project(&self, project: Arc<Project>) {
        self.related.lock(|related| {
            let mut related = related.borrow_mut();
            if related.iter().any(|p| p.guid() == project.guid()) {
                log::debug!(
                    "attach_related_project: \"{}\" already attached, ignoring",
                    project.guid()
                );
                return;
            }
            related.push(project);
        });
    }

    /// Detach a related sub-project by guid. Not-found is logged and
    /// reported, state unchanged.
    pub fn detach_related_project(&self, project_guid: &str) -> Result<(), HubError> {
        self.related.lock(|related| {
            let mut related = related.borrow_mut();
            match related.iter().position(|p| p.guid() == project_guid) {
                Some(index) => {
                    related.remove(index);
                    Ok(())
                }
                None => {
                    log::warn!("failed to find expired project \"{project_guid}\"");
                    Err(HubError::ProjectNotFound(project_guid.to_string()))
                }
            }
        })
    }

    /// Read-only snapshot of related project guids, for diagnostics.
    pub fn related_project_guids(&self) -> Vec<String> {
        self.related.lock(|related| {
            related
                .borrow()
                .iter()
                .map(|p| p.guid().to_string())
                .collect()
        })
    }

    /// Log each related project guid.
    pub fn log_related_projects(&self) {
        for guid in self.related_project_guids() {
            log::info!("project: {guid}");
        }
    }

    /// Announce this project to the remote server.
    ///
    /// Requires an established host session; calling without one is a
    /// precondition violation (logged, nothing sent), not a recoverable
    /// error.
    pub fn try_connect_to_server(&self) -> HostConnectionResult {
        let Some(session) = self.host_session() else {
            log::error!(
                "failed to announce project \"{}\" while not connected to host",
                self.project_guid
            );
            return HostConnectionResult::failed();
        };

        let announcement = Announcement::new(self.project_guid.clone());
        let json = match serde_json::to_string(&announcement) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("failed to encode announcement: {err}");
                return HostConnectionResult::failed();
            }
        };

        match session.send_to_server(&json) {
            Ok(()) => HostConnectionResult::connected(session),
            Err(err) => {
                log::warn!("failed to announce project \"{}\": {err}", self.project_guid);
                HostConnectionResult::failed()
            }
        }
    }

    /// Detach this project. Terminal for this guid: subsequent sends fail
    /// and inbound messages are dropped. The registry slot may be reused
    /// later by a distinct guid.
    ///
    /// The controller's callback slot is left alone: a newer project may
    /// have replaced this project's registration, and this project's own
    /// callback goes inert through the detached flag.
    pub fn detach(&self) -> Result<(), HubError> {
        if self.detached.swap(true, Ordering::SeqCst) {
            log::debug!("project \"{}\" already detached", self.project_guid);
            return Ok(());
        }

        // Release the session first so a registry error cannot leave a
        // detached project still holding its host connection.
        self.host.lock(|host| host.borrow_mut().take());
        if let Some(controller) = &self.controller {
            controller.detach(&self.project_guid)?;
        }
        Ok(())
    }
}
