//! The hardware-facing controller interface.
//!
//! Owns the registry of attached projects, the interrupt delivery path and
//! the command codec entry point. Registry mutation happens under a
//! blocking critical-section mutex with no timeout; no lock is ever held
//! across a blocking hardware call (the codec path takes the pin provider
//! out of its slot before executing). Starvation is a known risk of the
//! blocking contract, not hidden behind a timeout.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use hub_model::command::parse_command_line;
use hub_model::outcome::CommandOutcome;
use hub_shared::pins::PinProvider;
use hub_shared::transport::NetworkProvider;

use crate::codec;
use crate::error::HubError;
use crate::host::{HostConnectionResult, HostSession};
use crate::notify::InterruptSlot;

/// One registry entry for an attached project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedProject {
    pub project_guid: String,
    pub project_type_id: u32,
    /// Protocol version negotiated at attach time.
    pub response_version: u32,
}

/// The hardware-facing registry and routing core.
///
/// Created once at boot and shared (`Arc` or `static`) between the main
/// execution context and interrupt context; every method takes `&self`.
pub struct Controller {
    pins: Mutex<CriticalSectionRawMutex, RefCell<Option<Box<dyn PinProvider + Send>>>>,
    network: Mutex<CriticalSectionRawMutex, RefCell<Option<Box<dyn NetworkProvider>>>>,
    attached: Mutex<CriticalSectionRawMutex, RefCell<Vec<AttachedProject>>>,
    last_interrupt_message: Mutex<CriticalSectionRawMutex, RefCell<Option<String>>>,
    interrupt: InterruptSlot,
}

impl Controller {
    /// A controller without network capability; `connect_to_network` will
    /// report failure until a platform provides one via [`with_network`].
    ///
    /// [`with_network`]: Controller::with_network
    pub fn new(pins: Box<dyn PinProvider + Send>) -> Self {
        Self {
            pins: Mutex::new(RefCell::new(Some(pins))),
            network: Mutex::new(RefCell::new(None)),
            attached: Mutex::new(RefCell::new(Vec::new())),
            last_interrupt_message: Mutex::new(RefCell::new(None)),
            interrupt: InterruptSlot::new(),
        }
    }

    pub fn with_network(
        pins: Box<dyn PinProvider + Send>,
        network: Box<dyn NetworkProvider>,
    ) -> Self {
        let controller = Self::new(pins);
        controller.network.lock(|slot| *slot.borrow_mut() = Some(network));
        controller
    }

    /// Add a fresh project to the registry.
    ///
    /// Idempotent per guid: re-attaching an already attached guid is a
    /// logged no-op, never a duplicate entry.
    pub fn attach(&self, project_type_id: u32, project_guid: &str, response_version: u32) {
        self.attached.lock(|attached| {
            let mut attached = attached.borrow_mut();
            if attached.iter().any(|entry| entry.project_guid == project_guid) {
                log::debug!("attach: project \"{project_guid}\" already attached, ignoring");
                return;
            }
            attached.push(AttachedProject {
                project_guid: project_guid.to_string(),
                project_type_id,
                response_version,
            });
            log::debug!(
                "attached project \"{project_guid}\" (type {project_type_id}, version {response_version})"
            );
        });
    }

    /// Remove an expired project from the registry.
    ///
    /// Detaching a guid that was never attached leaves the registry
    /// unchanged; the condition is logged and reported, not fatal.
    pub fn detach(&self, project_guid: &str) -> Result<(), HubError> {
        self.attached.lock(|attached| {
            let mut attached = attached.borrow_mut();
            match attached.iter().position(|entry| entry.project_guid == project_guid) {
                Some(index) => {
                    attached.remove(index);
                    log::debug!("detached project \"{project_guid}\"");
                    Ok(())
                }
                None => {
                    log::warn!("failed to find expired project \"{project_guid}\"");
                    Err(HubError::ProjectNotFound(project_guid.to_string()))
                }
            }
        })
    }

    /// Read-only snapshot of attached project guids, for diagnostics.
    pub fn list_attached_projects(&self) -> Vec<String> {
        self.attached.lock(|attached| {
            attached
                .borrow()
                .iter()
                .map(|entry| entry.project_guid.clone())
                .collect()
        })
    }

    /// Log each attached project guid.
    pub fn log_attached_projects(&self) {
        for guid in self.list_attached_projects() {
            log::info!("project: {guid}");
        }
    }

    /// Deliver a message from the controller to an attached project.
    ///
    /// The guid is validated against the registry; delivery itself goes
    /// through the single interrupt callback slot, so whichever project
    /// registered last receives the message (single-active-project
    /// semantics; there is no per-guid dispatch table).
    pub fn send_to_project(&self, message: &str, project_guid: &str) -> Result<(), HubError> {
        let is_attached = self.attached.lock(|attached| {
            attached
                .borrow()
                .iter()
                .any(|entry| entry.project_guid == project_guid)
        });
        if !is_attached {
            log::warn!("send_to_project: project \"{project_guid}\" is not attached");
            return Err(HubError::ProjectNotFound(project_guid.to_string()));
        }
        self.raise_interrupt(message);
        Ok(())
    }

    /// Accept outbound text from the attached project and execute it.
    ///
    /// The pin provider is taken out of its slot for the duration of the
    /// command, so a blocking `DELAY` never stalls the interrupt path. A
    /// command arriving while the provider is out fails in-band with the
    /// parsed command id; commands are not queued.
    pub fn receive_from_project(&self, message: &str) -> CommandOutcome {
        let Some(mut pins) = self.pins.lock(|slot| slot.borrow_mut().take()) else {
            log::warn!("receive_from_project: pin provider is busy, rejecting command");
            return CommandOutcome::failure(parse_command_line(message).command_id);
        };
        let outcome = codec::execute(message, pins.as_mut());
        self.pins.lock(|slot| *slot.borrow_mut() = Some(pins));
        outcome
    }

    /// Store a callback invoked on interrupt, replacing any previous one.
    ///
    /// The callback takes no arguments and is expected to re-read
    /// [`last_interrupt_message`](Controller::last_interrupt_message).
    pub fn register_interrupt_callback(&self, callback: impl FnMut() + Send + 'static) {
        self.interrupt.register(callback);
    }

    pub fn clear_interrupt_callback(&self) {
        self.interrupt.clear();
    }

    /// Most recent message captured by an interrupt. Single slot, not a
    /// queue: each interrupt overwrites the previous message.
    pub fn last_interrupt_message(&self) -> Option<String> {
        self.last_interrupt_message
            .lock(|message| message.borrow().clone())
    }

    /// Interrupt entry point: capture the message, then fire the callback.
    ///
    /// The message slot is released before the callback runs so the
    /// callback can re-read it without re-entering the lock.
    pub fn raise_interrupt(&self, message: &str) {
        self.last_interrupt_message
            .lock(|slot| *slot.borrow_mut() = Some(message.to_string()));
        self.interrupt.fire();
    }

    /// Establish a wireless session through the platform network provider.
    ///
    /// Blocks until success or failure is known. Without a provider this is
    /// a capability gap of the controller variant: logged, failed result.
    pub fn connect_to_network(&self) -> HostConnectionResult {
        self.network.lock(|network| {
            let mut network = network.borrow_mut();
            let Some(provider) = network.as_mut() else {
                log::error!("connect_to_network requires a platform network provider");
                return HostConnectionResult::failed();
            };
            match provider.connect() {
                Ok(transport) => HostConnectionResult::connected(HostSession::new(transport)),
                Err(err) => {
                    log::warn!("network connect failed: {err}");
                    HostConnectionResult::failed()
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::sync::Arc;
    use alloc::vec;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use hub_shared::fake::{FakeNetwork, FakePins};

    fn controller() -> Controller {
        Controller::new(Box::new(FakePins::new()))
    }

    #[test]
    fn attach_then_detach_removes_guid() {
        let controller = controller();
        controller.attach(1, "guid-a", 1);
        assert_eq!(controller.list_attached_projects(), vec!["guid-a"]);

        controller.detach("guid-a").unwrap();
        assert!(controller.list_attached_projects().is_empty());
    }

    #[test]
    fn attach_is_idempotent_per_guid() {
        let controller = controller();
        controller.attach(1, "guid-a", 1);
        controller.attach(1, "guid-a", 1);
        assert_eq!(controller.list_attached_projects().len(), 1);
    }

    #[test]
    fn detach_of_unknown_guid_reports_not_found() {
        let controller = controller();
        controller.attach(1, "guid-a", 1);

        let result = controller.detach("guid-b");
        assert_eq!(result, Err(HubError::ProjectNotFound("guid-b".into())));
        // Registry unchanged.
        assert_eq!(controller.list_attached_projects(), vec!["guid-a"]);
    }

    #[test]
    fn concurrent_attaches_keep_registry_consistent() {
        let controller = Arc::new(controller());

        let handles: alloc::vec::Vec<_> = (0..8)
            .map(|worker| {
                let controller = controller.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        controller.attach(1, &format!("guid-{worker}-{i}"), 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let guids = controller.list_attached_projects();
        assert_eq!(guids.len(), 8 * 50);
        // Each guid present exactly once.
        let mut sorted = guids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), guids.len());
    }

    #[test]
    fn raise_interrupt_stores_message_and_fires() {
        let controller = Arc::new(controller());
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        controller.register_interrupt_callback(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        controller.raise_interrupt("hello");
        assert_eq!(controller.last_interrupt_message().as_deref(), Some("hello"));
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Single slot: each interrupt overwrites the previous message.
        controller.raise_interrupt("world");
        assert_eq!(controller.last_interrupt_message().as_deref(), Some("world"));
    }

    #[test]
    fn newest_callback_wins() {
        let controller = controller();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let counter = first.clone();
        controller.register_interrupt_callback(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = second.clone();
        controller.register_interrupt_callback(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        controller.raise_interrupt("message");
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cleared_callback_is_not_invoked() {
        let controller = controller();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        controller.register_interrupt_callback(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        controller.clear_interrupt_callback();

        controller.raise_interrupt("message");
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        // The message is still captured even with no subscriber.
        assert_eq!(controller.last_interrupt_message().as_deref(), Some("message"));
    }

    #[test]
    fn send_to_project_requires_attached_guid() {
        let controller = controller();
        let result = controller.send_to_project("2 DELAY 10", "nobody");
        assert_eq!(result, Err(HubError::ProjectNotFound("nobody".into())));
        assert_eq!(controller.last_interrupt_message(), None);
    }

    #[test]
    fn blocking_delay_does_not_stall_the_interrupt_path() {
        use hub_model::command::{Level, PinMode};

        struct SleepyPins;
        impl PinProvider for SleepyPins {
            fn pin_mode(&mut self, _pin: u32, _mode: PinMode) {}
            fn digital_write(&mut self, _pin: u32, _level: Level) {}
            fn digital_read(&mut self, _pin: u32) -> i32 {
                0
            }
            fn analog_read(&mut self, _pin: u32) -> i32 {
                0
            }
            fn analog_write(&mut self, _pin: u32, _value: i32) {}
            fn delay_ms(&mut self, ms: u32) {
                std::thread::sleep(core::time::Duration::from_millis(u64::from(ms)));
            }
        }

        let controller = Arc::new(Controller::new(Box::new(SleepyPins)));
        let worker = {
            let controller = controller.clone();
            std::thread::spawn(move || controller.receive_from_project("1 DELAY 400"))
        };
        // Let the worker take the provider and start its delay.
        std::thread::sleep(core::time::Duration::from_millis(100));

        let started = std::time::Instant::now();
        controller.raise_interrupt("2 ANALOGREAD 2");
        assert!(
            started.elapsed() < core::time::Duration::from_millis(200),
            "raise_interrupt waited behind a blocking DELAY"
        );
        assert_eq!(
            controller.last_interrupt_message().as_deref(),
            Some("2 ANALOGREAD 2")
        );

        // The provider is out of its slot, so a concurrent command fails
        // in-band instead of queueing behind the delay.
        let rejected = controller.receive_from_project("3 ANALOGREAD 2");
        assert_eq!(rejected, CommandOutcome::failure(3));

        assert_eq!(worker.join().unwrap(), CommandOutcome::success(1, 0));

        // Provider restored once the delay finishes.
        let outcome = controller.receive_from_project("4 ANALOGREAD 2");
        assert_eq!(outcome, CommandOutcome::success(4, 0));
    }

    #[test]
    fn receive_from_project_runs_the_codec() {
        let controller = controller();
        let outcome = controller.receive_from_project("3 PINMODE 9 OUTPUT");
        assert_eq!(outcome, CommandOutcome::success(3, 0));
    }

    #[test]
    fn connect_without_provider_fails_loudly() {
        let controller = controller();
        let result = controller.connect_to_network();
        assert!(!result.is_successful);
        assert!(result.session.is_none());
    }

    #[test]
    fn connect_with_provider_yields_session() {
        let network = FakeNetwork::new();
        let record = network.record();
        let controller =
            Controller::with_network(Box::new(FakePins::new()), Box::new(network));

        let result = controller.connect_to_network();
        assert!(result.is_successful);
        let session = result.session.unwrap();
        session.send_to_server("ping").unwrap();
        assert_eq!(record.server_messages(), ["ping"]);
    }

    #[test]
    fn connect_failure_is_reported_in_band() {
        let controller = Controller::with_network(
            Box::new(FakePins::new()),
            Box::new(FakeNetwork::unreachable()),
        );
        let result = controller.connect_to_network();
        assert!(!result.is_successful);
        assert!(result.session.is_none());
    }
}
