//! Fake provider implementations for testing and the emulator.
//!
//! `FakePins` keeps pin state in memory so codec behavior can be checked
//! without hardware; `FakeHostTransport` records every outbound message so
//! tests can assert on what would have gone over the air.

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use alloc::boxed::Box;
use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use hashbrown::HashMap;
use hub_model::TransportError;
use hub_model::command::{Level, PinMode};

use crate::pins::{HIGH, LOW, PinProvider};
use crate::transport::{HostTransport, NetworkProvider};

/// In-memory pin backend.
///
/// Digital levels are stored raw (`i32`) so tests can simulate a pin whose
/// state is neither LOW nor HIGH.
pub struct FakePins {
    modes: HashMap<u32, PinMode>,
    digital: HashMap<u32, i32>,
    analog_inputs: HashMap<u32, i32>,
    analog_outputs: HashMap<u32, i32>,
    delays: Vec<u32>,
}

impl FakePins {
    pub fn new() -> Self {
        Self {
            modes: HashMap::new(),
            digital: HashMap::new(),
            analog_inputs: HashMap::new(),
            analog_outputs: HashMap::new(),
            delays: Vec::new(),
        }
    }

    /// Force a raw digital level, including out-of-range values.
    pub fn set_digital_level(&mut self, pin: u32, raw_level: i32) {
        self.digital.insert(pin, raw_level);
    }

    /// Set the value the next `ANALOGREAD` of this pin returns.
    pub fn set_analog_value(&mut self, pin: u32, value: i32) {
        self.analog_inputs.insert(pin, value);
    }

    pub fn mode_of(&self, pin: u32) -> Option<PinMode> {
        self.modes.get(&pin).copied()
    }

    pub fn digital_level(&self, pin: u32) -> i32 {
        self.digital.get(&pin).copied().unwrap_or(LOW)
    }

    pub fn analog_output(&self, pin: u32) -> Option<i32> {
        self.analog_outputs.get(&pin).copied()
    }

    /// Durations passed to `delay_ms`, in call order.
    pub fn delays(&self) -> &[u32] {
        &self.delays
    }
}

impl Default for FakePins {
    fn default() -> Self {
        Self::new()
    }
}

impl PinProvider for FakePins {
    fn pin_mode(&mut self, pin: u32, mode: PinMode) {
        log::trace!("FakePins: pin {pin} mode {mode:?}");
        self.modes.insert(pin, mode);
    }

    fn digital_write(&mut self, pin: u32, level: Level) {
        let raw = match level {
            Level::Low => LOW,
            Level::High => HIGH,
        };
        self.digital.insert(pin, raw);
    }

    fn digital_read(&mut self, pin: u32) -> i32 {
        self.digital.get(&pin).copied().unwrap_or(LOW)
    }

    fn analog_read(&mut self, pin: u32) -> i32 {
        self.analog_inputs.get(&pin).copied().unwrap_or(0)
    }

    fn analog_write(&mut self, pin: u32, value: i32) {
        self.analog_outputs.insert(pin, value);
    }

    fn delay_ms(&mut self, ms: u32) {
        // Recorded, not slept; tests should not wait on wall-clock time.
        self.delays.push(ms);
    }
}

/// Everything a [`FakeHostTransport`] has sent, shared with the test.
pub struct TransportRecord {
    server_messages: Mutex<CriticalSectionRawMutex, RefCell<Vec<String>>>,
    project_messages: Mutex<CriticalSectionRawMutex, RefCell<Vec<(String, String)>>>,
    closed: AtomicBool,
}

impl TransportRecord {
    fn new() -> Self {
        Self {
            server_messages: Mutex::new(RefCell::new(Vec::new())),
            project_messages: Mutex::new(RefCell::new(Vec::new())),
            closed: AtomicBool::new(false),
        }
    }

    /// Snapshot of messages sent to the server, in send order.
    pub fn server_messages(&self) -> Vec<String> {
        self.server_messages.lock(|messages| messages.borrow().clone())
    }

    /// Snapshot of `(message, target_guid)` pairs sent to remote projects.
    pub fn project_messages(&self) -> Vec<(String, String)> {
        self.project_messages.lock(|messages| messages.borrow().clone())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}

/// Fake host session transport that records instead of transmitting.
pub struct FakeHostTransport {
    record: Arc<TransportRecord>,
}

impl FakeHostTransport {
    pub fn new() -> Self {
        Self {
            record: Arc::new(TransportRecord::new()),
        }
    }

    /// Handle for inspecting sent messages after the transport is boxed.
    pub fn record(&self) -> Arc<TransportRecord> {
        self.record.clone()
    }
}

impl Default for FakeHostTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HostTransport for FakeHostTransport {
    fn send_to_server(&mut self, message: &str) -> Result<(), TransportError> {
        log::debug!("FakeHostTransport: would send to server: {message}");
        self.record
            .server_messages
            .lock(|messages| messages.borrow_mut().push(message.to_string()));
        Ok(())
    }

    fn send_to_project(&mut self, message: &str, target_guid: &str) -> Result<(), TransportError> {
        log::debug!("FakeHostTransport: would send to project {target_guid}: {message}");
        self.record.project_messages.lock(|messages| {
            messages
                .borrow_mut()
                .push((message.to_string(), target_guid.to_string()))
        });
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.record.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}

/// Fake radio that hands out [`FakeHostTransport`] sessions.
pub struct FakeNetwork {
    should_succeed: bool,
    record: Arc<TransportRecord>,
}

impl FakeNetwork {
    pub fn new() -> Self {
        let transport = FakeHostTransport::new();
        Self {
            should_succeed: true,
            record: transport.record(),
        }
    }

    /// A network whose connect attempts always fail.
    pub fn unreachable() -> Self {
        let mut network = Self::new();
        network.should_succeed = false;
        network
    }

    /// Record shared by every session this network hands out.
    pub fn record(&self) -> Arc<TransportRecord> {
        self.record.clone()
    }
}

impl Default for FakeNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkProvider for FakeNetwork {
    fn connect(&mut self) -> Result<Box<dyn HostTransport>, TransportError> {
        if self.should_succeed {
            Ok(Box::new(FakeHostTransport {
                record: self.record.clone(),
            }))
        } else {
            Err(TransportError::ConnectionLost)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_pins_default_digital_level_is_low() {
        let mut pins = FakePins::new();
        assert_eq!(pins.digital_read(4), LOW);
        pins.digital_write(4, Level::High);
        assert_eq!(pins.digital_read(4), HIGH);
    }

    #[test]
    fn fake_pins_record_delays_in_order() {
        let mut pins = FakePins::new();
        pins.delay_ms(10);
        pins.delay_ms(20);
        assert_eq!(pins.delays(), [10, 20]);
    }

    #[test]
    fn transport_record_outlives_the_boxed_transport() {
        let transport = FakeHostTransport::new();
        let record = transport.record();
        let mut boxed: Box<dyn HostTransport> = Box::new(transport);

        boxed.send_to_server("hello").unwrap();
        boxed.close().unwrap();
        drop(boxed);

        assert_eq!(record.server_messages(), ["hello"]);
        assert!(record.is_closed());
    }

    #[test]
    fn unreachable_network_refuses_to_connect() {
        let mut network = FakeNetwork::unreachable();
        assert_eq!(network.connect().err(), Some(TransportError::ConnectionLost));
    }
}
