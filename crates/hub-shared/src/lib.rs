//! Provider and transport traits shared across the hub.
//!
//! Concrete platforms (real hardware, emulator) implement these traits;
//! `hub-core` consumes them. Fake implementations for tests and the
//! emulator live in [`fake`].

#![no_std]

extern crate alloc;

pub mod fake;
pub mod pins;
pub mod transport;

pub use fake::{FakeHostTransport, FakePins};
pub use pins::{HIGH, LOW, PinProvider};
pub use transport::{HostTransport, NetworkProvider};
