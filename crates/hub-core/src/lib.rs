//! Project lifecycle and message-routing core.
//!
//! A [`Controller`] owns the hardware-facing side of the hub: the
//! mutex-guarded registry of attached projects, the single-slot interrupt
//! delivery path, and the command codec. A [`Project`] is one logical unit
//! of device behavior, bound either to a local controller or to a remote
//! [`HostSession`]. All state is in-memory and reconstructed on boot.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod codec;
pub mod controller;
pub mod error;
pub mod host;
pub mod notify;
pub mod project;

pub use controller::{AttachedProject, Controller};
pub use error::HubError;
pub use host::{HostConnectionResult, HostSession, HostSessionHandle};
pub use notify::InterruptSlot;
pub use project::{Project, ProjectCapabilities, SendOutcome, StaticCapabilities};
