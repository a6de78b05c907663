//! Data model and wire types for the project hub.
//!
//! This crate defines the text command protocol (parsing only; execution
//! lives in `hub-core`), the structured command outcome, the announcement
//! payload sent to a remote server, and guid generation.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod command;
pub mod guid;
pub mod outcome;
pub mod wire;

pub use command::{Command, CommandLine, Level, PinMode, parse_command_line};
pub use guid::GuidSource;
pub use outcome::CommandOutcome;
pub use wire::{ANNOUNCEMENT_VERSION, Announcement, TransportError};
