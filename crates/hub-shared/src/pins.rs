//! Hardware pin provider trait.

use hub_model::command::{Level, PinMode};

/// Raw digital level for a low pin, as reported by `digital_read`.
pub const LOW: i32 = 0;
/// Raw digital level for a high pin.
pub const HIGH: i32 = 1;

/// Trait for the hardware-facing side of pin commands.
///
/// Implementations mutate hardware state directly and may block
/// (`delay_ms` blocks the calling execution context by contract). No
/// retries: a hardware fault surfaces as an unexpected read value, which
/// the codec folds into a failed outcome.
pub trait PinProvider {
    /// Configure pin direction.
    fn pin_mode(&mut self, pin: u32, mode: PinMode);

    /// Set a digital output level.
    fn digital_write(&mut self, pin: u32, level: Level);

    /// Read the raw digital level of a pin.
    ///
    /// Returns [`LOW`] or [`HIGH`] for a well-defined pin; any other value
    /// means the hardware state is undefined (floating input, fault).
    fn digital_read(&mut self, pin: u32) -> i32;

    /// Read the raw analog value of a pin.
    fn analog_read(&mut self, pin: u32) -> i32;

    /// Set a PWM-style analog output value.
    fn analog_write(&mut self, pin: u32, value: i32);

    /// Block the calling execution context for the given duration.
    fn delay_ms(&mut self, ms: u32);
}
