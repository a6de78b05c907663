//! Command codec execution.
//!
//! Pairs the parsed command line from `hub-model` with a [`PinProvider`]
//! and produces a [`CommandOutcome`]. An opcode that matched no case falls
//! through to the generic failure outcome instead of aborting; the command
//! id is preserved so the caller can correlate the failure.

use hub_model::command::{Command, parse_command_line};
use hub_model::outcome::CommandOutcome;
use hub_shared::pins::{HIGH, LOW, PinProvider};

/// Execute one protocol command against the given pin backend.
pub fn execute(line: &str, pins: &mut dyn PinProvider) -> CommandOutcome {
    let parsed = parse_command_line(line);
    let id = parsed.command_id;

    let Some(command) = parsed.command else {
        return CommandOutcome::failure(id);
    };

    match command {
        Command::PinMode { pin, mode } => {
            pins.pin_mode(pin, mode);
            CommandOutcome::success(id, 0)
        }
        Command::DigitalWrite { pin, level } => {
            pins.digital_write(pin, level);
            CommandOutcome::success(id, 0)
        }
        Command::Delay { ms } => {
            pins.delay_ms(ms);
            CommandOutcome::success(id, 0)
        }
        Command::AnalogRead { pin } => CommandOutcome::success(id, pins.analog_read(pin)),
        Command::AnalogWrite { pin, value } => {
            pins.analog_write(pin, value);
            CommandOutcome::success(id, 0)
        }
        Command::DigitalRead { pin } => match pins.digital_read(pin) {
            LOW => CommandOutcome::success(id, 0),
            HIGH => CommandOutcome::success(id, 1),
            // Floating input or hardware fault: indistinguishable from a
            // bad operand by design of the outcome shape.
            _ => CommandOutcome::failure(id),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_model::command::PinMode;
    use hub_shared::fake::FakePins;

    #[test]
    fn pinmode_configures_direction() {
        let mut pins = FakePins::new();
        let outcome = execute("3 PINMODE 9 OUTPUT", &mut pins);
        assert_eq!(outcome, CommandOutcome::success(3, 0));
        assert_eq!(pins.mode_of(9), Some(PinMode::Output));
    }

    #[test]
    fn pinmode_rejects_unrecognized_literal() {
        let mut pins = FakePins::new();
        let outcome = execute("3 PINMODE 9 UPWARD", &mut pins);
        assert_eq!(outcome, CommandOutcome::failure(3));
        assert_eq!(pins.mode_of(9), None);
    }

    #[test]
    fn digitalwrite_sets_level() {
        let mut pins = FakePins::new();
        let outcome = execute("4 DIGITALWRITE 9 HIGH", &mut pins);
        assert_eq!(outcome, CommandOutcome::success(4, 0));
        assert_eq!(pins.digital_level(9), HIGH);
    }

    #[test]
    fn digitalwrite_rejects_unrecognized_literal() {
        let mut pins = FakePins::new();
        assert_eq!(
            execute("4 DIGITALWRITE 9 MEDIUM", &mut pins),
            CommandOutcome::failure(4)
        );
    }

    #[test]
    fn delay_blocks_through_the_provider() {
        let mut pins = FakePins::new();
        let outcome = execute("5 DELAY 250", &mut pins);
        assert_eq!(outcome, CommandOutcome::success(5, 0));
        assert_eq!(pins.delays(), [250]);
    }

    #[test]
    fn analogread_returns_raw_reading() {
        let mut pins = FakePins::new();
        pins.set_analog_value(2, 731);
        assert_eq!(execute("6 ANALOGREAD 2", &mut pins), CommandOutcome::success(6, 731));
    }

    #[test]
    fn analogwrite_sets_duty_and_returns_zero() {
        let mut pins = FakePins::new();
        let outcome = execute("8 ANALOGWRITE 5 128", &mut pins);
        assert_eq!(outcome, CommandOutcome::success(8, 0));
        assert_eq!(pins.analog_output(5), Some(128));
    }

    #[test]
    fn digitalread_maps_levels() {
        let mut pins = FakePins::new();
        pins.set_digital_level(13, HIGH);
        assert_eq!(execute("7 DIGITALREAD 13", &mut pins), CommandOutcome::success(7, 1));

        pins.set_digital_level(13, LOW);
        assert_eq!(execute("7 DIGITALREAD 13", &mut pins), CommandOutcome::success(7, 0));
    }

    #[test]
    fn digitalread_of_undefined_level_fails() {
        let mut pins = FakePins::new();
        pins.set_digital_level(13, 3);
        assert_eq!(execute("7 DIGITALREAD 13", &mut pins), CommandOutcome::failure(7));
    }

    #[test]
    fn unknown_opcode_fails_with_parsed_id() {
        let mut pins = FakePins::new();
        assert_eq!(execute("1 FOO 5", &mut pins), CommandOutcome::failure(1));
    }
}
