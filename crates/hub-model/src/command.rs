//! Text command protocol parsing.
//!
//! Commands are single-space-delimited ASCII lines. Token 0 is the decimal
//! command id, token 1 the uppercase opcode keyword, remaining tokens are
//! opcode-specific operands. Numeric tokens parse permissively: anything
//! that is not a valid decimal integer reads as 0, which existing command
//! strings rely on.

use alloc::vec::Vec;

/// Pin direction for `PINMODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    Output,
}

/// Digital level for `DIGITALWRITE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// A recognized hardware command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PinMode { pin: u32, mode: PinMode },
    DigitalWrite { pin: u32, level: Level },
    Delay { ms: u32 },
    AnalogRead { pin: u32 },
    AnalogWrite { pin: u32, value: i32 },
    DigitalRead { pin: u32 },
}

/// One parsed command line.
///
/// `command` is `None` when the opcode is unknown or a keyword operand
/// matches none of the recognized literals; the command id is still parsed
/// from token 0 so the failure outcome can be correlated to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLine {
    pub command_id: i32,
    pub command: Option<Command>,
}

/// Parse a raw command line.
///
/// Never fails: malformed input degrades to a `CommandLine` with
/// `command: None` (and id 0 if even the id token is unreadable).
pub fn parse_command_line(line: &str) -> CommandLine {
    let tokens: Vec<&str> = line.split(' ').collect();
    let token = |index: usize| tokens.get(index).copied().unwrap_or("");

    let command_id = lenient_i32(token(0));
    let command = match token(1) {
        "PINMODE" => match token(3) {
            "OUTPUT" => Some(Command::PinMode {
                pin: lenient_u32(token(2)),
                mode: PinMode::Output,
            }),
            "INPUT" => Some(Command::PinMode {
                pin: lenient_u32(token(2)),
                mode: PinMode::Input,
            }),
            _ => None,
        },
        "DIGITALWRITE" => match token(3) {
            "LOW" => Some(Command::DigitalWrite {
                pin: lenient_u32(token(2)),
                level: Level::Low,
            }),
            "HIGH" => Some(Command::DigitalWrite {
                pin: lenient_u32(token(2)),
                level: Level::High,
            }),
            _ => None,
        },
        "DELAY" => Some(Command::Delay {
            ms: lenient_u32(token(2)),
        }),
        "ANALOGREAD" => Some(Command::AnalogRead {
            pin: lenient_u32(token(2)),
        }),
        "ANALOGWRITE" => Some(Command::AnalogWrite {
            pin: lenient_u32(token(2)),
            value: lenient_i32(token(3)),
        }),
        "DIGITALREAD" => Some(Command::DigitalRead {
            pin: lenient_u32(token(2)),
        }),
        _ => None,
    };

    CommandLine {
        command_id,
        command,
    }
}

fn lenient_i32(token: &str) -> i32 {
    token.parse().unwrap_or(0)
}

fn lenient_u32(token: &str) -> u32 {
    token.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pinmode_output() {
        let line = parse_command_line("3 PINMODE 9 OUTPUT");
        assert_eq!(line.command_id, 3);
        assert_eq!(
            line.command,
            Some(Command::PinMode {
                pin: 9,
                mode: PinMode::Output
            })
        );
    }

    #[test]
    fn parses_digitalwrite_high() {
        let line = parse_command_line("4 DIGITALWRITE 9 HIGH");
        assert_eq!(
            line.command,
            Some(Command::DigitalWrite {
                pin: 9,
                level: Level::High
            })
        );
    }

    #[test]
    fn rejects_unrecognized_pinmode_literal() {
        let line = parse_command_line("3 PINMODE 9 SIDEWAYS");
        assert_eq!(line.command_id, 3);
        assert_eq!(line.command, None);
    }

    #[test]
    fn rejects_unrecognized_digitalwrite_literal() {
        assert_eq!(parse_command_line("5 DIGITALWRITE 9 MAYBE").command, None);
    }

    #[test]
    fn rejects_unknown_opcode_but_keeps_id() {
        let line = parse_command_line("1 FOO 5");
        assert_eq!(line.command_id, 1);
        assert_eq!(line.command, None);
    }

    #[test]
    fn malformed_numbers_read_as_zero() {
        let line = parse_command_line("x ANALOGREAD y");
        assert_eq!(line.command_id, 0);
        assert_eq!(line.command, Some(Command::AnalogRead { pin: 0 }));
    }

    #[test]
    fn missing_operands_read_as_empty_tokens() {
        // DELAY with no operand still parses, with ms 0.
        assert_eq!(
            parse_command_line("2 DELAY").command,
            Some(Command::Delay { ms: 0 })
        );
        // PINMODE with no keyword operand fails the literal match.
        assert_eq!(parse_command_line("2 PINMODE 9").command, None);
    }

    #[test]
    fn empty_line_is_a_generic_failure() {
        let line = parse_command_line("");
        assert_eq!(line.command_id, 0);
        assert_eq!(line.command, None);
    }
}
