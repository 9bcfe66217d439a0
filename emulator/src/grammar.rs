//! Command grammar for the emulator session.
//!
//! Small winnow combinator pipeline over the raw input line. Commands are
//! lowercase keywords with optional numeric arguments; numbers accept both
//! decimal and `0x` hexadecimal forms.

use winnow::ascii::{dec_uint, hex_uint, space1};
use winnow::combinator::{alt, opt, preceded};
use winnow::prelude::*;

/// Parsed emulator command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Advance the tick timer by `n` periods.
    Tick(u32),
    /// Raise the over-temperature alert line.
    Alert,
    /// Raise the sensor config/alert-cleared line.
    Config,
    /// Set the external fault-status word.
    Fault(u32),
    /// Set the raw local/remote sensor values.
    Temp {
        local: u8,
        remote: u8,
    },
    /// Show recorder and register state.
    Status,
    /// Dump the most recent `n` ring slots.
    Ring(u16),
    /// Replay the scripted scenario for the active profile.
    Scenario,
    /// Show help, optionally for one topic.
    Help(Option<String>),
}

/// Parse failure with a printable explanation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseFailure {
    pub message: String,
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

fn number(input: &mut &str) -> ModalResult<u32> {
    alt((preceded("0x", hex_uint), dec_uint)).parse_next(input)
}

fn byte(input: &mut &str) -> ModalResult<u8> {
    number.try_map(u8::try_from).parse_next(input)
}

fn command(input: &mut &str) -> ModalResult<Command> {
    alt((
        preceded("tick", opt(preceded(space1, number)))
            .map(|count| Command::Tick(count.unwrap_or(1))),
        "alert".value(Command::Alert),
        "config".value(Command::Config),
        preceded(("fault", space1), number).map(Command::Fault),
        preceded(("temp", space1), (byte, preceded(space1, byte)))
            .map(|(local, remote)| Command::Temp { local, remote }),
        "status".value(Command::Status),
        preceded("ring", opt(preceded(space1, dec_uint)))
            .map(|count: Option<u16>| Command::Ring(count.unwrap_or(16))),
        "scenario".value(Command::Scenario),
        preceded("help", opt(preceded(space1, winnow::token::rest)))
            .map(|topic: Option<&str>| Command::Help(topic.map(str::to_string))),
    ))
    .parse_next(input)
}

/// Parses one trimmed input line into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, ParseFailure> {
    command.parse(line).map_err(|err| ParseFailure {
        message: format!("unrecognized command `{line}` ({err})"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_defaults_to_one_period() {
        assert_eq!(parse_command("tick"), Ok(Command::Tick(1)));
        assert_eq!(parse_command("tick 300"), Ok(Command::Tick(300)));
    }

    #[test]
    fn numbers_accept_hex_and_decimal() {
        assert_eq!(parse_command("fault 0xA0"), Ok(Command::Fault(0xA0)));
        assert_eq!(parse_command("fault 7"), Ok(Command::Fault(7)));
        assert_eq!(
            parse_command("temp 0x37 69"),
            Ok(Command::Temp {
                local: 0x37,
                remote: 69
            })
        );
    }

    #[test]
    fn temp_rejects_values_above_a_byte() {
        assert!(parse_command("temp 300 5").is_err());
    }

    #[test]
    fn keywords_parse_without_arguments() {
        assert_eq!(parse_command("alert"), Ok(Command::Alert));
        assert_eq!(parse_command("config"), Ok(Command::Config));
        assert_eq!(parse_command("status"), Ok(Command::Status));
        assert_eq!(parse_command("scenario"), Ok(Command::Scenario));
        assert_eq!(parse_command("ring"), Ok(Command::Ring(16)));
        assert_eq!(parse_command("ring 32"), Ok(Command::Ring(32)));
    }

    #[test]
    fn help_carries_an_optional_topic() {
        assert_eq!(parse_command("help"), Ok(Command::Help(None)));
        assert_eq!(
            parse_command("help tick"),
            Ok(Command::Help(Some("tick".to_string())))
        );
    }

    #[test]
    fn garbage_is_rejected_with_context() {
        let err = parse_command("launch missiles").unwrap_err();
        assert!(err.message.contains("launch missiles"));
        assert!(parse_command("tick five").is_err());
    }
}
