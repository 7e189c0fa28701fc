//! Interactive command-line input parsing.

use forgeview_protocol::Command;
use thiserror::Error;

/// One parsed console input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    /// Forward a command to the backend.
    Command(Command),
    /// Print the local status report.
    Status,
    /// Print the command list.
    Help,
    /// Leave the console.
    Quit,
}

/// Errors from unusable input lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// Blank line; ignored by the caller.
    #[error("empty input")]
    Empty,
    /// The verb is not one of ours.
    #[error("unknown command '{0}', type 'help' for the list")]
    Unknown(String),
    /// `speed` needs an unsigned integer argument.
    #[error("invalid speed value '{0}'")]
    InvalidSpeed(String),
    /// Wrong argument count for a known verb.
    #[error("usage: {0}")]
    Usage(&'static str),
    /// A bare verb was given arguments.
    #[error("'{0}' takes no arguments")]
    ExtraArguments(String),
}

/// Parse one line of console input.
pub fn parse_line(line: &str) -> Result<ConsoleInput, InputError> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Err(InputError::Empty);
    };
    let args: Vec<&str> = parts.collect();

    match (verb, args.as_slice()) {
        ("start", []) => Ok(ConsoleInput::Command(Command::Start)),
        ("stop", []) => Ok(ConsoleInput::Command(Command::Stop)),
        ("pause", []) => Ok(ConsoleInput::Command(Command::Pause)),
        ("resume", []) => Ok(ConsoleInput::Command(Command::Resume)),
        ("speed", [value]) => value
            .parse::<u32>()
            .map(|value| ConsoleInput::Command(Command::Speed { value }))
            .map_err(|_| InputError::InvalidSpeed((*value).to_string())),
        ("speed", _) => Err(InputError::Usage("speed <value>")),
        ("stats", []) => Ok(ConsoleInput::Command(Command::GetStatistics)),
        ("reset-stats", []) => Ok(ConsoleInput::Command(Command::ResetStatistics)),
        ("loglevel", [level]) => Ok(ConsoleInput::Command(Command::GlobalLoggingLevel {
            level: (*level).to_string(),
        })),
        ("loglevel", [channel, level]) => Ok(ConsoleInput::Command(Command::ChannelLoggingLevel {
            channel: (*channel).to_string(),
            level: (*level).to_string(),
        })),
        ("loglevel", _) => Err(InputError::Usage("loglevel [<channel>] <level>")),
        ("status", []) => Ok(ConsoleInput::Status),
        ("help", []) => Ok(ConsoleInput::Help),
        ("quit" | "exit", []) => Ok(ConsoleInput::Quit),
        (
            "start" | "stop" | "pause" | "resume" | "stats" | "reset-stats" | "status" | "help"
            | "quit" | "exit",
            _,
        ) => Err(InputError::ExtraArguments(verb.to_string())),
        _ => Err(InputError::Unknown(verb.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_commands() {
        assert_eq!(
            parse_line("start"),
            Ok(ConsoleInput::Command(Command::Start))
        );
        assert_eq!(parse_line("stop"), Ok(ConsoleInput::Command(Command::Stop)));
        assert_eq!(
            parse_line("  resume  "),
            Ok(ConsoleInput::Command(Command::Resume))
        );
        assert_eq!(
            parse_line("stats"),
            Ok(ConsoleInput::Command(Command::GetStatistics))
        );
        assert_eq!(
            parse_line("reset-stats"),
            Ok(ConsoleInput::Command(Command::ResetStatistics))
        );
    }

    #[test]
    fn parses_speed_with_value() {
        assert_eq!(
            parse_line("speed 3600"),
            Ok(ConsoleInput::Command(Command::Speed { value: 3600 }))
        );
        assert_eq!(
            parse_line("speed fast"),
            Err(InputError::InvalidSpeed("fast".to_string()))
        );
        assert_eq!(parse_line("speed"), Err(InputError::Usage("speed <value>")));
    }

    #[test]
    fn parses_logging_levels() {
        assert_eq!(
            parse_line("loglevel debug"),
            Ok(ConsoleInput::Command(Command::GlobalLoggingLevel {
                level: "debug".to_string()
            }))
        );
        assert_eq!(
            parse_line("loglevel dbm error"),
            Ok(ConsoleInput::Command(Command::ChannelLoggingLevel {
                channel: "dbm".to_string(),
                level: "error".to_string()
            }))
        );
    }

    #[test]
    fn local_verbs_do_not_become_commands() {
        assert_eq!(parse_line("status"), Ok(ConsoleInput::Status));
        assert_eq!(parse_line("help"), Ok(ConsoleInput::Help));
        assert_eq!(parse_line("quit"), Ok(ConsoleInput::Quit));
        assert_eq!(parse_line("exit"), Ok(ConsoleInput::Quit));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_line(""), Err(InputError::Empty));
        assert_eq!(parse_line("   "), Err(InputError::Empty));
        assert_eq!(
            parse_line("launch"),
            Err(InputError::Unknown("launch".to_string()))
        );
        assert_eq!(
            parse_line("start now"),
            Err(InputError::ExtraArguments("start".to_string()))
        );
    }
}
