//! Line protocol spoken over the host's control socket.

use crate::category::CategoryId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/budgetring.sock";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionMode {
    /// Follow the desktop's animation setting.
    #[default]
    System,
    Reduced,
    Full,
}

impl MotionMode {
    /// Resolves to a reduced-motion flag, consulting `system` only when asked
    /// to follow it.
    pub fn reduced_motion(&self, system: impl FnOnce() -> bool) -> bool {
        match self {
            Self::System => system(),
            Self::Reduced => true,
            Self::Full => false,
        }
    }
}

impl FromStr for MotionMode {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            "reduced" | "reduce" | "on" => Ok(Self::Reduced),
            "full" | "off" => Ok(Self::Full),
            _ => Err(CommandError::UnknownMotion(s.to_string())),
        }
    }
}

impl fmt::Display for MotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::System => "system",
            Self::Reduced => "reduced",
            Self::Full => "full",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Hide,
    Reload,
    Select(CategoryId),
    Motion(MotionMode),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' expects an argument")]
    MissingArgument(&'static str),
    #[error("Unknown motion mode '{0}' (expected system, reduced or full)")]
    UnknownMotion(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (line, None),
        };

        match verb {
            "" => Err(CommandError::Empty),
            "show" => Ok(Self::Show),
            "hide" => Ok(Self::Hide),
            "reload" => Ok(Self::Reload),
            "select" => arg
                .map(|id| Self::Select(CategoryId::from(id)))
                .ok_or(CommandError::MissingArgument("select")),
            "motion" => arg
                .ok_or(CommandError::MissingArgument("motion"))?
                .parse()
                .map(Self::Motion),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Show => f.write_str("show"),
            Self::Hide => f.write_str("hide"),
            Self::Reload => f.write_str("reload"),
            Self::Select(id) => write!(f, "select {}", id),
            Self::Motion(mode) => write!(f, "motion {}", mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cases = vec![
            ("show", Command::Show),
            ("  hide \n", Command::Hide),
            ("reload", Command::Reload),
            ("select groceries", Command::Select(CategoryId::from("groceries"))),
            (
                "select eating out",
                Command::Select(CategoryId::from("eating out")),
            ),
            ("motion Reduced", Command::Motion(MotionMode::Reduced)),
            ("motion off", Command::Motion(MotionMode::Full)),
        ];

        for (line, expected) in cases {
            assert_eq!(line.parse::<Command>(), Ok(expected), "line {line:?}");
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "select ".parse::<Command>(),
            Err(CommandError::MissingArgument("select"))
        );
        assert_eq!(
            "motion sideways".parse::<Command>(),
            Err(CommandError::UnknownMotion("sideways".to_string()))
        );
        assert_eq!(
            "spin".parse::<Command>(),
            Err(CommandError::Unknown("spin".to_string()))
        );
    }

    #[test]
    fn test_display_is_parseable() {
        for command in [
            Command::Select(CategoryId::from("rent")),
            Command::Motion(MotionMode::System),
            Command::Reload,
        ] {
            assert_eq!(command.to_string().parse::<Command>(), Ok(command));
        }
    }

    #[test]
    fn test_motion_mode_resolution() {
        assert!(MotionMode::Reduced.reduced_motion(|| false));
        assert!(!MotionMode::Full.reduced_motion(|| true));
        assert!(MotionMode::System.reduced_motion(|| true));
    }
}
