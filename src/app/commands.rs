//! Manual relay commands from the outside world.
//!
//! The web layer translates its routes into these; malformed input is
//! rejected right there with [`CommandParseError`] and never reaches
//! the controller.

use core::fmt;

/// Operator command for the relay, at most one per control tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualCommand {
    TurnOn,
    TurnOff,
    Toggle,
}

/// A command token that matches no known command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandParseError;

impl fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown relay command")
    }
}

impl ManualCommand {
    /// Parse the verb part of a `relais_<verb>` route.
    pub fn parse(token: &str) -> Result<Self, CommandParseError> {
        match token {
            "on" => Ok(Self::TurnOn),
            "off" => Ok(Self::TurnOff),
            "toggle" => Ok(Self::Toggle),
            _ => Err(CommandParseError),
        }
    }

    /// Non-zero wire tag for the command mailbox.
    pub fn tag(self) -> u8 {
        match self {
            Self::TurnOn => 1,
            Self::TurnOff => 2,
            Self::Toggle => 3,
        }
    }

    /// Inverse of [`tag`](Self::tag); `0` is the empty mailbox.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::TurnOn),
            2 => Some(Self::TurnOff),
            3 => Some(Self::Toggle),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_verbs() {
        assert_eq!(ManualCommand::parse("on"), Ok(ManualCommand::TurnOn));
        assert_eq!(ManualCommand::parse("off"), Ok(ManualCommand::TurnOff));
        assert_eq!(ManualCommand::parse("toggle"), Ok(ManualCommand::Toggle));
    }

    #[test]
    fn rejects_garbage_at_the_boundary() {
        assert!(ManualCommand::parse("").is_err());
        assert!(ManualCommand::parse("ON").is_err());
        assert!(ManualCommand::parse("on;reboot").is_err());
    }

    #[test]
    fn tag_roundtrip() {
        for cmd in [
            ManualCommand::TurnOn,
            ManualCommand::TurnOff,
            ManualCommand::Toggle,
        ] {
            assert_eq!(ManualCommand::from_tag(cmd.tag()), Some(cmd));
        }
        assert_eq!(ManualCommand::from_tag(0), None);
    }
}
