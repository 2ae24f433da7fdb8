use std::{fmt, str::FromStr};

use super::error::CommandError;
use super::vec2::Vec2;

/// Exactly one propulsion choice per command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Thrust(u8),
    Boost,
    Shield,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Thrust(t) => write!(f, "{t}"),
            Action::Boost => write!(f, "BOOST"),
            Action::Shield => write!(f, "SHIELD"),
        }
    }
}

impl Action {
    /// Clamped to the legal 0..=100 range.
    pub fn thrust(value: i32) -> Self {
        Action::Thrust(value.clamp(0, 100) as u8)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub target: Vec2,
    pub action: Action,
    /// Short reason, printed after the command when annotation is enabled.
    pub note: Option<&'static str>,
}

impl Command {
    pub fn new(target: Vec2, action: Action) -> Self {
        Command {
            target,
            action,
            note: None,
        }
    }

    pub fn with_note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }

    /// Output line; coordinates truncate toward zero.
    pub fn to_line(&self, annotate: bool) -> String {
        match (annotate, self.note) {
            (true, Some(note)) => format!("{self} {note}"),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.target.x.trunc() as i64,
            self.target.y.trunc() as i64,
            self.action
        )
    }
}

impl FromStr for Command {
    type Err = CommandError;

    /// Reads `x y thrust|BOOST|SHIELD`; trailing words are ignored like the game does.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let x = parts.next().ok_or(CommandError::Missing("x"))?;
        let y = parts.next().ok_or(CommandError::Missing("y"))?;
        let action = parts.next().ok_or(CommandError::Missing("thrust"))?;

        let x: i64 = x.parse().map_err(|_| CommandError::Coordinate(x.into()))?;
        let y: i64 = y.parse().map_err(|_| CommandError::Coordinate(y.into()))?;

        let action = match action {
            "BOOST" => Action::Boost,
            "SHIELD" => Action::Shield,
            other => match other.parse::<u8>() {
                Ok(t) if t <= 100 => Action::Thrust(t),
                _ => return Err(CommandError::Thrust(other.into())),
            },
        };

        Ok(Command::new(Vec2::new(x as f64, y as f64), action))
    }
}
