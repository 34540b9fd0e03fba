//! Move representation.

use crate::{Color, Coord, CoordParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single player action.
///
/// Multi-board variants apply a [`Move::Place`] to every board they keep;
/// simultaneous variants collect one move per player per round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    /// Place a stone at the coordinate.
    Place(Coord),
    /// Pass the turn.
    Pass,
    /// Resign the game.
    Resign,
}

impl Move {
    /// Returns the target coordinate for placements.
    #[inline]
    pub const fn coord(self) -> Option<Coord> {
        match self {
            Move::Place(at) => Some(at),
            Move::Pass | Move::Resign => None,
        }
    }

    #[inline]
    pub const fn is_pass(self) -> bool {
        matches!(self, Move::Pass)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place(at) => write!(f, "{}", at),
            Move::Pass => write!(f, "pass"),
            Move::Resign => write!(f, "resign"),
        }
    }
}

/// Errors that can occur when parsing move notation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("invalid move notation: {0}")]
    Malformed(String),

    #[error("invalid player '{0}'")]
    InvalidPlayer(String),

    #[error(transparent)]
    InvalidCoord(#[from] CoordParseError),
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass" => Ok(Move::Pass),
            "resign" => Ok(Move::Resign),
            "" => Err(MoveParseError::Malformed(s.to_string())),
            other => Ok(Move::Place(other.parse()?)),
        }
    }
}

/// A move together with the player submitting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Submission {
    pub player: Color,
    #[serde(rename = "move")]
    pub mov: Move,
}

impl Submission {
    #[inline]
    pub const fn new(player: Color, mov: Move) -> Self {
        Submission { player, mov }
    }
}

impl fmt::Display for Submission {
    /// Writes `B` and `W` for the first two players and the color index for
    /// the rest, e.g. `"12 pass"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.player {
            Color::BLACK | Color::WHITE => write!(f, "{} {}", self.player.to_char(), self.mov),
            other => write!(f, "{} {}", other.index(), self.mov),
        }
    }
}

impl FromStr for Submission {
    type Err = MoveParseError;

    /// Parses `"<player> <move>"`, e.g. `"B 3,4"`, `"W pass"` or `"2 resign"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (player, mov) = s
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| MoveParseError::Malformed(s.to_string()))?;
        let mut chars = player.chars();
        let player = match (chars.next(), chars.next()) {
            (Some(c), None) => Color::from_char(c),
            _ => player.parse::<u8>().ok().and_then(Color::new),
        }
        .ok_or_else(|| MoveParseError::InvalidPlayer(player.to_string()))?;
        Ok(Submission::new(player, mov.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_moves() {
        assert_eq!("pass".parse::<Move>(), Ok(Move::Pass));
        assert_eq!("Resign".parse::<Move>(), Ok(Move::Resign));
        assert_eq!("4,5".parse::<Move>(), Ok(Move::Place(Coord::new(4, 5))));
        assert!("".parse::<Move>().is_err());
        assert!(matches!(
            "x".parse::<Move>(),
            Err(MoveParseError::InvalidCoord(_))
        ));
    }

    #[test]
    fn parse_submissions() {
        assert_eq!(
            "B 3,4".parse::<Submission>(),
            Ok(Submission::new(Color::BLACK, Move::Place(Coord::new(3, 4))))
        );
        assert_eq!(
            "W pass".parse::<Submission>(),
            Ok(Submission::new(Color::WHITE, Move::Pass))
        );
        assert_eq!(
            "12 resign".parse::<Submission>(),
            Ok(Submission::new(Color::new(12).unwrap(), Move::Resign))
        );
        assert!(matches!(
            "Z 1,1".parse::<Submission>(),
            Err(MoveParseError::InvalidPlayer(_))
        ));
        assert!(matches!(
            "B".parse::<Submission>(),
            Err(MoveParseError::Malformed(_))
        ));
    }

    #[test]
    fn display_roundtrip() {
        let sub = Submission::new(Color::WHITE, Move::Place(Coord::new(0, 7)));
        assert_eq!(sub.to_string(), "W 0,7");
        assert_eq!(sub.to_string().parse::<Submission>(), Ok(sub));
    }

    #[test]
    fn every_player_roundtrips() {
        for i in 0..Color::MAX as u8 {
            let player = Color::new(i).unwrap();
            for mov in [Move::Pass, Move::Resign, Move::Place(Coord::new(3, 1))] {
                let sub = Submission::new(player, mov);
                assert_eq!(sub.to_string().parse::<Submission>(), Ok(sub), "{}", sub);
            }
        }
        assert_eq!(
            Submission::new(Color::new(11).unwrap(), Move::Pass).to_string(),
            "11 pass"
        );
    }

    #[test]
    fn json_shape() {
        let sub = Submission::new(Color::BLACK, Move::Place(Coord::new(1, 2)));
        let json = serde_json::to_string(&sub).unwrap();
        assert_eq!(json, r#"{"player":0,"move":{"place":{"x":1,"y":2}}}"#);
    }
}
