//! Error types for game operations.

use baduk_core::{Color, Coord};
use thiserror::Error;

/// Why a move was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllegalReason {
    /// The target point is not empty.
    Occupied(Coord),
    /// It is another player's turn.
    NotYourTurn { expected: Color },
    /// The placed stone would be left without liberties.
    Suicide,
    /// The player already has a move buffered for this round.
    AlreadySubmitted,
    /// The color does not take part in this game.
    UnknownPlayer(Color),
    /// The move shape is not supported by this variant.
    Unsupported(String),
}

impl std::fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalReason::Occupied(at) => write!(f, "point {} is occupied", at),
            IllegalReason::NotYourTurn { expected } => {
                write!(f, "not your turn ({} to move)", expected)
            }
            IllegalReason::Suicide => write!(f, "suicide is not allowed"),
            IllegalReason::AlreadySubmitted => write!(f, "already submitted this round"),
            IllegalReason::UnknownPlayer(color) => write!(f, "{} is not playing", color),
            IllegalReason::Unsupported(what) => write!(f, "unsupported move: {}", what),
        }
    }
}

/// Error type for game operations.
///
/// Every error leaves the game untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("coordinate {0} is outside the board")]
    InvalidCoordinate(Coord),

    #[error("illegal move: {0}")]
    IllegalMove(IllegalReason),

    #[error("move repeats an earlier board position")]
    KoViolation,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown variant '{0}'")]
    UnknownVariant(String),

    #[error("game has already ended")]
    GameEnded,
}

impl From<IllegalReason> for GameError {
    fn from(reason: IllegalReason) -> Self {
        GameError::IllegalMove(reason)
    }
}

/// Errors from saving or restoring a game snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    /// The snapshot parsed but describes an impossible game.
    #[error("inconsistent snapshot: {0}")]
    Invalid(String),
}
