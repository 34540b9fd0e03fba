//! Game state shared by every variant.

use crate::config::CollisionPolicy;
use crate::{Board, GameError, Score};
use baduk_core::{Color, ColorSet, Coord, Submission, Vector};
use serde::{Deserialize, Serialize};

/// Where a game is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the next move (or for the first submission of a round).
    AwaitingMove,
    /// Some, but not all, submissions of a simultaneous round are in.
    RoundResolving,
    /// The game is over; every further move is rejected.
    Ended,
}

/// How a finished game ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Outcome {
    /// Counted by area. `winner` is `None` on a tie.
    Score { winner: Option<Color>, score: Score },
    /// Every other player resigned.
    Resignation { winner: Color },
}

impl Outcome {
    pub fn from_score(score: Score) -> Self {
        Outcome::Score {
            winner: score.winner(),
            score,
        }
    }

    /// Returns the winning color, if there is one.
    pub fn winner(&self) -> Option<Color> {
        match self {
            Outcome::Score { winner, .. } => *winner,
            Outcome::Resignation { winner } => Some(*winner),
        }
    }
}

/// One entry of the move history: a single move for turn-based variants,
/// every submission of a round for simultaneous ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub number: u32,
    pub moves: Vec<Submission>,
}

/// Something that happened while a move was applied, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A stone was placed.
    Placed { player: Color, at: Coord },
    /// A player passed.
    Passed { player: Color },
    /// A player resigned.
    Resigned { player: Color },
    /// A simultaneous-round move was buffered.
    Submitted { player: Color },
    /// A chain was removed. `reality` names the board for multi-board
    /// variants.
    Captured {
        color: Color,
        stones: Vec<Coord>,
        reality: Option<u8>,
    },
    /// Several players chose the same point.
    Collision {
        at: Coord,
        players: ColorSet,
        policy: CollisionPolicy,
    },
    /// A blocker expired.
    BlockerCleared { at: Coord },
    /// The board content drifted.
    Drifted { shift: Vector },
    /// A stone was entangled with its counterpart of inverted color.
    Entangled { at: Coord, colors: [Color; 2] },
    /// A simultaneous round finished.
    RoundResolved { round: u32 },
    /// The game ended.
    GameOver { outcome: Outcome },
}

/// Board, history and status of one game.
///
/// Owned by a rule module and changed only by accepted moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) boards: Vec<Board>,
    pub(crate) history: Vec<Turn>,
    pub(crate) to_move: Option<Color>,
    pub(crate) active: ColorSet,
    pub(crate) phase: Phase,
    pub(crate) outcome: Option<Outcome>,
    pub(crate) captures: Vec<u32>,
    pub(crate) consecutive_passes: u32,
}

impl GameState {
    /// Creates the state of a fresh game over `boards`.
    ///
    /// `to_move` is `None` for simultaneous variants.
    pub(crate) fn new(boards: Vec<Board>, players: usize, to_move: Option<Color>) -> Self {
        GameState {
            boards,
            history: Vec::new(),
            to_move,
            active: ColorSet::first(players),
            phase: Phase::AwaitingMove,
            outcome: None,
            captures: vec![0; players],
            consecutive_passes: 0,
        }
    }

    /// Returns the primary board.
    pub fn board(&self) -> &Board {
        &self.boards[0]
    }

    /// Returns every board; multi-board variants keep more than one.
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Returns whose turn it is, for turn-based variants.
    pub fn to_move(&self) -> Option<Color> {
        self.to_move
    }

    /// Returns the players still in the game.
    pub fn active(&self) -> ColorSet {
        self.active
    }

    pub fn players(&self) -> usize {
        self.captures.len()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Ended
    }

    /// Returns how many enemy stones `color` has captured.
    pub fn captures(&self, color: Color) -> u32 {
        self.captures.get(color.index()).copied().unwrap_or(0)
    }

    pub fn consecutive_passes(&self) -> u32 {
        self.consecutive_passes
    }

    /// Checks the fields a restored state must agree on: board count,
    /// player count, and the phase matching the outcome.
    pub(crate) fn check(&self, boards: usize, players: usize) -> Result<(), GameError> {
        let invalid = |what: String| Err(GameError::InvalidConfig(what));
        if self.boards.len() != boards {
            return invalid(format!("expected {} boards, found {}", boards, self.boards.len()));
        }
        if let Some(first) = self.boards.first() {
            if self.boards.iter().any(|b| b.topology() != first.topology()) {
                return invalid("boards differ in shape".into());
            }
        }
        if self.captures.len() != players {
            return invalid(format!(
                "capture counts for {} players in a {}-player game",
                self.captures.len(),
                players
            ));
        }
        let outside = |c: Color| c.index() >= players;
        if self.active.iter().any(outside) || self.to_move.is_some_and(outside) {
            return invalid("player outside the game".into());
        }
        if (self.phase == Phase::Ended) != self.outcome.is_some() {
            return invalid(format!("phase {:?} disagrees with the outcome", self.phase));
        }
        Ok(())
    }

    pub(crate) fn push_turn(&mut self, moves: Vec<Submission>) {
        let number = self.history.len() as u32 + 1;
        self.history.push(Turn { number, moves });
    }

    pub(crate) fn credit(&mut self, color: Color, stones: usize) {
        if let Some(count) = self.captures.get_mut(color.index()) {
            *count += stones as u32;
        }
    }

    /// Ends the game and returns the event announcing it.
    pub(crate) fn finish(&mut self, outcome: Outcome) -> GameEvent {
        tracing::info!(winner = ?outcome.winner(), "game over");
        self.phase = Phase::Ended;
        self.outcome = Some(outcome.clone());
        GameEvent::GameOver { outcome }
    }
}
