//! Variant catalogue and the game dispatcher.
//!
//! [`Game`] is the one type callers hold: it is built from a variant
//! identifier and a JSON configuration, forwards moves to the variant's
//! rule module, and saves or restores itself as a JSON snapshot.

use crate::config::decode;
use crate::rules::{Drift, Parallel, Pyramid, Quantum, RuleModule, Standard};
use crate::{GameError, GameEvent, GameState, IllegalReason, Score, SnapshotError};
use baduk_core::{Color, Move, Submission};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The variants the engine knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    Standard,
    Parallel,
    Drift,
    Quantum,
    Pyramid,
}

impl VariantKind {
    /// Every variant, in catalogue order.
    pub const ALL: [VariantKind; 5] = [
        VariantKind::Standard,
        VariantKind::Parallel,
        VariantKind::Drift,
        VariantKind::Quantum,
        VariantKind::Pyramid,
    ];

    /// Returns the identifier used to create the variant.
    pub const fn id(self) -> &'static str {
        match self {
            VariantKind::Standard => "standard",
            VariantKind::Parallel => "parallel",
            VariantKind::Drift => "drift",
            VariantKind::Quantum => "quantum",
            VariantKind::Pyramid => "pyramid",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            VariantKind::Standard => "Alternating play, area scoring, positional superko",
            VariantKind::Parallel => "Simultaneous rounds for 2-16 players with collision rules",
            VariantKind::Drift => "The board shifts cyclically after every placement",
            VariantKind::Quantum => "Two entangled realities played in lockstep",
            VariantKind::Pyramid => "Points weigh more towards the centre of the board",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for VariantKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        if id == "baduk" {
            return Ok(VariantKind::Standard);
        }
        VariantKind::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .ok_or_else(|| GameError::UnknownVariant(s.to_string()))
    }
}

/// A game of any variant.
///
/// # Example
///
/// ```
/// use baduk_engine::Game;
/// use baduk_core::Submission;
/// use serde_json::json;
///
/// let mut game = Game::create("standard", &json!({"board": {"type": "grid", "width": 9, "height": 9}})).unwrap();
/// game.submit("B 4,4".parse::<Submission>().unwrap()).unwrap();
///
/// let snapshot = game.to_snapshot().unwrap();
/// let restored = Game::from_snapshot(&snapshot).unwrap();
/// assert_eq!(restored, game);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum Game {
    Standard(Standard),
    Parallel(Parallel),
    Drift(Drift),
    Quantum(Quantum),
    Pyramid(Pyramid),
}

/// Forwards a call to the rule module inside a [`Game`].
macro_rules! dispatch {
    ($game:expr, $module:ident => $body:expr) => {
        match $game {
            Game::Standard($module) => $body,
            Game::Parallel($module) => $body,
            Game::Drift($module) => $body,
            Game::Quantum($module) => $body,
            Game::Pyramid($module) => $body,
        }
    };
}

impl Game {
    /// Creates a game from a variant identifier and its configuration.
    ///
    /// The configuration is decoded and validated before any board is
    /// allocated. `null` selects the variant's defaults.
    pub fn create(variant: &str, config: &serde_json::Value) -> Result<Game, GameError> {
        let kind: VariantKind = variant.parse()?;
        let game = match kind {
            VariantKind::Standard => Game::Standard(Standard::new(decode(config)?)?),
            VariantKind::Parallel => Game::Parallel(Parallel::new(decode(config)?)?),
            VariantKind::Drift => Game::Drift(Drift::new(decode(config)?)?),
            VariantKind::Quantum => Game::Quantum(Quantum::new(decode(config)?)?),
            VariantKind::Pyramid => Game::Pyramid(Pyramid::new(decode(config)?)?),
        };
        tracing::info!(variant = %kind, points = game.state().board().len(), "game created");
        Ok(game)
    }

    pub fn kind(&self) -> VariantKind {
        dispatch!(self, m => m.kind())
    }

    pub fn state(&self) -> &GameState {
        dispatch!(self, m => m.state())
    }

    /// Submits a move for `player`. A rejected move leaves the game
    /// unchanged.
    pub fn submit_move(&mut self, player: Color, mv: Move) -> Result<Vec<GameEvent>, GameError> {
        dispatch!(self, m => m.submit_move(player, mv))
    }

    pub fn submit(&mut self, submission: Submission) -> Result<Vec<GameEvent>, GameError> {
        self.submit_move(submission.player, submission.mov)
    }

    pub fn score(&self) -> Score {
        dispatch!(self, m => m.score())
    }

    /// Ends the game on an external signal and scores the position.
    pub fn conclude(&mut self) -> Result<Vec<GameEvent>, GameError> {
        dispatch!(self, m => m.conclude())
    }

    /// Resolves an incomplete simultaneous round, treating missing players
    /// as passing. Only parallel games have rounds.
    pub fn resolve_round(&mut self) -> Result<Vec<GameEvent>, GameError> {
        match self {
            Game::Parallel(game) => game.resolve_round(),
            _ => Err(IllegalReason::Unsupported(format!(
                "{} games have no simultaneous rounds",
                self.kind()
            ))
            .into()),
        }
    }

    pub fn is_over(&self) -> bool {
        self.state().is_over()
    }

    /// Serializes the complete game as JSON.
    pub fn to_snapshot(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restores a game saved with [`to_snapshot`](Game::to_snapshot).
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if the text does not decode and
    /// [`SnapshotError::Invalid`] if it decodes to a game whose parts
    /// disagree (board sizes, player counts, the quantum stone arena).
    pub fn from_snapshot(snapshot: &str) -> Result<Game, SnapshotError> {
        let game: Game = serde_json::from_str(snapshot)?;
        dispatch!(&game, module => module.check_restored())
            .map_err(|e| SnapshotError::Invalid(e.to_string()))?;
        Ok(game)
    }
}

/// Creates a game; see [`Game::create`].
pub fn create_game(variant: &str, config: &serde_json::Value) -> Result<Game, GameError> {
    Game::create(variant, config)
}
