//! Rule modules for Go variants.
//!
//! This module provides the [`RuleModule`] trait which abstracts over the
//! different variants. Each variant owns its [`GameState`] and implements
//! three capabilities: validate a move into a plan, apply a plan, and score
//! the position. Validation computes the complete effect of a move on
//! scratch copies; application only commits it. A rejected move therefore
//! never touches the game.

mod drift;
mod parallel;
mod pyramid;
mod quantum;
mod standard;
mod turn;

pub use drift::Drift;
pub use parallel::{Parallel, ParallelPlan};
pub use pyramid::Pyramid;
pub use quantum::{Quantum, QuantumPlan, QuantumStone, Reality, StoneId};
pub use standard::Standard;
pub use turn::TurnPlan;

use crate::{Board, GameError, GameEvent, GameState, Score, Topology, VariantKind};
use baduk_core::{Cell, Color, Move};

/// Trait implemented by every variant.
///
/// # Example
///
/// ```
/// use baduk_engine::rules::{RuleModule, Standard};
/// use baduk_engine::config::StandardConfig;
/// use baduk_core::{Color, Coord, Move};
///
/// let mut game = Standard::new(StandardConfig::default()).unwrap();
/// game.submit_move(Color::BLACK, Move::Place(Coord::new(3, 3))).unwrap();
/// assert_eq!(game.state().history().len(), 1);
/// ```
pub trait RuleModule {
    /// The fully computed, not yet committed effect of a move.
    type Plan;

    /// Returns which variant this module implements.
    fn kind(&self) -> VariantKind;

    /// Returns the current game state.
    fn state(&self) -> &GameState;

    /// Checks a move and computes its effect without changing the game.
    fn validate(&self, player: Color, mv: Move) -> Result<Self::Plan, GameError>;

    /// Commits a plan produced by [`validate`](RuleModule::validate) on the
    /// current state.
    fn apply(&mut self, plan: Self::Plan) -> Vec<GameEvent>;

    /// Scores the current position.
    fn score(&self) -> Score;

    /// Ends the game on an external signal (agreement, adjudication),
    /// scoring the current position.
    fn conclude(&mut self) -> Result<Vec<GameEvent>, GameError>;

    /// Validates and applies a move.
    fn submit_move(&mut self, player: Color, mv: Move) -> Result<Vec<GameEvent>, GameError> {
        match self.validate(player, mv) {
            Ok(plan) => {
                let events = self.apply(plan);
                tracing::debug!(variant = ?self.kind(), %player, %mv, events = events.len(), "move accepted");
                Ok(events)
            }
            Err(e) => {
                tracing::debug!(variant = ?self.kind(), %player, %mv, error = %e, "move rejected");
                Err(e)
            }
        }
    }
}

/// Checks a position against the configured board shape and the colors
/// taking part. Merged stones and blockers only arise in simultaneous
/// play and are accepted only when `markers` is set.
pub(crate) fn check_position(
    board: &Board,
    topology: &Topology,
    players: usize,
    markers: bool,
) -> Result<(), GameError> {
    if board.topology() != topology {
        return Err(GameError::InvalidConfig(
            "board shape differs from the configured board".into(),
        ));
    }
    for (at, cell) in board.occupied() {
        let allowed = match cell {
            Cell::Empty => true,
            Cell::Stone(color) => color.index() < players,
            Cell::Merged(colors) => markers && colors.iter().all(|c| c.index() < players),
            Cell::Blocker => markers,
        };
        if !allowed {
            return Err(GameError::InvalidConfig(format!(
                "board holds '{}' at {} in a {}-player game",
                cell.to_char(),
                at,
                players
            )));
        }
    }
    Ok(())
}
