//! Standard Go rules.

use super::turn::{play_stone, TurnEngine, TurnPlan};
use super::{check_position, RuleModule};
use crate::config::StandardConfig;
use crate::score::Weighting;
use crate::{Board, GameError, GameEvent, GameState, Score, VariantKind};
use baduk_core::{Color, Move};
use serde::{Deserialize, Serialize};

/// Standard rules: one move per turn, capture of chains without liberties,
/// positional superko, and area scoring after two consecutive passes.
///
/// Suicide is illegal unless the configuration allows it, in which case the
/// suicidal chain is removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standard {
    config: StandardConfig,
    engine: TurnEngine,
}

impl Standard {
    /// Starts a game on an empty board.
    pub fn new(config: StandardConfig) -> Result<Self, GameError> {
        let topology = config.validate()?;
        Ok(Self::start(config, Board::new(topology)))
    }

    /// Starts a game from a custom position (handicap stones, problems).
    ///
    /// The board must have the configured shape and hold only black and
    /// white stones.
    pub fn from_board(config: StandardConfig, board: Board) -> Result<Self, GameError> {
        let topology = config.validate()?;
        check_position(&board, &topology, 2, false)?;
        Ok(Self::start(config, board))
    }

    fn start(config: StandardConfig, board: Board) -> Self {
        let engine = TurnEngine::new(
            vec![board],
            config.komi,
            config.allow_suicide,
            Weighting::Uniform,
        );
        Standard { config, engine }
    }

    pub fn config(&self) -> &StandardConfig {
        &self.config
    }

    /// Checks that a restored game is internally consistent.
    pub(crate) fn check_restored(&self) -> Result<(), GameError> {
        let topology = self.config.validate()?;
        self.engine.check(1, &topology)
    }
}

impl RuleModule for Standard {
    type Plan = TurnPlan;

    fn kind(&self) -> VariantKind {
        VariantKind::Standard
    }

    fn state(&self) -> &GameState {
        &self.engine.state
    }

    fn validate(&self, player: Color, mv: Move) -> Result<TurnPlan, GameError> {
        self.engine.precheck(player, mv)?;
        match mv {
            Move::Place(at) => {
                let placement =
                    play_stone(self.engine.state.board(), player, at, self.config.allow_suicide)?;
                self.engine.plan_placement(
                    player,
                    at,
                    vec![placement.board],
                    placement.events,
                    placement.captured,
                    placement.lost,
                )
            }
            Move::Pass | Move::Resign => Ok(self.engine.plan_without_placement(player, mv)),
        }
    }

    fn apply(&mut self, plan: TurnPlan) -> Vec<GameEvent> {
        self.engine.commit(plan)
    }

    fn score(&self) -> Score {
        self.engine.score()
    }

    fn conclude(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.engine.conclude()
    }
}
