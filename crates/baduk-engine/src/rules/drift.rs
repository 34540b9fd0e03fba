//! Drift Go: the board content slides after every placement.

use super::turn::{capture_event, play_stone, TurnEngine, TurnPlan};
use super::{check_position, RuleModule};
use crate::chain::{dead_chains, remove_chains};
use crate::config::DriftConfig;
use crate::score::Weighting;
use crate::{Board, GameError, GameEvent, GameState, Score, VariantKind};
use baduk_core::{Color, Move};
use serde::{Deserialize, Serialize};

/// Standard rules, after which the whole board content shifts cyclically by
/// the configured vector. Adjacency does not wrap, so the shift can split
/// chains along the seam and leave some without liberties; every such chain,
/// of either color, is removed at once before superko is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drift {
    config: DriftConfig,
    engine: TurnEngine,
}

impl Drift {
    pub fn new(config: DriftConfig) -> Result<Self, GameError> {
        let topology = config.validate()?;
        Ok(Self::start(config, Board::new(topology)))
    }

    /// Starts from a custom position on the configured grid.
    pub fn from_board(config: DriftConfig, board: Board) -> Result<Self, GameError> {
        let topology = config.validate()?;
        check_position(&board, &topology, 2, false)?;
        Ok(Self::start(config, board))
    }

    pub(crate) fn check_restored(&self) -> Result<(), GameError> {
        let topology = self.config.validate()?;
        self.engine.check(1, &topology)
    }

    fn start(config: DriftConfig, board: Board) -> Self {
        let engine = TurnEngine::new(
            vec![board],
            config.komi,
            config.allow_suicide,
            Weighting::Uniform,
        );
        Drift { config, engine }
    }
}

impl RuleModule for Drift {
    type Plan = TurnPlan;

    fn kind(&self) -> VariantKind {
        VariantKind::Drift
    }

    fn state(&self) -> &GameState {
        &self.engine.state
    }

    fn validate(&self, player: Color, mv: Move) -> Result<TurnPlan, GameError> {
        self.engine.precheck(player, mv)?;
        let Move::Place(at) = mv else {
            return Ok(self.engine.plan_without_placement(player, mv));
        };

        let placement = play_stone(self.engine.state.board(), player, at, self.config.allow_suicide)?;
        let mut events = placement.events;
        let mut captured = placement.captured;
        let mut lost = placement.lost;

        let shift = self.config.shift;
        let mut board = placement.board.shifted(shift)?;
        events.push(GameEvent::Drifted { shift });

        let stranded = dead_chains(&board);
        remove_chains(&mut board, &stranded)?;
        for chain in stranded {
            if chain.color == player {
                lost += chain.stones.len();
            } else {
                captured += chain.stones.len();
            }
            events.push(capture_event(chain, None));
        }

        self.engine
            .plan_placement(player, at, vec![board], events, captured, lost)
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
