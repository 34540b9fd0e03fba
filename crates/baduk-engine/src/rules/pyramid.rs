//! Pyramid Go: standard play, weighted scoring.

use super::turn::{play_stone, TurnEngine, TurnPlan};
use super::{check_position, RuleModule};
use crate::config::PyramidConfig;
use crate::score::Weighting;
use crate::{Board, GameError, GameEvent, GameState, Score, VariantKind};
use baduk_core::{Color, Move};
use serde::{Deserialize, Serialize};

/// Standard capture and superko rules, but each point is worth one plus its
/// distance to the nearest edge, so the centre of the board counts most.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pyramid {
    config: PyramidConfig,
    engine: TurnEngine,
}

impl Pyramid {
    pub fn new(config: PyramidConfig) -> Result<Self, GameError> {
        let topology = config.validate()?;
        Ok(Self::start(config, Board::new(topology)))
    }

    pub fn from_board(config: PyramidConfig, board: Board) -> Result<Self, GameError> {
        let topology = config.validate()?;
        check_position(&board, &topology, 2, false)?;
        Ok(Self::start(config, board))
    }

    fn start(config: PyramidConfig, board: Board) -> Self {
        let engine = TurnEngine::new(
            vec![board],
            config.komi,
            config.allow_suicide,
            Weighting::Pyramid,
        );
        Pyramid { config, engine }
    }

    pub(crate) fn check_restored(&self) -> Result<(), GameError> {
        let topology = self.config.validate()?;
        self.engine.check(1, &topology)
    }

    /// Returns the weight of every point, by point index.
    pub fn weights(&self) -> Vec<f64> {
        Weighting::Pyramid.weights(self.engine.state.board())
    }
}

impl RuleModule for Pyramid {
    type Plan = TurnPlan;

    fn kind(&self) -> VariantKind {
        VariantKind::Pyramid
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
        self.engine.plan_placement(
            player,
            at,
            vec![placement.board],
            placement.events,
            placement.captured,
            placement.lost,
        )
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use baduk_core::Coord;

    fn five_by_five() -> PyramidConfig {
        PyramidConfig {
            board: BoardConfig::Grid {
                width: 5,
                height: 5,
            },
            komi: 0.0,
            allow_suicide: false,
        }
    }

    #[test]
    fn center_only_scores_three() {
        let board = Board::from_diagram(
            "
            . . . . .
            . . W . .
            . W B W .
            . . W . .
            . . . . .
            ",
        )
        .unwrap();
        let game = Pyramid::from_board(five_by_five(), board).unwrap();
        let score = game.score();
        assert_eq!(score.total(Color::BLACK), 3.0);
        // White: four stones of weight 2 plus the other 20 points (16 edge
        // points and the four diagonal points of weight 2).
        assert_eq!(score.total(Color::WHITE), 8.0 + 16.0 + 8.0);
    }

    #[test]
    fn weight_table() {
        let game = Pyramid::new(five_by_five()).unwrap();
        let weights = game.weights();
        let at = |x: i32, y: i32| weights[y as usize * 5 + x as usize];
        assert_eq!(at(0, 0), 1.0);
        assert_eq!(at(1, 0), 1.0);
        assert_eq!(at(1, 1), 2.0);
        assert_eq!(at(2, 2), 3.0);
    }

    #[test]
    fn plays_like_standard() {
        let mut game = Pyramid::new(five_by_five()).unwrap();
        game.submit_move(Color::BLACK, Move::Place(Coord::new(2, 2)))
            .unwrap();
        game.submit_move(Color::WHITE, Move::Pass).unwrap();
        game.submit_move(Color::BLACK, Move::Pass).unwrap();
        let outcome = game.state().outcome().unwrap();
        assert_eq!(outcome.winner(), Some(Color::BLACK));
        assert_eq!(game.score().total(Color::BLACK), 35.0);
    }

    #[test]
    fn from_board_must_match_config() {
        let hex = Board::new(crate::Topology::hex(2));
        assert!(matches!(
            Pyramid::from_board(five_by_five(), hex),
            Err(GameError::InvalidConfig(_))
        ));
        let third_color = Board::from_diagram(
            "
            . . . . .
            . . . . .
            . . 3 . .
            . . . . .
            . . . . .
            ",
        )
        .unwrap();
        assert!(matches!(
            Pyramid::from_board(five_by_five(), third_color),
            Err(GameError::InvalidConfig(_))
        ));
    }
}
