//! Machinery shared by the turn-based variants.
//!
//! Black and White alternate; two consecutive passes end the game; a
//! resignation ends it at once. Placements are checked against positional
//! superko over every board the variant keeps.

use crate::chain::{captured_chains, chain_of, remove_chains, Chain};
use crate::score::{area_score, Weighting};
use crate::state::Outcome;
use crate::superko::{StateKey, SuperkoDetector};
use super::check_position;
use crate::{Board, GameError, GameEvent, GameState, IllegalReason, Score, Topology};
use baduk_core::{Cell, Color, Coord, Move, Submission};
use serde::{Deserialize, Serialize};

/// A validated move of a turn-based variant.
#[derive(Debug, Clone)]
pub struct TurnPlan {
    submission: Submission,
    boards: Option<Vec<Board>>,
    key: Option<StateKey>,
    captured: usize,
    lost: usize,
    events: Vec<GameEvent>,
}

/// The result of dropping one stone on one board.
pub(crate) struct Placement {
    pub board: Board,
    pub events: Vec<GameEvent>,
    /// Enemy stones removed.
    pub captured: usize,
    /// Own stones removed by an allowed suicide.
    pub lost: usize,
}

/// Places a stone, removes the enemy chains it captures and then, if its
/// own chain has no liberties, either rejects the move or removes that
/// chain too.
pub(crate) fn play_stone(
    board: &Board,
    player: Color,
    at: Coord,
    allow_suicide: bool,
) -> Result<Placement, GameError> {
    let mut board = board.clone();
    board.set(at, Cell::Stone(player))?;
    let mut events = vec![GameEvent::Placed { player, at }];

    let captured = captured_chains(&board, at, player);
    let captured_count = remove_chains(&mut board, &captured)?.len();
    events.extend(captured.into_iter().map(|chain| capture_event(chain, None)));

    let mut lost = 0;
    if let Some(own) = chain_of(&board, at, player).filter(Chain::is_dead) {
        if !allow_suicide {
            return Err(IllegalReason::Suicide.into());
        }
        lost = remove_chains(&mut board, std::slice::from_ref(&own))?.len();
        events.push(capture_event(own, None));
    }

    Ok(Placement {
        board,
        events,
        captured: captured_count,
        lost,
    })
}

pub(crate) fn capture_event(chain: Chain, reality: Option<u8>) -> GameEvent {
    GameEvent::Captured {
        color: chain.color,
        stones: chain.stones.into_iter().collect(),
        reality,
    }
}

/// Turn order, superko record and game state of a two-player game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TurnEngine {
    pub state: GameState,
    pub superko: SuperkoDetector,
    pub komi: f64,
    pub allow_suicide: bool,
    pub weighting: Weighting,
}

impl TurnEngine {
    pub fn new(boards: Vec<Board>, komi: f64, allow_suicide: bool, weighting: Weighting) -> Self {
        let superko = SuperkoDetector::starting_from(StateKey::of_all(&boards));
        TurnEngine {
            state: GameState::new(boards, 2, Some(Color::BLACK)),
            superko,
            komi,
            allow_suicide,
            weighting,
        }
    }

    /// Checks a restored engine: `boards` boards of the configured shape,
    /// two players, and someone to move.
    pub fn check(&self, boards: usize, topology: &Topology) -> Result<(), GameError> {
        self.state.check(boards, 2)?;
        if self.state.to_move.is_none() {
            return Err(GameError::InvalidConfig("no player to move".into()));
        }
        for board in &self.state.boards {
            check_position(board, topology, 2, false)?;
        }
        Ok(())
    }

    /// Checks everything that does not depend on the move's effect: game
    /// status, player, turn order and target point.
    pub fn precheck(&self, player: Color, mv: Move) -> Result<(), GameError> {
        if self.state.is_over() {
            return Err(GameError::GameEnded);
        }
        if !self.state.active.contains(player) {
            return Err(IllegalReason::UnknownPlayer(player).into());
        }
        if mv == Move::Resign {
            return Ok(());
        }
        if let Some(expected) = self.state.to_move.filter(|&c| c != player) {
            return Err(IllegalReason::NotYourTurn { expected }.into());
        }
        if let Move::Place(at) = mv {
            for board in &self.state.boards {
                if !board.get(at)?.is_empty() {
                    return Err(IllegalReason::Occupied(at).into());
                }
            }
        }
        Ok(())
    }

    /// Plans a pass or resignation.
    pub fn plan_without_placement(&self, player: Color, mv: Move) -> TurnPlan {
        let event = match mv {
            Move::Resign => GameEvent::Resigned { player },
            _ => GameEvent::Passed { player },
        };
        TurnPlan {
            submission: Submission::new(player, mv),
            boards: None,
            key: None,
            captured: 0,
            lost: 0,
            events: vec![event],
        }
    }

    /// Plans a placement whose resulting boards are already computed,
    /// rejecting it if the position repeats.
    pub fn plan_placement(
        &self,
        player: Color,
        at: Coord,
        boards: Vec<Board>,
        events: Vec<GameEvent>,
        captured: usize,
        lost: usize,
    ) -> Result<TurnPlan, GameError> {
        let key = StateKey::of_all(&boards);
        if self.superko.contains(&key) {
            tracing::debug!(fingerprint = key.fingerprint(), "superko repetition");
            return Err(GameError::KoViolation);
        }
        Ok(TurnPlan {
            submission: Submission::new(player, Move::Place(at)),
            boards: Some(boards),
            key: Some(key),
            captured,
            lost,
            events,
        })
    }

    /// Commits a plan and returns its events.
    pub fn commit(&mut self, plan: TurnPlan) -> Vec<GameEvent> {
        let TurnPlan {
            submission,
            boards,
            key,
            captured,
            lost,
            mut events,
        } = plan;
        let player = submission.player;
        self.state.push_turn(vec![submission]);

        match submission.mov {
            Move::Place(_) => {
                if let Some(boards) = boards {
                    self.state.boards = boards;
                }
                if let Some(key) = key {
                    self.superko.record(key);
                }
                self.state.credit(player, captured);
                self.state.credit(player.opposite(), lost);
                self.state.consecutive_passes = 0;
                self.state.to_move = Some(player.opposite());
            }
            Move::Pass => {
                self.state.consecutive_passes += 1;
                self.state.to_move = Some(player.opposite());
                if self.state.consecutive_passes >= 2 {
                    let outcome = Outcome::from_score(self.score());
                    events.push(self.state.finish(outcome));
                }
            }
            Move::Resign => {
                let outcome = Outcome::Resignation {
                    winner: player.opposite(),
                };
                events.push(self.state.finish(outcome));
            }
        }
        events
    }

    /// Area score, averaged over every board.
    pub fn score(&self) -> Score {
        let scores: Vec<Score> = self
            .state
            .boards
            .iter()
            .map(|board| area_score(board, self.weighting, 2, self.komi))
            .collect();
        Score::mean(&scores)
    }

    pub fn conclude(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.state.is_over() {
            return Err(GameError::GameEnded);
        }
        let outcome = Outcome::from_score(self.score());
        Ok(vec![self.state.finish(outcome)])
    }
}
