//! Parallel Go: every player moves at once.
//!
//! Submissions are buffered until each active player has one, then the
//! round resolves as a single batch against the pre-round board:
//!
//! 1. blockers left by the previous round are cleared;
//! 2. placements are grouped by point and collisions resolved by policy;
//! 3. zero-liberty chains that contain no stone placed this round are
//!    removed;
//! 4. every chain still without liberties is removed.
//!
//! Because the batch only depends on the set of submissions, the order in
//! which players submitted never changes the result.

use super::turn::{capture_event, play_stone};
use super::{check_position, RuleModule};
use crate::chain::{bordering_colors, dead_chains, remove_chains, Chain};
use crate::config::{CollisionPolicy, ParallelConfig};
use crate::score::{area_score, Weighting};
use crate::state::{Outcome, Phase};
use crate::{Board, GameError, GameEvent, GameState, IllegalReason, Score, VariantKind};
use baduk_core::{Cell, Color, ColorSet, Coord, Move, Submission};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A validated parallel-game action.
#[derive(Debug, Clone)]
pub struct ParallelPlan(Step);

#[derive(Debug, Clone)]
enum Step {
    /// The round is still incomplete; remember the move.
    Buffer(Submission),
    /// A player leaves the game.
    Resign {
        player: Color,
        outcome: Option<Outcome>,
        resolution: Option<Box<Resolution>>,
    },
    /// The round is complete.
    Resolve(Box<Resolution>),
}

/// The fully computed result of one round.
#[derive(Debug, Clone)]
struct Resolution {
    moves: Vec<Submission>,
    board: Board,
    blockers: Vec<Coord>,
    credits: Vec<(Color, usize)>,
    all_passed: bool,
    events: Vec<GameEvent>,
    outcome: Option<Outcome>,
}

/// Simultaneous-move Go for two to sixteen players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parallel {
    config: ParallelConfig,
    state: GameState,
    /// Submissions of the round in progress, in arrival order.
    pending: Vec<Submission>,
    /// Points blocked by the previous round's collisions.
    blockers: Vec<Coord>,
}

impl Parallel {
    pub fn new(config: ParallelConfig) -> Result<Self, GameError> {
        let topology = config.validate()?;
        Ok(Self::start(config, Board::new(topology)))
    }

    /// Starts from a custom position. Blockers already on the board expire
    /// when the first round resolves.
    pub fn from_board(config: ParallelConfig, board: Board) -> Result<Self, GameError> {
        let topology = config.validate()?;
        check_position(&board, &topology, config.players as usize, true)?;
        Ok(Self::start(config, board))
    }

    fn start(config: ParallelConfig, board: Board) -> Self {
        let blockers = board.find(Cell::Blocker);
        let state = GameState::new(vec![board], config.players as usize, None);
        Parallel {
            config,
            state,
            pending: Vec::new(),
            blockers,
        }
    }

    /// Checks that a restored game is internally consistent.
    pub(crate) fn check_restored(&self) -> Result<(), GameError> {
        let topology = self.config.validate()?;
        let players = self.config.players as usize;
        self.state.check(1, players)?;
        check_position(self.state.board(), &topology, players, true)?;

        let mut seen = ColorSet::EMPTY;
        for submission in &self.pending {
            if submission.player.index() >= players || seen.contains(submission.player) {
                return Err(GameError::InvalidConfig(format!(
                    "unexpected buffered move {}",
                    submission
                )));
            }
            seen.insert(submission.player);
        }
        if let Some(&at) = self.blockers.iter().find(|&&at| !topology.contains(at)) {
            return Err(GameError::InvalidCoordinate(at));
        }
        Ok(())
    }

    pub fn config(&self) -> &ParallelConfig {
        &self.config
    }

    /// Returns the moves buffered for the current round.
    pub fn pending(&self) -> &[Submission] {
        &self.pending
    }

    /// Returns the active players that have not yet submitted this round.
    pub fn waiting_for(&self) -> ColorSet {
        let mut waiting = self.state.active;
        for submission in &self.pending {
            waiting.remove(submission.player);
        }
        waiting
    }

    /// Resolves the current round with whatever has been submitted; players
    /// that have not moved are treated as passing.
    pub fn resolve_round(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.state.is_over() {
            return Err(GameError::GameEnded);
        }
        tracing::debug!(missing = ?self.waiting_for(), "forcing round resolution");
        let resolution = self.resolve(self.pending.clone(), self.state.active)?;
        Ok(self.commit(resolution))
    }

    /// Checks a placement against the pre-round board.
    fn check_placement(&self, player: Color, at: Coord) -> Result<(), GameError> {
        let board = self.state.board();
        if !board.get(at)?.is_empty() {
            return Err(IllegalReason::Occupied(at).into());
        }
        if !self.config.allow_suicide {
            play_stone(board, player, at, false)?;
        }
        Ok(())
    }

    /// Computes the outcome of a round from its submissions. Active players
    /// without a submission pass.
    fn resolve(&self, mut moves: Vec<Submission>, active: ColorSet) -> Result<Resolution, GameError> {
        for player in active.iter() {
            if !moves.iter().any(|s| s.player == player) {
                moves.push(Submission::new(player, Move::Pass));
            }
        }

        let round = self.state.history.len() as u32 + 1;
        let mut board = self.state.board().clone();
        let mut events = Vec::new();

        for &at in &self.blockers {
            if board.get(at)? == Cell::Blocker {
                board.set(at, Cell::Empty)?;
                events.push(GameEvent::BlockerCleared { at });
            }
        }

        let mut targets: BTreeMap<Coord, ColorSet> = BTreeMap::new();
        for submission in moves.iter().filter(|s| active.contains(s.player)) {
            if let Move::Place(at) = submission.mov {
                targets.entry(at).or_default().insert(submission.player);
            }
        }
        let all_passed = targets.is_empty();

        let mut placed = BTreeSet::new();
        let mut blockers = Vec::new();
        for (&at, &players) in &targets {
            if let Some(player) = players.only() {
                board.set(at, Cell::Stone(player))?;
                placed.insert(at);
                events.push(GameEvent::Placed { player, at });
                continue;
            }
            let policy = self.config.collision;
            tracing::debug!(%at, ?players, ?policy, "collision");
            events.push(GameEvent::Collision {
                at,
                players,
                policy,
            });
            match policy {
                CollisionPolicy::Merge => {
                    board.set(at, Cell::Merged(players))?;
                    placed.insert(at);
                }
                CollisionPolicy::Pass => {}
                CollisionPolicy::Ko => {
                    board.set(at, Cell::Blocker)?;
                    blockers.push(at);
                }
            }
        }

        let mut credits = Vec::new();
        let settled: Vec<Chain> = dead_chains(&board)
            .into_iter()
            .filter(|chain| chain.stones.is_disjoint(&placed))
            .collect();
        take_chains(&mut board, settled, &mut credits, &mut events)?;
        let remaining = dead_chains(&board);
        take_chains(&mut board, remaining, &mut credits, &mut events)?;

        events.push(GameEvent::RoundResolved { round });
        let outcome = (all_passed || board.is_full())
            .then(|| Outcome::from_score(self.score_board(&board, active)));

        Ok(Resolution {
            moves,
            board,
            blockers,
            credits,
            all_passed,
            events,
            outcome,
        })
    }

    fn commit(&mut self, resolution: Resolution) -> Vec<GameEvent> {
        let Resolution {
            moves,
            board,
            blockers,
            credits,
            all_passed,
            mut events,
            outcome,
        } = resolution;

        self.state.boards = vec![board];
        self.blockers = blockers;
        for (color, stones) in credits {
            self.state.credit(color, stones);
        }
        self.state.push_turn(moves);
        self.pending.clear();
        self.state.phase = Phase::AwaitingMove;
        if all_passed {
            self.state.consecutive_passes += 1;
        } else {
            self.state.consecutive_passes = 0;
        }
        if let Some(outcome) = outcome {
            events.push(self.state.finish(outcome));
        }
        events
    }

    /// Area score of `board` for the players in `active`. Players who
    /// resigned keep their stones on the board but score nothing.
    fn score_board(&self, board: &Board, active: ColorSet) -> Score {
        let mut score = area_score(
            board,
            Weighting::Uniform,
            self.config.players as usize,
            self.config.komi,
        );
        for (i, total) in score.totals.iter_mut().enumerate() {
            if !Color::new(i as u8).is_some_and(|c| active.contains(c)) {
                *total = 0.0;
            }
        }
        score
    }
}

/// Removes `chains`, crediting each to every color that borders it.
fn take_chains(
    board: &mut Board,
    chains: Vec<Chain>,
    credits: &mut Vec<(Color, usize)>,
    events: &mut Vec<GameEvent>,
) -> Result<(), GameError> {
    for chain in &chains {
        for color in bordering_colors(board, chain) {
            credits.push((color, chain.stones.len()));
        }
    }
    remove_chains(board, &chains)?;
    for chain in chains {
        tracing::debug!(color = %chain.color, stones = chain.stones.len(), "chain captured");
        events.push(capture_event(chain, None));
    }
    Ok(())
}

impl RuleModule for Parallel {
    type Plan = ParallelPlan;

    fn kind(&self) -> VariantKind {
        VariantKind::Parallel
    }

    fn state(&self) -> &GameState {
        &self.state
    }

    fn validate(&self, player: Color, mv: Move) -> Result<ParallelPlan, GameError> {
        if self.state.is_over() {
            return Err(GameError::GameEnded);
        }
        if !self.state.active.contains(player) {
            return Err(IllegalReason::UnknownPlayer(player).into());
        }

        if mv == Move::Resign {
            let mut active = self.state.active;
            active.remove(player);
            if let Some(winner) = active.only() {
                return Ok(ParallelPlan(Step::Resign {
                    player,
                    outcome: Some(Outcome::Resignation { winner }),
                    resolution: None,
                }));
            }
            // The departure may complete the round.
            let waiting = self.waiting_for();
            let resolution = if waiting == ColorSet::single(player) && !self.pending.is_empty() {
                let mut moves = self.pending.clone();
                moves.push(Submission::new(player, mv));
                Some(Box::new(self.resolve(moves, active)?))
            } else {
                None
            };
            return Ok(ParallelPlan(Step::Resign {
                player,
                outcome: None,
                resolution,
            }));
        }

        if !self.waiting_for().contains(player) {
            return Err(IllegalReason::AlreadySubmitted.into());
        }
        if let Move::Place(at) = mv {
            self.check_placement(player, at)?;
        }

        let submission = Submission::new(player, mv);
        if self.waiting_for().len() == 1 {
            let mut moves = self.pending.clone();
            moves.push(submission);
            let resolution = self.resolve(moves, self.state.active)?;
            Ok(ParallelPlan(Step::Resolve(Box::new(resolution))))
        } else {
            Ok(ParallelPlan(Step::Buffer(submission)))
        }
    }

    fn apply(&mut self, plan: ParallelPlan) -> Vec<GameEvent> {
        match plan.0 {
            Step::Buffer(submission) => {
                self.pending.push(submission);
                self.state.phase = Phase::RoundResolving;
                vec![GameEvent::Submitted {
                    player: submission.player,
                }]
            }
            Step::Resign {
                player,
                outcome,
                resolution,
            } => {
                tracing::info!(%player, "player resigned");
                self.state.active.remove(player);
                self.pending.retain(|s| s.player != player);
                let mut events = vec![GameEvent::Resigned { player }];
                if let Some(resolution) = resolution {
                    events.extend(self.commit(*resolution));
                } else {
                    self.pending.push(Submission::new(player, Move::Resign));
                    if let Some(outcome) = outcome {
                        let moves = std::mem::take(&mut self.pending);
                        self.state.push_turn(moves);
                        events.push(self.state.finish(outcome));
                    }
                }
                events
            }
            Step::Resolve(resolution) => self.commit(*resolution),
        }
    }

    fn score(&self) -> Score {
        self.score_board(self.state.board(), self.state.active)
    }

    fn conclude(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.state.is_over() {
            return Err(GameError::GameEnded);
        }
        let outcome = Outcome::from_score(self.score());
        Ok(vec![self.state.finish(outcome)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;

    fn config(players: u8, collision: CollisionPolicy) -> ParallelConfig {
        ParallelConfig {
            board: BoardConfig::Grid {
                width: 5,
                height: 5,
            },
            komi: 0.0,
            allow_suicide: false,
            players,
            collision,
        }
    }

    fn place(x: i32, y: i32) -> Move {
        Move::Place(Coord::new(x, y))
    }

    fn color(i: u8) -> Color {
        Color::new(i).unwrap()
    }

    #[test]
    fn round_waits_for_every_player() {
        let mut game = Parallel::new(config(2, CollisionPolicy::Merge)).unwrap();
        let events = game.submit_move(Color::BLACK, place(0, 0)).unwrap();
        assert_eq!(
            events,
            vec![GameEvent::Submitted {
                player: Color::BLACK
            }]
        );
        assert_eq!(game.state().phase(), Phase::RoundResolving);
        assert_eq!(game.state().board().get(Coord::new(0, 0)), Ok(Cell::Empty));
        assert_eq!(
            game.submit_move(Color::BLACK, place(1, 1)),
            Err(GameError::IllegalMove(IllegalReason::AlreadySubmitted))
        );

        let events = game.submit_move(Color::WHITE, place(4, 4)).unwrap();
        assert!(events.contains(&GameEvent::RoundResolved { round: 1 }));
        assert_eq!(game.state().phase(), Phase::AwaitingMove);
        assert_eq!(
            game.state().board().get(Coord::new(0, 0)),
            Ok(Cell::Stone(Color::BLACK))
        );
        assert_eq!(game.state().history().len(), 1);
        assert_eq!(game.state().history()[0].moves.len(), 2);
    }

    #[test]
    fn submission_order_does_not_matter() {
        let mut a = Parallel::new(config(3, CollisionPolicy::Merge)).unwrap();
        let mut b = a.clone();
        let moves = [
            (color(0), place(1, 1)),
            (color(1), place(2, 1)),
            (color(2), place(1, 1)),
        ];
        for &(player, mv) in &moves {
            a.submit_move(player, mv).unwrap();
        }
        for &(player, mv) in moves.iter().rev() {
            b.submit_move(player, mv).unwrap();
        }
        assert_eq!(a.state().board(), b.state().board());
    }

    #[test]
    fn merge_collision() {
        let mut game = Parallel::new(config(2, CollisionPolicy::Merge)).unwrap();
        game.submit_move(Color::BLACK, place(2, 2)).unwrap();
        let events = game.submit_move(Color::WHITE, place(2, 2)).unwrap();
        let both: ColorSet = [Color::BLACK, Color::WHITE].into_iter().collect();
        assert!(events.contains(&GameEvent::Collision {
            at: Coord::new(2, 2),
            players: both,
            policy: CollisionPolicy::Merge
        }));
        assert_eq!(
            game.state().board().get(Coord::new(2, 2)),
            Ok(Cell::Merged(both))
        );
    }

    #[test]
    fn pass_collision_leaves_point_empty() {
        let mut game = Parallel::new(config(2, CollisionPolicy::Pass)).unwrap();
        game.submit_move(Color::BLACK, place(2, 2)).unwrap();
        game.submit_move(Color::WHITE, place(2, 2)).unwrap();
        assert!(game.state().board().occupied().next().is_none());
        assert!(!game.state().is_over());
    }

    #[test]
    fn ko_collision_blocks_one_round() {
        let mut game = Parallel::new(config(2, CollisionPolicy::Ko)).unwrap();
        game.submit_move(Color::BLACK, place(2, 2)).unwrap();
        game.submit_move(Color::WHITE, place(2, 2)).unwrap();
        assert_eq!(
            game.state().board().get(Coord::new(2, 2)),
            Ok(Cell::Blocker)
        );
        assert_eq!(
            game.submit_move(Color::BLACK, place(2, 2)),
            Err(GameError::IllegalMove(IllegalReason::Occupied(Coord::new(
                2, 2
            ))))
        );

        game.submit_move(Color::BLACK, place(0, 0)).unwrap();
        let events = game.submit_move(Color::WHITE, place(4, 4)).unwrap();
        assert!(events.contains(&GameEvent::BlockerCleared {
            at: Coord::new(2, 2)
        }));
        assert_eq!(game.state().board().get(Coord::new(2, 2)), Ok(Cell::Empty));
    }

    #[test]
    fn settled_chains_fall_before_new_ones() {
        let board = Board::from_diagram(
            "
            W . B
            B . W
            ",
        )
        .unwrap();
        let mut config = config(2, CollisionPolicy::Merge);
        config.board = BoardConfig::Grid {
            width: 3,
            height: 2,
        };
        let mut game = Parallel::from_board(config, board).unwrap();
        game.submit_move(Color::BLACK, place(1, 0)).unwrap();
        game.submit_move(Color::WHITE, place(1, 1)).unwrap();

        // Every chain is surrounded after placement. The two old single
        // stones fall first, which gives both new chains a liberty back.
        assert_eq!(game.state().board().to_string(), ". B B\n. W W\n");
        assert_eq!(game.state().captures(Color::BLACK), 1);
        assert_eq!(game.state().captures(Color::WHITE), 1);
    }

    #[test]
    fn suicide_checked_against_pre_round_board() {
        let board = Board::from_diagram(
            "
            . W . . .
            W . . . .
            . . . . .
            . . . . .
            . . . . .
            ",
        )
        .unwrap();
        let mut game = Parallel::from_board(config(2, CollisionPolicy::Merge), board).unwrap();
        assert_eq!(
            game.submit_move(Color::BLACK, place(0, 0)),
            Err(GameError::IllegalMove(IllegalReason::Suicide))
        );
        assert!(game.pending().is_empty());
    }

    #[test]
    fn all_pass_round_ends_game() {
        let mut game = Parallel::new(config(3, CollisionPolicy::Merge)).unwrap();
        game.submit_move(color(0), place(0, 0)).unwrap();
        game.submit_move(color(1), Move::Pass).unwrap();
        game.submit_move(color(2), Move::Pass).unwrap();
        assert!(!game.state().is_over());

        for i in 0..3 {
            game.submit_move(color(i), Move::Pass).unwrap();
        }
        assert!(game.state().is_over());
        assert_eq!(game.state().outcome().and_then(Outcome::winner), Some(color(0)));
        assert_eq!(
            game.submit_move(color(0), Move::Pass),
            Err(GameError::GameEnded)
        );
    }

    #[test]
    fn forced_resolution_passes_for_missing_players() {
        let mut game = Parallel::new(config(2, CollisionPolicy::Merge)).unwrap();
        game.submit_move(Color::BLACK, place(3, 3)).unwrap();
        let events = game.resolve_round().unwrap();
        assert!(events.contains(&GameEvent::RoundResolved { round: 1 }));
        assert_eq!(
            game.state().history()[0].moves[1],
            Submission::new(Color::WHITE, Move::Pass)
        );
        assert!(!game.state().is_over());

        // An empty forced round is an all-pass round.
        game.resolve_round().unwrap();
        assert!(game.state().is_over());
    }

    #[test]
    fn resignation_removes_player() {
        let mut game = Parallel::new(config(3, CollisionPolicy::Merge)).unwrap();
        game.submit_move(color(0), place(0, 0)).unwrap();
        game.submit_move(color(1), place(1, 1)).unwrap();

        // The last player leaving completes the round.
        let events = game.submit_move(color(2), Move::Resign).unwrap();
        assert!(events.contains(&GameEvent::RoundResolved { round: 1 }));
        assert!(!game.state().active().contains(color(2)));
        assert_eq!(
            game.submit_move(color(2), Move::Pass),
            Err(GameError::IllegalMove(IllegalReason::UnknownPlayer(color(2))))
        );

        game.submit_move(color(1), Move::Resign).unwrap();
        assert_eq!(
            game.state().outcome(),
            Some(&Outcome::Resignation { winner: color(0) })
        );
    }

    #[test]
    fn rejects_colors_beyond_player_count() {
        let board = Board::from_diagram(". 2\n. .").unwrap();
        let mut small = config(2, CollisionPolicy::Merge);
        small.board = BoardConfig::Grid {
            width: 2,
            height: 2,
        };
        assert!(matches!(
            Parallel::from_board(small, board),
            Err(GameError::InvalidConfig(_))
        ));

        let wrong_shape = Board::from_diagram("B .\n. W").unwrap();
        assert!(matches!(
            Parallel::from_board(config(2, CollisionPolicy::Merge), wrong_shape),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn restored_round_buffer_is_checked() {
        let mut game = Parallel::new(config(3, CollisionPolicy::Ko)).unwrap();
        game.submit_move(color(0), place(1, 1)).unwrap();
        assert!(game.check_restored().is_ok());

        let mut doubled = game.clone();
        doubled.pending.push(Submission::new(color(0), Move::Pass));
        assert!(doubled.check_restored().is_err());

        let mut stranger = game.clone();
        stranger.pending.push(Submission::new(color(7), Move::Pass));
        assert!(stranger.check_restored().is_err());

        let mut stray_blocker = game;
        stray_blocker.blockers.push(Coord::new(-1, 9));
        assert_eq!(
            stray_blocker.check_restored(),
            Err(GameError::InvalidCoordinate(Coord::new(-1, 9)))
        );
    }
}
