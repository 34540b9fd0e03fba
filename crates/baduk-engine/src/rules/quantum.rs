//! Quantum Go: two realities played in lockstep.
//!
//! Every placement puts a stone on the same point of both boards and links
//! the two as a pair. The first two placements of the game entangle: the
//! stone in reality B takes the inverted color. Capturing either member of a
//! pair removes its partner as well, whatever the partner's liberties.
//!
//! Stones live in an arena indexed by [`StoneId`]; each board keeps the id
//! of the stone on every point, so the pairing survives independently of
//! chain membership.

use super::turn::{TurnEngine, TurnPlan};
use super::{check_position, RuleModule};
use crate::chain::{captured_chains, chain_of, Chain};
use crate::config::QuantumConfig;
use crate::score::Weighting;
use crate::{Board, GameError, GameEvent, GameState, IllegalReason, Score, VariantKind};
use baduk_core::{Cell, Color, Coord, Move};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Number of opening placements that entangle.
const ENTANGLING_PLACEMENTS: u32 = 2;

/// Index of a stone in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoneId(u32);

impl StoneId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One of the two boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reality {
    A,
    B,
}

impl Reality {
    pub const BOTH: [Reality; 2] = [Reality::A, Reality::B];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Reality::A => 0,
            Reality::B => 1,
        }
    }

    pub const fn other(self) -> Reality {
        match self {
            Reality::A => Reality::B,
            Reality::B => Reality::A,
        }
    }
}

/// A stone in the arena. Captured stones stay in the arena, flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumStone {
    pub color: Color,
    pub reality: Reality,
    pub at: Coord,
    /// The linked stone in the other reality. Stones of a custom starting
    /// position have none.
    pub partner: Option<StoneId>,
    pub captured: bool,
}

/// A validated quantum move: the turn itself plus the arena after it.
#[derive(Debug, Clone)]
pub struct QuantumPlan {
    turn: TurnPlan,
    arena: Option<Arena>,
}

/// Stones and per-point occupants of both realities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Arena {
    stones: Vec<QuantumStone>,
    /// Stone id on each point, by reality then point index.
    occupants: Vec<Vec<Option<StoneId>>>,
}

impl Arena {
    fn new(boards: &[Board]) -> Result<Self, GameError> {
        let mut arena = Arena {
            stones: Vec::new(),
            occupants: boards.iter().map(|b| vec![None; b.len()]).collect(),
        };
        for (board, reality) in boards.iter().zip(Reality::BOTH) {
            for (at, cell) in board.occupied() {
                let Cell::Stone(color) = cell else {
                    return Err(GameError::InvalidConfig(format!(
                        "quantum boards hold only single-color stones, found '{}' at {}",
                        cell.to_char(),
                        at
                    )));
                };
                arena.add(board, color, reality, at, None)?;
            }
        }
        Ok(arena)
    }

    /// Checks that every live stone sits where its board says, and that
    /// every occupant and partner id points into the arena.
    fn check(&self, boards: &[Board]) -> Result<(), GameError> {
        let invalid = |what: String| GameError::InvalidConfig(what);
        if self.occupants.len() != boards.len() {
            return Err(invalid("stone arena does not cover both realities".into()));
        }
        for ((board, reality), points) in boards.iter().zip(Reality::BOTH).zip(&self.occupants) {
            if points.len() != board.len() {
                return Err(invalid(format!(
                    "stone arena size differs in reality {:?}",
                    reality
                )));
            }
            for (at, cell) in board.cells() {
                let stone = self
                    .occupant(board, reality, at)
                    .map(|id| self.get(id).ok_or(id))
                    .transpose()
                    .map_err(|id| invalid(format!("unknown stone {:?}", id)))?;
                let consistent = match (cell, stone) {
                    (Cell::Empty, None) => true,
                    (Cell::Stone(color), Some(stone)) => {
                        stone.color == color
                            && stone.at == at
                            && stone.reality == reality
                            && !stone.captured
                    }
                    _ => false,
                };
                if !consistent {
                    return Err(invalid(format!(
                        "stone arena disagrees at {} in reality {:?}",
                        at, reality
                    )));
                }
            }
        }
        if let Some(stone) = self
            .stones
            .iter()
            .find(|s| s.partner.is_some_and(|p| p.index() >= self.stones.len()))
        {
            return Err(invalid(format!("stone at {} has an unknown partner", stone.at)));
        }
        Ok(())
    }

    fn next_id(&self) -> StoneId {
        StoneId(self.stones.len() as u32)
    }

    fn add(
        &mut self,
        board: &Board,
        color: Color,
        reality: Reality,
        at: Coord,
        partner: Option<StoneId>,
    ) -> Result<StoneId, GameError> {
        let id = self.next_id();
        let index = board.index_of(at)?;
        if let Some(slot) = self
            .occupants
            .get_mut(reality.index())
            .and_then(|points| points.get_mut(index))
        {
            *slot = Some(id);
        }
        self.stones.push(QuantumStone {
            color,
            reality,
            at,
            partner,
            captured: false,
        });
        Ok(id)
    }

    fn get(&self, id: StoneId) -> Option<&QuantumStone> {
        self.stones.get(id.index())
    }

    fn occupant(&self, board: &Board, reality: Reality, at: Coord) -> Option<StoneId> {
        let index = board.index_of(at).ok()?;
        self.occupants.get(reality.index())?.get(index).copied().flatten()
    }

    /// Returns the ids of a chain's stones.
    fn ids(&self, board: &Board, reality: Reality, chain: &Chain) -> Vec<StoneId> {
        chain
            .stones
            .iter()
            .filter_map(|&at| self.occupant(board, reality, at))
            .collect()
    }

    /// Removes the given stones and their partners from both boards.
    /// Returns the removed stones grouped by reality and color.
    fn remove(
        &mut self,
        boards: &mut [Board],
        doomed: BTreeSet<StoneId>,
    ) -> Result<BTreeMap<(Reality, Color), Vec<Coord>>, GameError> {
        let partners: Vec<StoneId> = doomed
            .iter()
            .filter_map(|&id| self.get(id)?.partner)
            .collect();
        let doomed: BTreeSet<StoneId> = doomed.into_iter().chain(partners).collect();

        let mut removed: BTreeMap<(Reality, Color), Vec<Coord>> = BTreeMap::new();
        for id in doomed {
            let Some(stone) = self.stones.get_mut(id.index()) else {
                continue;
            };
            if stone.captured {
                continue;
            }
            stone.captured = true;
            let (reality, at, color) = (stone.reality, stone.at, stone.color);
            if let Some(board) = boards.get_mut(reality.index()) {
                let index = board.index_of(at)?;
                board.set(at, Cell::Empty)?;
                if let Some(slot) = self
                    .occupants
                    .get_mut(reality.index())
                    .and_then(|points| points.get_mut(index))
                {
                    *slot = None;
                }
            }
            removed.entry((reality, color)).or_default().push(at);
        }
        for stones in removed.values_mut() {
            stones.sort();
        }
        Ok(removed)
    }
}

/// Two boards evolving together, with per-stone pairing across them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantum {
    config: QuantumConfig,
    engine: TurnEngine,
    arena: Arena,
    placements: u32,
}

impl Quantum {
    pub fn new(config: QuantumConfig) -> Result<Self, GameError> {
        let topology = config.validate()?;
        let board = Board::new(topology);
        Self::from_realities(config, board.clone(), board)
    }

    /// Starts with the same position in both realities. Its stones are not
    /// paired.
    pub fn from_board(config: QuantumConfig, board: Board) -> Result<Self, GameError> {
        Self::from_realities(config, board.clone(), board)
    }

    /// Starts from two independent positions, both on the configured board.
    pub fn from_realities(config: QuantumConfig, a: Board, b: Board) -> Result<Self, GameError> {
        let topology = config.validate()?;
        check_position(&a, &topology, 2, false)?;
        check_position(&b, &topology, 2, false)?;
        let boards = vec![a, b];
        let arena = Arena::new(&boards)?;
        let engine = TurnEngine::new(
            boards,
            config.komi,
            config.allow_suicide,
            Weighting::Uniform,
        );
        Ok(Quantum {
            config,
            engine,
            arena,
            placements: 0,
        })
    }

    /// Checks that a restored game is internally consistent, including
    /// that the arena agrees with both boards.
    pub(crate) fn check_restored(&self) -> Result<(), GameError> {
        let topology = self.config.validate()?;
        self.engine.check(2, &topology)?;
        self.arena.check(self.engine.state.boards())
    }

    /// Returns the board of one reality.
    pub fn reality(&self, reality: Reality) -> &Board {
        &self.engine.state.boards()[reality.index()]
    }

    /// Returns every stone ever placed, captured ones included.
    pub fn stones(&self) -> &[QuantumStone] {
        &self.arena.stones
    }

    /// Returns the id of the stone on a point of one reality.
    pub fn stone_at(&self, reality: Reality, at: Coord) -> Option<StoneId> {
        self.arena.occupant(self.reality(reality), reality, at)
    }

    pub fn stone(&self, id: StoneId) -> Option<&QuantumStone> {
        self.arena.get(id)
    }

    /// Returns true while placements still entangle.
    pub fn is_entangling(&self) -> bool {
        self.placements < ENTANGLING_PLACEMENTS
    }

    fn plan_placement(&self, player: Color, at: Coord) -> Result<QuantumPlan, GameError> {
        let colors = if self.is_entangling() {
            [player, player.opposite()]
        } else {
            [player, player]
        };

        let mut boards = self.engine.state.boards().to_vec();
        let mut arena = self.arena.clone();
        let mut events = vec![GameEvent::Placed { player, at }];

        let first = arena.next_id();
        let second = StoneId(first.0 + 1);
        for (reality, (&color, partner)) in Reality::BOTH.into_iter().zip(colors.iter().zip([second, first])) {
            let board = &mut boards[reality.index()];
            board.set(at, Cell::Stone(color))?;
            arena.add(board, color, reality, at, Some(partner))?;
        }
        if self.is_entangling() {
            tracing::debug!(%at, ?colors, "stones entangled");
            events.push(GameEvent::Entangled { at, colors });
        }

        let mut doomed = BTreeSet::new();
        for reality in Reality::BOTH {
            let board = &boards[reality.index()];
            for chain in captured_chains(board, at, colors[reality.index()]) {
                doomed.extend(arena.ids(board, reality, &chain));
            }
        }
        let mut removed = arena.remove(&mut boards, doomed)?;

        let mut suicidal = BTreeSet::new();
        for reality in Reality::BOTH {
            let board = &boards[reality.index()];
            if let Some(own) = chain_of(board, at, colors[reality.index()]).filter(Chain::is_dead) {
                suicidal.extend(arena.ids(board, reality, &own));
            }
        }
        if !suicidal.is_empty() {
            if !self.config.allow_suicide {
                return Err(IllegalReason::Suicide.into());
            }
            for (key, stones) in arena.remove(&mut boards, suicidal)? {
                removed.entry(key).or_default().extend(stones);
            }
        }

        // Capture counts follow reality A.
        let mut captured = 0;
        let mut lost = 0;
        for ((reality, color), stones) in removed {
            if reality == Reality::A {
                if color == player {
                    lost += stones.len();
                } else {
                    captured += stones.len();
                }
            }
            tracing::debug!(?reality, %color, stones = stones.len(), "stones captured");
            events.push(GameEvent::Captured {
                color,
                stones,
                reality: Some(reality.index() as u8),
            });
        }

        let turn = self
            .engine
            .plan_placement(player, at, boards, events, captured, lost)?;
        Ok(QuantumPlan {
            turn,
            arena: Some(arena),
        })
    }
}

impl RuleModule for Quantum {
    type Plan = QuantumPlan;

    fn kind(&self) -> VariantKind {
        VariantKind::Quantum
    }

    fn state(&self) -> &GameState {
        &self.engine.state
    }

    fn validate(&self, player: Color, mv: Move) -> Result<QuantumPlan, GameError> {
        self.engine.precheck(player, mv)?;
        match mv {
            Move::Place(at) => self.plan_placement(player, at),
            Move::Pass | Move::Resign => Ok(QuantumPlan {
                turn: self.engine.plan_without_placement(player, mv),
                arena: None,
            }),
        }
    }

    fn apply(&mut self, plan: QuantumPlan) -> Vec<GameEvent> {
        if let Some(arena) = plan.arena {
            self.arena = arena;
            self.placements += 1;
        }
        self.engine.commit(plan.turn)
    }

    fn score(&self) -> Score {
        self.engine.score()
    }

    fn conclude(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.engine.conclude()
    }
}
