//! Positional superko detection.
//!
//! A [`StateKey`] is the canonical form of one or more boards: the occupied
//! points listed in ascending coordinate order, tagged with the board they
//! belong to. Two boards with the same content produce the same key no
//! matter which moves led to them. Move history and side to move are never
//! part of the key.

use crate::{Board, GameError};
use baduk_core::{Cell, Coord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Canonical whole-board content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey(Vec<(u8, Coord, Cell)>);

impl StateKey {
    /// Canonicalizes a single board.
    pub fn of(board: &Board) -> Self {
        Self::of_all([board])
    }

    /// Canonicalizes several boards evolving together.
    pub fn of_all<'a>(boards: impl IntoIterator<Item = &'a Board>) -> Self {
        let entries = boards
            .into_iter()
            .enumerate()
            .flat_map(|(layer, board)| {
                board
                    .occupied()
                    .map(move |(at, cell)| (layer as u8, at, cell))
            })
            .collect();
        StateKey(entries)
    }

    /// Returns the number of occupied points in the key.
    pub fn stones(&self) -> usize {
        self.0.len()
    }

    /// Returns a 64-bit fingerprint of the key, for logging.
    ///
    /// Each entry is mixed with a fixed-seed xorshift and the results are
    /// XORed, so the fingerprint depends only on content.
    pub fn fingerprint(&self) -> u64 {
        self.0.iter().fold(0, |acc, &(layer, at, cell)| {
            let cell_bits = match cell {
                Cell::Empty => 0,
                Cell::Stone(color) => 1 + color.index() as u64,
                Cell::Merged(colors) => 0x100 + colors.iter().fold(0, |m, c| m | 1 << c.index()),
                Cell::Blocker => 0x20000,
            };
            let seed = (layer as u64) << 56
                ^ (at.x as u32 as u64) << 24
                ^ (at.y as u32 as u64)
                ^ cell_bits << 40;
            acc ^ mix(seed ^ 0x9E37_79B9_7F4A_7C15)
        })
    }
}

fn mix(mut x: u64) -> u64 {
    for _ in 0..3 {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
    }
    x
}

/// Records every position seen in a game and rejects repeats.
///
/// The record only grows: superko is a full-history rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperkoDetector {
    seen: BTreeSet<StateKey>,
}

impl SuperkoDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detector that has already seen the starting position.
    pub fn starting_from(key: StateKey) -> Self {
        SuperkoDetector {
            seen: BTreeSet::from([key]),
        }
    }

    /// Returns true if the position has been observed before.
    pub fn contains(&self, key: &StateKey) -> bool {
        self.seen.contains(key)
    }

    /// Fails with [`GameError::KoViolation`] if the position was seen before.
    pub fn check(&self, key: &StateKey) -> Result<(), GameError> {
        if self.contains(key) {
            Err(GameError::KoViolation)
        } else {
            Ok(())
        }
    }

    /// Records a position, failing with [`GameError::KoViolation`] if it was
    /// already recorded.
    pub fn observe(&mut self, key: StateKey) -> Result<(), GameError> {
        self.check(&key)?;
        self.record(key);
        Ok(())
    }

    /// Records a position already checked with [`check`](Self::check).
    pub fn record(&mut self, key: StateKey) {
        self.seen.insert(key);
    }

    /// Returns the number of distinct positions recorded.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Topology;
    use baduk_core::Color;

    #[test]
    fn same_content_same_key() {
        let mut a = Board::new(Topology::grid(3, 3));
        a.set(Coord::new(0, 0), Cell::Stone(Color::BLACK)).unwrap();
        a.set(Coord::new(2, 2), Cell::Stone(Color::WHITE)).unwrap();

        let mut b = Board::new(Topology::grid(3, 3));
        b.set(Coord::new(2, 2), Cell::Stone(Color::WHITE)).unwrap();
        b.set(Coord::new(1, 1), Cell::Stone(Color::BLACK)).unwrap();
        b.set(Coord::new(0, 0), Cell::Stone(Color::BLACK)).unwrap();
        b.set(Coord::new(1, 1), Cell::Empty).unwrap();

        assert_eq!(StateKey::of(&a), StateKey::of(&b));
        assert_eq!(StateKey::of(&a).fingerprint(), StateKey::of(&b).fingerprint());
    }

    #[test]
    fn layer_matters() {
        let mut a = Board::new(Topology::grid(2, 2));
        let empty = a.clone();
        a.set(Coord::new(0, 0), Cell::Stone(Color::BLACK)).unwrap();
        assert_ne!(
            StateKey::of_all([&a, &empty]),
            StateKey::of_all([&empty, &a])
        );
    }

    #[test]
    fn repeat_is_rejected() {
        let board = Board::from_diagram("B .\n. W").unwrap();
        let mut detector = SuperkoDetector::new();
        detector.observe(StateKey::of(&board)).unwrap();
        assert_eq!(
            detector.observe(StateKey::of(&board)),
            Err(GameError::KoViolation)
        );
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn distinct_states_accepted() {
        let mut detector = SuperkoDetector::new();
        for diagram in ["B .\n. .", ". B\n. .", "W .\n. .", ". .\n. ."] {
            let board = Board::from_diagram(diagram).unwrap();
            detector.observe(StateKey::of(&board)).unwrap();
        }
        assert_eq!(detector.len(), 4);
        let first = Board::from_diagram("B .\n. .").unwrap();
        assert!(detector.check(&StateKey::of(&first)).is_err());
    }

    #[test]
    fn record_is_idempotent() {
        let board = Board::from_diagram("B .\n. W").unwrap();
        let mut detector = SuperkoDetector::new();
        detector.record(StateKey::of(&board));
        detector.record(StateKey::of(&board));
        assert_eq!(detector.len(), 1);
        assert!(detector.contains(&StateKey::of(&board)));
    }
}
