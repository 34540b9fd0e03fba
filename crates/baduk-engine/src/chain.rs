//! Chain and liberty analysis.
//!
//! A chain is a maximal connected set of points carrying one color. A
//! multicolor cell belongs to a chain of each of its colors. Chains are
//! derived from the board on demand and never stored.

use crate::{Board, GameError};
use baduk_core::{Cell, Color, Coord};
use std::collections::{BTreeSet, HashSet, VecDeque};

/// A connected group of same-colored stones and its liberties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub color: Color,
    pub stones: BTreeSet<Coord>,
    pub liberties: BTreeSet<Coord>,
}

impl Chain {
    /// Returns true if the chain has no liberties left.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.liberties.is_empty()
    }

    /// Returns the smallest stone coordinate, used to order chains.
    pub fn anchor(&self) -> Option<Coord> {
        self.stones.first().copied()
    }
}

/// Returns the chain of `color` through `at`, or `None` if the point does
/// not carry that color.
pub fn chain_of(board: &Board, at: Coord, color: Color) -> Option<Chain> {
    if !board.get(at).ok()?.has_color(color) {
        return None;
    }

    let mut stones = BTreeSet::new();
    let mut liberties = BTreeSet::new();
    let mut queue = VecDeque::from([at]);
    stones.insert(at);

    while let Some(current) = queue.pop_front() {
        for neighbor in board.neighbors(current) {
            match board.get(neighbor) {
                Ok(Cell::Empty) => {
                    liberties.insert(neighbor);
                }
                Ok(cell) if cell.has_color(color) => {
                    if stones.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
                _ => {}
            }
        }
    }

    Some(Chain {
        color,
        stones,
        liberties,
    })
}

/// Returns one chain per color carried by the point at `at`.
pub fn chains_at(board: &Board, at: Coord) -> Vec<Chain> {
    match board.get(at) {
        Ok(cell) => cell
            .colors()
            .iter()
            .filter_map(|color| chain_of(board, at, color))
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Returns the enemy chains adjacent to `played` that have no liberties.
///
/// Chains of any color other than `color` count as enemies. The result is
/// ordered by anchor coordinate, then color, with duplicates removed.
pub fn captured_chains(board: &Board, played: Coord, color: Color) -> Vec<Chain> {
    let mut seen: HashSet<(Coord, Color)> = HashSet::new();
    let mut captured = Vec::new();

    for neighbor in board.neighbors(played) {
        for chain in chains_at(board, neighbor) {
            if chain.color == color || seen.contains(&(neighbor, chain.color)) {
                continue;
            }
            seen.extend(chain.stones.iter().map(|&s| (s, chain.color)));
            if chain.is_dead() {
                captured.push(chain);
            }
        }
    }

    sort_chains(&mut captured);
    captured
}

/// Returns every chain on the board that has no liberties.
pub fn dead_chains(board: &Board) -> Vec<Chain> {
    let mut seen: HashSet<(Coord, Color)> = HashSet::new();
    let mut dead = Vec::new();

    for (at, cell) in board.occupied() {
        for color in cell.colors().iter() {
            if seen.contains(&(at, color)) {
                continue;
            }
            if let Some(chain) = chain_of(board, at, color) {
                seen.extend(chain.stones.iter().map(|&s| (s, color)));
                if chain.is_dead() {
                    dead.push(chain);
                }
            }
        }
    }

    sort_chains(&mut dead);
    dead
}

/// Empties every point of the given chains. Returns the cleared points in
/// ascending order.
///
/// # Errors
///
/// Returns [`GameError::InvalidCoordinate`] for a stone outside the board,
/// which only happens when a chain was taken from a differently shaped one.
pub fn remove_chains(board: &mut Board, chains: &[Chain]) -> Result<Vec<Coord>, GameError> {
    let points: BTreeSet<Coord> = chains
        .iter()
        .flat_map(|chain| chain.stones.iter().copied())
        .collect();
    for &at in &points {
        board.set(at, Cell::Empty)?;
    }
    Ok(points.into_iter().collect())
}

/// Returns the colors, other than the chain's own, that touch the chain.
pub fn bordering_colors(board: &Board, chain: &Chain) -> BTreeSet<Color> {
    chain
        .stones
        .iter()
        .flat_map(|&s| board.neighbors(s))
        .filter_map(|n| board.get(n).ok())
        .flat_map(|cell| cell.colors().iter())
        .filter(|&c| c != chain.color)
        .collect()
}

fn sort_chains(chains: &mut [Chain]) {
    chains.sort_by_key(|chain| (chain.anchor(), chain.color));
}

#[cfg(test)]
mod tests {
    use super::*;
    use baduk_core::ColorSet;

    #[test]
    fn chain_members_and_liberties() {
        let board = Board::from_diagram(
            "
            B B .
            W B .
            . . .
            ",
        )
        .unwrap();
        let chain = chain_of(&board, Coord::new(0, 0), Color::BLACK).unwrap();
        assert_eq!(chain.stones.len(), 3);
        assert_eq!(
            chain.liberties,
            [Coord::new(2, 0), Coord::new(2, 1), Coord::new(1, 2)]
                .into_iter()
                .collect()
        );
        assert!(chain_of(&board, Coord::new(0, 1), Color::BLACK).is_none());
    }

    #[test]
    fn captured_enemy_chain() {
        let board = Board::from_diagram(
            "
            W B .
            B . .
            . . .
            ",
        )
        .unwrap();
        let captured = captured_chains(&board, Coord::new(0, 1), Color::BLACK);
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].color, Color::WHITE);
        assert_eq!(captured[0].anchor(), Some(Coord::new(0, 0)));
        assert!(captured_chains(&board, Coord::new(0, 1), Color::WHITE).is_empty());
    }

    #[test]
    fn captured_chains_are_ordered_and_unique() {
        let board = Board::from_diagram(
            "
            W B W
            B W B
            . B .
            ",
        )
        .unwrap();
        let captured = captured_chains(&board, Coord::new(1, 0), Color::BLACK);
        let anchors: Vec<_> = captured.iter().filter_map(Chain::anchor).collect();
        assert_eq!(
            anchors,
            vec![Coord::new(0, 0), Coord::new(2, 0), Coord::new(1, 1)]
        );
    }

    #[test]
    fn blocker_is_not_a_liberty() {
        let board = Board::from_diagram("B #\n# .").unwrap();
        let chain = chain_of(&board, Coord::new(0, 0), Color::BLACK).unwrap();
        assert!(chain.is_dead());
    }

    #[test]
    fn merged_cell_joins_both_colors() {
        let mut board = Board::from_diagram(
            "
            B . W
            . . .
            ",
        )
        .unwrap();
        let both: ColorSet = [Color::BLACK, Color::WHITE].into_iter().collect();
        board.set(Coord::new(1, 0), Cell::Merged(both)).unwrap();
        let black = chain_of(&board, Coord::new(0, 0), Color::BLACK).unwrap();
        let white = chain_of(&board, Coord::new(2, 0), Color::WHITE).unwrap();
        assert!(black.stones.contains(&Coord::new(1, 0)));
        assert!(white.stones.contains(&Coord::new(1, 0)));
        assert_eq!(chains_at(&board, Coord::new(1, 0)).len(), 2);
    }

    #[test]
    fn dead_chains_and_removal() {
        let mut board = Board::from_diagram(
            "
            B W .
            W . .
            . . B
            ",
        )
        .unwrap();
        let dead = dead_chains(&board);
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].color, Color::BLACK);
        assert_eq!(
            bordering_colors(&board, &dead[0]),
            [Color::WHITE].into_iter().collect()
        );
        let removed = remove_chains(&mut board, &dead).unwrap();
        assert_eq!(removed, vec![Coord::new(0, 0)]);
        assert!(dead_chains(&board).is_empty());
    }

    #[test]
    fn removal_outside_board_fails() {
        let large = Board::from_diagram(". . .\n. . .\n. . B").unwrap();
        let chain = chain_of(&large, Coord::new(2, 2), Color::BLACK).unwrap();
        let mut small = Board::from_diagram(". .\n. .").unwrap();
        assert_eq!(
            remove_chains(&mut small, &[chain]),
            Err(GameError::InvalidCoordinate(Coord::new(2, 2)))
        );
    }
}
