//! Content of a single board point.

use crate::{Color, ColorSet};
use serde::{Deserialize, Serialize};

/// What occupies a board point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    /// No stone.
    #[default]
    Empty,
    /// A stone of one color.
    Stone(Color),
    /// A multicolor stone produced by a merged collision.
    Merged(ColorSet),
    /// A neutral marker that blocks the point without belonging to anyone.
    Blocker,
}

impl Cell {
    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Returns true for points that hold a stone (single or multicolor).
    #[inline]
    pub const fn is_stone(self) -> bool {
        matches!(self, Cell::Stone(_) | Cell::Merged(_))
    }

    /// Returns the colors this cell counts for.
    pub const fn colors(self) -> ColorSet {
        match self {
            Cell::Stone(color) => ColorSet::single(color),
            Cell::Merged(colors) => colors,
            Cell::Empty | Cell::Blocker => ColorSet::EMPTY,
        }
    }

    #[inline]
    pub const fn has_color(self, color: Color) -> bool {
        self.colors().contains(color)
    }

    /// Returns the diagram character for this cell.
    pub const fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Stone(color) => color.to_char(),
            Cell::Merged(_) => '*',
            Cell::Blocker => '#',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_cell_has_every_color() {
        let colors: ColorSet = [Color::BLACK, Color::WHITE].into_iter().collect();
        let cell = Cell::Merged(colors);
        assert!(cell.is_stone());
        assert!(cell.has_color(Color::BLACK));
        assert!(cell.has_color(Color::WHITE));
        assert!(!cell.has_color(Color::new(2).unwrap()));
    }

    #[test]
    fn blocker_is_neither_stone_nor_empty() {
        assert!(!Cell::Blocker.is_stone());
        assert!(!Cell::Blocker.is_empty());
        assert!(Cell::Blocker.colors().is_empty());
    }

    #[test]
    fn chars() {
        assert_eq!(Cell::Empty.to_char(), '.');
        assert_eq!(Cell::Stone(Color::WHITE).to_char(), 'W');
        assert_eq!(Cell::Blocker.to_char(), '#');
    }
}
