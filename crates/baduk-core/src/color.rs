//! Player color representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A player's stone color.
///
/// Two-player variants use [`Color::BLACK`] and [`Color::WHITE`]. Variants
/// with more players number further colors upwards from 2.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Color(u8);

impl Color {
    /// Maximum number of distinct colors (and so players) in one game.
    pub const MAX: usize = 16;

    pub const BLACK: Color = Color(0);
    pub const WHITE: Color = Color(1);

    /// Creates a color from its index (0-15).
    #[inline]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < Self::MAX {
            Some(Color(index))
        } else {
            None
        }
    }

    /// Returns the index (0 for Black, 1 for White, ...).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the paired color: Black and White swap, as do 2 and 3, etc.
    #[inline]
    pub const fn opposite(self) -> Self {
        Color(self.0 ^ 1)
    }

    /// Parses a color from its diagram character.
    ///
    /// `B` and `W` (either case) name Black and White; digits name colors
    /// up to 9 and `K` to `P` colors 10 to 15.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'B' | 'b' => Some(Color::BLACK),
            'W' | 'w' => Some(Color::WHITE),
            '0'..='9' => Color::new(c as u8 - b'0'),
            'K'..='P' => Color::new(c as u8 - b'K' + 10),
            _ => None,
        }
    }

    /// Returns the diagram character for this color.
    pub const fn to_char(self) -> char {
        match self.0 {
            0 => 'B',
            1 => 'W',
            n @ 2..=9 => (b'0' + n) as char,
            n => (b'K' + n - 10) as char,
        }
    }
}

impl TryFrom<u8> for Color {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Color::new(index).ok_or_else(|| format!("color index {} out of range", index))
    }
}

impl From<Color> for u8 {
    fn from(color: Color) -> u8 {
        color.0
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({})", self.to_char())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "Black"),
            1 => write!(f, "White"),
            n => write!(f, "Player {}", n + 1),
        }
    }
}

/// A set of colors, used for multicolor cells and active-player tracking.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorSet(u16);

impl ColorSet {
    pub const EMPTY: ColorSet = ColorSet(0);

    /// The set of the first `count` colors.
    pub fn first(count: usize) -> Self {
        let count = count.min(Color::MAX);
        if count == Color::MAX {
            ColorSet(u16::MAX)
        } else {
            ColorSet((1u16 << count) - 1)
        }
    }

    /// A set holding a single color.
    #[inline]
    pub const fn single(color: Color) -> Self {
        ColorSet(1 << color.0)
    }

    #[inline]
    pub fn insert(&mut self, color: Color) {
        self.0 |= 1 << color.0;
    }

    #[inline]
    pub fn remove(&mut self, color: Color) {
        self.0 &= !(1 << color.0);
    }

    #[inline]
    pub const fn contains(self, color: Color) -> bool {
        self.0 & (1 << color.0) != 0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the color if the set holds exactly one.
    pub fn only(self) -> Option<Color> {
        if self.len() == 1 {
            Color::new(self.0.trailing_zeros() as u8)
        } else {
            None
        }
    }

    #[inline]
    pub const fn union(self, other: ColorSet) -> ColorSet {
        ColorSet(self.0 | other.0)
    }

    /// Iterates the colors in ascending index order.
    pub fn iter(self) -> impl Iterator<Item = Color> {
        (0..Color::MAX as u8)
            .filter(move |i| self.0 & (1 << i) != 0)
            .map(Color)
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut set = ColorSet::EMPTY;
        for color in iter {
            set.insert(color);
        }
        set
    }
}

impl fmt::Debug for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
