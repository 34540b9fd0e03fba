//! Board diagram parsing.
//!
//! A diagram describes a rectangular board one row per line, top row first:
//!
//! ```text
//! . B . .
//! B W B .
//! . B . #
//! ```
//!
//! `.` or `+` is an empty point, `#` a neutral blocker, `B`/`W` Black and
//! White stones, the digits `2`-`9` and the letters `K`-`P` stones of
//! further colors. Whitespace inside a row is ignored and blank lines are
//! skipped.

use crate::{Cell, Color, Coord};
use thiserror::Error;

/// Errors that can occur when parsing a diagram.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiagramError {
    #[error("diagram is empty")]
    Empty,

    #[error("row {row} has {found} points, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("invalid character '{ch}' in row {row}")]
    InvalidCharacter { ch: char, row: usize },
}

/// A parsed diagram: board dimensions plus every non-empty point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    pub width: usize,
    pub height: usize,
    /// Occupied points in row-major order.
    pub cells: Vec<(Coord, Cell)>,
}

/// Parser for board diagrams.
pub struct DiagramParser;

impl DiagramParser {
    /// Parses a diagram.
    pub fn parse(text: &str) -> Result<Diagram, DiagramError> {
        let rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        let width = rows.first().map(Vec::len).ok_or(DiagramError::Empty)?;
        let mut cells = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(DiagramError::RaggedRow {
                    row: y,
                    found: row.len(),
                    expected: width,
                });
            }
            for (x, &ch) in row.iter().enumerate() {
                let cell = Self::parse_cell(ch).ok_or(DiagramError::InvalidCharacter { ch, row: y })?;
                if !cell.is_empty() {
                    cells.push((Coord::new(x as i32, y as i32), cell));
                }
            }
        }

        Ok(Diagram {
            width,
            height: rows.len(),
            cells,
        })
    }

    fn parse_cell(ch: char) -> Option<Cell> {
        match ch {
            '.' | '+' => Some(Cell::Empty),
            '#' => Some(Cell::Blocker),
            // Digits 0 and 1 would alias B and W.
            '0' | '1' => None,
            _ => Color::from_char(ch).map(Cell::Stone),
        }
    }
}
