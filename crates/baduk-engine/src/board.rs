//! Board representation.

use crate::{GameError, Topology};
use baduk_core::{Cell, Coord, DiagramError, DiagramParser, Vector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The content of every point of a board with a given topology.
///
/// Cells are stored densely by point index. Every coordinate the topology
/// declares is addressable; anything else is rejected with
/// [`GameError::InvalidCoordinate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    topology: Topology,
    cells: Vec<Cell>,
}

/// A board as read from a snapshot, before its size is checked.
#[derive(Deserialize)]
struct RawBoard {
    topology: Topology,
    cells: Vec<Cell>,
}

impl TryFrom<RawBoard> for Board {
    type Error = String;

    fn try_from(raw: RawBoard) -> Result<Self, String> {
        if raw.cells.len() != raw.topology.len() {
            return Err(format!(
                "board has {} cells but its shape has {} points",
                raw.cells.len(),
                raw.topology.len()
            ));
        }
        Ok(Board {
            topology: raw.topology,
            cells: raw.cells,
        })
    }
}

impl Board {
    /// Creates an empty board.
    pub fn new(topology: Topology) -> Self {
        let cells = vec![Cell::Empty; topology.len()];
        Board { topology, cells }
    }

    /// Creates a grid board from a diagram.
    pub fn from_diagram(text: &str) -> Result<Self, DiagramError> {
        let diagram = DiagramParser::parse(text)?;
        let mut board = Board::new(Topology::grid(
            diagram.width as u16,
            diagram.height as u16,
        ));
        for (at, cell) in diagram.cells {
            if let Some(i) = board.topology.index_of(at) {
                board.cells[i] = cell;
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Returns the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn in_bounds(&self, at: Coord) -> bool {
        self.topology.contains(at)
    }

    /// Returns the point index of a coordinate.
    pub fn index_of(&self, at: Coord) -> Result<usize, GameError> {
        self.topology
            .index_of(at)
            .ok_or(GameError::InvalidCoordinate(at))
    }

    /// Returns the content of a point.
    pub fn get(&self, at: Coord) -> Result<Cell, GameError> {
        self.cells
            .get(self.index_of(at)?)
            .copied()
            .ok_or(GameError::InvalidCoordinate(at))
    }

    /// Overwrites the content of a point.
    pub fn set(&mut self, at: Coord, cell: Cell) -> Result<(), GameError> {
        let i = self.index_of(at)?;
        let slot = self
            .cells
            .get_mut(i)
            .ok_or(GameError::InvalidCoordinate(at))?;
        *slot = cell;
        Ok(())
    }

    /// Returns the points adjacent to `at`.
    #[inline]
    pub fn neighbors(&self, at: Coord) -> Vec<Coord> {
        self.topology.neighbors(at)
    }

    /// Iterates every point with its content, in ascending coordinate order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, &cell)| self.topology.coord_at(i).map(|at| (at, cell)))
    }

    /// Iterates the points that are not empty.
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.cells().filter(|(_, cell)| !cell.is_empty())
    }

    /// Returns the coordinates holding a cell equal to `cell`.
    pub fn find(&self, cell: Cell) -> Vec<Coord> {
        self.cells()
            .filter(|&(_, c)| c == cell)
            .map(|(at, _)| at)
            .collect()
    }

    /// Returns true if no point is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Returns a copy with all content cyclically shifted by `shift`.
    ///
    /// The content of `(x, y)` moves to `((x + dx) mod W, (y + dy) mod H)`.
    /// Only grid boards can be shifted.
    pub fn shifted(&self, shift: Vector) -> Result<Board, GameError> {
        let (width, height) = self.topology.grid_size().ok_or_else(|| {
            GameError::InvalidConfig("only grid boards can drift".into())
        })?;
        let (w, h) = (width as i32, height as i32);
        let (dx, dy) = (shift.dx.rem_euclid(w), shift.dy.rem_euclid(h));
        let mut shifted = Board::new(self.topology.clone());
        for (at, cell) in self.occupied() {
            let to = Coord::new((at.x + dx).rem_euclid(w), (at.y + dy).rem_euclid(h));
            shifted.set(to, cell)?;
        }
        Ok(shifted)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.topology.grid_size() {
            Some((width, _)) => {
                for row in self.cells.chunks(width.max(1) as usize) {
                    let line: Vec<String> = row.iter().map(|c| c.to_char().to_string()).collect();
                    writeln!(f, "{}", line.join(" "))?;
                }
                Ok(())
            }
            None => {
                for (at, cell) in self.occupied() {
                    writeln!(f, "{} {}", at, cell.to_char())?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baduk_core::Color;

    #[test]
    fn get_and_set() {
        let mut board = Board::new(Topology::grid(3, 3));
        let at = Coord::new(1, 2);
        assert_eq!(board.get(at), Ok(Cell::Empty));
        board.set(at, Cell::Stone(Color::BLACK)).unwrap();
        assert_eq!(board.get(at), Ok(Cell::Stone(Color::BLACK)));
        assert_eq!(board.occupied().count(), 1);
    }

    #[test]
    fn out_of_bounds() {
        let mut board = Board::new(Topology::grid(3, 3));
        let at = Coord::new(3, 0);
        assert_eq!(board.get(at), Err(GameError::InvalidCoordinate(at)));
        assert_eq!(
            board.set(at, Cell::Blocker),
            Err(GameError::InvalidCoordinate(at))
        );
    }

    #[test]
    fn diagram_roundtrip() {
        let text = "B . .\n. W .\n. . #\n";
        let board = Board::from_diagram(text).unwrap();
        assert_eq!(board.to_string(), text);
    }

    #[test]
    fn shift_wraps() {
        let board = Board::from_diagram("B . W\n. . .").unwrap();
        let shifted = board.shifted(Vector::new(1, 0)).unwrap();
        assert_eq!(shifted.to_string(), "W B .\n. . .\n");
        let down = board.shifted(Vector::new(0, -1)).unwrap();
        assert_eq!(down.to_string(), ". . .\nB . W\n");
    }

    #[test]
    fn shift_by_huge_vector() {
        let board = Board::from_diagram("B . W\n. . .").unwrap();
        let shifted = board.shifted(Vector::new(i32::MAX, i32::MIN)).unwrap();
        // i32::MAX = 1 (mod 3) and i32::MIN = 0 (mod 2).
        assert_eq!(shifted.to_string(), "W B .\n. . .\n");
    }

    #[test]
    fn deserialize_checks_cell_count() {
        let board = Board::from_diagram("B .\n. W").unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(serde_json::from_str::<Board>(&json).unwrap(), board);

        let short = r#"{"topology":{"type":"grid","width":5,"height":5},"cells":["empty"]}"#;
        let err = serde_json::from_str::<Board>(short).unwrap_err();
        assert!(err.to_string().contains("1 cells"));
    }

    #[test]
    fn shift_requires_grid() {
        let board = Board::new(Topology::hex(1));
        assert!(matches!(
            board.shifted(Vector::new(1, 0)),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn hex_board_addressing() {
        let mut board = Board::new(Topology::hex(1));
        assert_eq!(board.len(), 7);
        board.set(Coord::new(-1, 1), Cell::Stone(Color::WHITE)).unwrap();
        assert!(board.set(Coord::new(1, 1), Cell::Blocker).is_err());
        assert_eq!(board.to_string(), "-1,1 W\n");
    }
}
