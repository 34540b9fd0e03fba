//! Board topologies.
//!
//! A topology decides which coordinates exist on a board, how they map to
//! dense point indices, and which points are adjacent. Point indices follow
//! coordinate order, so iterating indices visits coordinates in ascending
//! order on every topology.

use crate::GameError;
use baduk_core::{Coord, Vector};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Orthogonal directions on a rectangular grid.
const GRID_DIRECTIONS: [Vector; 4] = [
    Vector::new(0, -1),
    Vector::new(-1, 0),
    Vector::new(1, 0),
    Vector::new(0, 1),
];

/// The six axial directions on a hexagonal board.
const HEX_DIRECTIONS: [Vector; 6] = [
    Vector::new(0, -1),
    Vector::new(1, -1),
    Vector::new(-1, 0),
    Vector::new(1, 0),
    Vector::new(-1, 1),
    Vector::new(0, 1),
];

/// The shape of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Topology {
    /// A `width` x `height` rectangle with 4-neighbour adjacency.
    Grid { width: u16, height: u16 },
    /// A hexagon of hexagonal cells in axial coordinates, centred on the
    /// origin. A radius of `r` gives `3r(r+1)+1` points.
    Hex { radius: u16 },
    /// An arbitrary graph of labelled nodes.
    Graph(GraphTopology),
}

impl Topology {
    /// Creates a rectangular grid topology.
    pub const fn grid(width: u16, height: u16) -> Self {
        Topology::Grid { width, height }
    }

    /// Creates a hexagonal topology.
    pub const fn hex(radius: u16) -> Self {
        Topology::Hex { radius }
    }

    /// Returns the number of points on the board.
    pub fn len(&self) -> usize {
        match self {
            Topology::Grid { width, height } => *width as usize * *height as usize,
            Topology::Hex { radius } => {
                let r = *radius as usize;
                3 * r * (r + 1) + 1
            }
            Topology::Graph(graph) => graph.nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the grid dimensions, if this is a grid.
    pub fn grid_size(&self) -> Option<(u16, u16)> {
        match self {
            Topology::Grid { width, height } => Some((*width, *height)),
            _ => None,
        }
    }

    /// Returns true if the coordinate is a point of this board.
    #[inline]
    pub fn contains(&self, at: Coord) -> bool {
        self.index_of(at).is_some()
    }

    /// Maps a coordinate to its dense point index.
    pub fn index_of(&self, at: Coord) -> Option<usize> {
        match self {
            Topology::Grid { width, height } => {
                let (w, h) = (*width as i32, *height as i32);
                if (0..w).contains(&at.x) && (0..h).contains(&at.y) {
                    Some((at.y * w + at.x) as usize)
                } else {
                    None
                }
            }
            Topology::Hex { radius } => {
                // Widened so that extreme coordinates cannot overflow.
                let r = i64::from(*radius);
                let (q, row) = (i64::from(at.x), i64::from(at.y));
                if q.abs() > r || row.abs() > r || (q + row).abs() > r {
                    return None;
                }
                let before: i64 = (-r..row).map(|y| hex_row_len(r, y)).sum();
                usize::try_from(before + q - hex_row_start(r, row)).ok()
            }
            Topology::Graph(graph) => graph.nodes.binary_search(&at).ok(),
        }
    }

    /// Maps a point index back to its coordinate.
    pub fn coord_at(&self, index: usize) -> Option<Coord> {
        if index >= self.len() {
            return None;
        }
        match self {
            Topology::Grid { width, .. } => {
                let w = *width as usize;
                Some(Coord::new((index % w) as i32, (index / w) as i32))
            }
            Topology::Hex { radius } => {
                let r = i64::from(*radius);
                let mut rest = i64::try_from(index).ok()?;
                for row in -r..=r {
                    let len = hex_row_len(r, row);
                    if rest < len {
                        let q = i32::try_from(hex_row_start(r, row) + rest).ok()?;
                        return Some(Coord::new(q, i32::try_from(row).ok()?));
                    }
                    rest -= len;
                }
                None
            }
            Topology::Graph(graph) => graph.nodes.get(index).copied(),
        }
    }

    /// Returns every point in ascending coordinate order.
    pub fn points(&self) -> Vec<Coord> {
        (0..self.len()).filter_map(|i| self.coord_at(i)).collect()
    }

    /// Returns the points adjacent to `at`, in ascending order.
    ///
    /// Returns nothing for coordinates outside the board.
    pub fn neighbors(&self, at: Coord) -> Vec<Coord> {
        let directions: &[Vector] = match self {
            Topology::Grid { .. } => &GRID_DIRECTIONS,
            Topology::Hex { .. } => &HEX_DIRECTIONS,
            Topology::Graph(graph) => {
                return match graph.nodes.binary_search(&at) {
                    Ok(i) => graph.adjacency.get(i).map_or_else(Vec::new, |list| {
                        list.iter().filter_map(|&j| graph.nodes.get(j).copied()).collect()
                    }),
                    Err(_) => Vec::new(),
                };
            }
        };
        if !self.contains(at) {
            return Vec::new();
        }
        let mut result: Vec<Coord> = directions
            .iter()
            .map(|&v| at + v)
            .filter(|&c| self.contains(c))
            .collect();
        result.sort();
        result
    }

    /// Returns, per point index, the distance to the nearest board edge.
    ///
    /// Edge points have distance 0. On graph boards the edge is the set of
    /// nodes with fewer than the maximum number of neighbours.
    pub fn edge_distances(&self) -> Vec<u32> {
        match self {
            Topology::Grid { width, height } => {
                let (w, h) = (*width as i32, *height as i32);
                (0..self.len())
                    .filter_map(|i| self.coord_at(i))
                    .map(|c| c.x.min(c.y).min(w - 1 - c.x).min(h - 1 - c.y) as u32)
                    .collect()
            }
            Topology::Hex { radius } => (0..self.len())
                .filter_map(|i| self.coord_at(i))
                .map(|c| {
                    let ring = (c.x.abs() + c.y.abs() + (c.x + c.y).abs()) / 2;
                    (*radius as i32 - ring) as u32
                })
                .collect(),
            Topology::Graph(graph) => graph.edge_distances(),
        }
    }
}

/// Number of points in hex row `row` of a board with radius `r`.
fn hex_row_len(r: i64, row: i64) -> i64 {
    2 * r + 1 - row.abs()
}

/// Smallest `q` in hex row `row` of a board with radius `r`.
fn hex_row_start(r: i64, row: i64) -> i64 {
    (-r).max(-r - row)
}

/// A board described by explicit nodes and edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGraph")]
pub struct GraphTopology {
    /// Node labels, sorted.
    nodes: Vec<Coord>,
    /// Adjacency lists by node index, sorted.
    adjacency: Vec<Vec<usize>>,
}

impl GraphTopology {
    /// Builds a graph topology, rejecting duplicate nodes, self-loops and
    /// edges to undeclared nodes. Repeated edges are merged.
    pub fn new(mut nodes: Vec<Coord>, edges: &[(Coord, Coord)]) -> Result<Self, GameError> {
        if nodes.is_empty() {
            return Err(GameError::InvalidConfig("graph board has no nodes".into()));
        }
        nodes.sort();
        if let Some(pair) = nodes.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(GameError::InvalidConfig(format!(
                "duplicate graph node {}",
                pair[0]
            )));
        }

        let mut adjacency = vec![Vec::new(); nodes.len()];
        for &(a, b) in edges {
            if a == b {
                return Err(GameError::InvalidConfig(format!("self-loop at {}", a)));
            }
            let lookup = |c: Coord| {
                nodes
                    .binary_search(&c)
                    .map_err(|_| GameError::InvalidConfig(format!("edge to unknown node {}", c)))
            };
            let (i, j) = (lookup(a)?, lookup(b)?);
            if !adjacency[i].contains(&j) {
                adjacency[i].push(j);
                adjacency[j].push(i);
            }
        }
        for list in &mut adjacency {
            list.sort_unstable();
        }

        Ok(GraphTopology { nodes, adjacency })
    }

    pub fn nodes(&self) -> &[Coord] {
        &self.nodes
    }

    fn edge_distances(&self) -> Vec<u32> {
        let max_degree = self.adjacency.iter().map(Vec::len).max().unwrap_or(0);
        let mut distance: Vec<Option<u32>> = vec![None; self.nodes.len()];
        let mut queue = VecDeque::new();
        for (i, list) in self.adjacency.iter().enumerate() {
            if list.len() < max_degree {
                distance[i] = Some(0);
                queue.push_back(i);
            }
        }
        while let Some(i) = queue.pop_front() {
            let next = distance[i].unwrap_or(0) + 1;
            for &j in &self.adjacency[i] {
                if distance[j].is_none() {
                    distance[j] = Some(next);
                    queue.push_back(j);
                }
            }
        }
        // Regular graphs have no edge; every node sits on it.
        distance.into_iter().map(|d| d.unwrap_or(0)).collect()
    }
}

/// A graph as read from a snapshot, before its structure is checked.
#[derive(Deserialize)]
struct RawGraph {
    nodes: Vec<Coord>,
    adjacency: Vec<Vec<usize>>,
}

impl TryFrom<RawGraph> for GraphTopology {
    type Error = String;

    fn try_from(raw: RawGraph) -> Result<Self, String> {
        let RawGraph { nodes, adjacency } = raw;
        if nodes.is_empty() {
            return Err("graph board has no nodes".into());
        }
        if nodes.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err("graph nodes are not strictly ascending".into());
        }
        if adjacency.len() != nodes.len() {
            return Err(format!(
                "{} adjacency lists for {} graph nodes",
                adjacency.len(),
                nodes.len()
            ));
        }
        for (i, list) in adjacency.iter().enumerate() {
            if list.windows(2).any(|pair| pair[0] >= pair[1]) {
                return Err(format!("adjacency of node {} is not strictly ascending", i));
            }
            for &j in list {
                let mirrored = adjacency
                    .get(j)
                    .is_some_and(|back| back.binary_search(&i).is_ok());
                if j == i || !mirrored {
                    return Err(format!("invalid graph edge {} -> {}", i, j));
                }
            }
        }
        Ok(GraphTopology { nodes, adjacency })
    }
}
