//! Area scoring.
//!
//! Every stone scores its point's weight for its color; a multicolor stone
//! scores for each contributor. Each connected region of empty points (and
//! blockers) bordered by exactly one color scores for that color. Komi is
//! added to White.

use crate::Board;
use baduk_core::{Cell, Color, ColorSet};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How much each point is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Every point is worth 1.
    #[default]
    Uniform,
    /// A point is worth 1 plus its distance to the nearest edge.
    Pyramid,
}

impl Weighting {
    /// Returns the weight of every point of `board`, by point index.
    pub fn weights(self, board: &Board) -> Vec<f64> {
        match self {
            Weighting::Uniform => vec![1.0; board.len()],
            Weighting::Pyramid => board
                .topology()
                .edge_distances()
                .into_iter()
                .map(|d| 1.0 + d as f64)
                .collect(),
        }
    }
}

/// Per-color totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Total by color index, komi included.
    pub totals: Vec<f64>,
    pub komi: f64,
}

impl Score {
    /// Returns the total for a color (0 for colors outside the game).
    pub fn total(&self, color: Color) -> f64 {
        self.totals.get(color.index()).copied().unwrap_or(0.0)
    }

    /// Returns the single highest-scoring color, or `None` on a tie.
    pub fn winner(&self) -> Option<Color> {
        let best = self.totals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut leaders = self
            .totals
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t == best)
            .map(|(i, _)| i);
        match (leaders.next(), leaders.next()) {
            (Some(i), None) => Color::new(i as u8),
            _ => None,
        }
    }

    /// Returns the winner's lead over the runner-up.
    pub fn margin(&self) -> f64 {
        let mut sorted = self.totals.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        match sorted.as_slice() {
            [first, second, ..] => first - second,
            _ => 0.0,
        }
    }

    /// Averages several scores component-wise.
    pub fn mean(scores: &[Score]) -> Score {
        let players = scores.iter().map(|s| s.totals.len()).max().unwrap_or(0);
        let n = scores.len().max(1) as f64;
        let totals = (0..players)
            .map(|i| scores.iter().filter_map(|s| s.totals.get(i)).sum::<f64>() / n)
            .collect();
        Score {
            totals,
            komi: scores.first().map(|s| s.komi).unwrap_or(0.0),
        }
    }
}

/// Computes the area score of `board` for `players` colors.
pub fn area_score(board: &Board, weighting: Weighting, players: usize, komi: f64) -> Score {
    let weights = weighting.weights(board);
    let mut totals = vec![0.0; players];
    let mut visited = vec![false; board.len()];

    for (i, (at, cell)) in board.cells().enumerate() {
        if cell.is_stone() {
            for color in cell.colors().iter() {
                if let Some(total) = totals.get_mut(color.index()) {
                    *total += weights[i];
                }
            }
            continue;
        }
        if visited[i] {
            continue;
        }

        // Flood the region of non-stone points and collect its border.
        let mut region_weight = 0.0;
        let mut border = ColorSet::EMPTY;
        let mut queue = VecDeque::from([at]);
        visited[i] = true;
        while let Some(current) = queue.pop_front() {
            let Ok(ci) = board.index_of(current) else {
                continue;
            };
            region_weight += weights[ci];
            for neighbor in board.neighbors(current) {
                let Ok(ni) = board.index_of(neighbor) else {
                    continue;
                };
                match board.get(neighbor) {
                    Ok(Cell::Empty | Cell::Blocker) if !visited[ni] => {
                        visited[ni] = true;
                        queue.push_back(neighbor);
                    }
                    Ok(cell) => border = border.union(cell.colors()),
                    Err(_) => {}
                }
            }
        }
        if let Some(owner) = border.only() {
            if let Some(total) = totals.get_mut(owner.index()) {
                *total += region_weight;
            }
        }
    }

    if let Some(white) = totals.get_mut(Color::WHITE.index()) {
        *white += komi;
    }
    Score { totals, komi }
}
