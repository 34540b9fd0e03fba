//! Board coordinate and vector representation.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;

/// A point on a board.
///
/// Grid boards use column `x` and row `y` counted from the top-left corner.
/// Hexagonal boards use axial coordinates `(q, r)` stored as `(x, y)`.
/// Graph boards use whatever labels the configuration declares.
///
/// Coordinates order row-major: by `y`, then by `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Returns the coordinate displaced by `v`.
    #[inline]
    pub const fn offset(self, v: Vector) -> Self {
        Coord::new(self.x + v.dx, self.y + v.dy)
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add<Vector> for Coord {
    type Output = Coord;

    fn add(self, v: Vector) -> Coord {
        self.offset(v)
    }
}

impl Sub for Coord {
    type Output = Vector;

    fn sub(self, other: Coord) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Errors that can occur when parsing a coordinate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoordParseError {
    #[error("invalid coordinate '{0}': expected 'x,y'")]
    Malformed(String),

    #[error("invalid coordinate component '{0}'")]
    InvalidComponent(String),
}

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .trim()
            .split_once(',')
            .ok_or_else(|| CoordParseError::Malformed(s.to_string()))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<i32>()
                .map_err(|_| CoordParseError::InvalidComponent(part.trim().to_string()))
        };
        Ok(Coord::new(parse(x)?, parse(y)?))
    }
}

/// A displacement between two coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vector {
    pub dx: i32,
    pub dy: i32,
}

impl Vector {
    pub const ZERO: Vector = Vector::new(0, 0);

    #[inline]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Vector { dx, dy }
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Returns the vector pointing the other way.
    #[inline]
    pub const fn reversed(self) -> Self {
        Vector::new(-self.dx, -self.dy)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        Vector::new(self.dx + other.dx, self.dy + other.dy)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+}, {:+})", self.dx, self.dy)
    }
}
