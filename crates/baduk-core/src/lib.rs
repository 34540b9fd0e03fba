//! Core types for Go variants.
//!
//! This crate provides the fundamental types used across the rules engine:
//! - [`Color`] and [`ColorSet`] for player representation
//! - [`Coord`] and [`Vector`] for board coordinates
//! - [`Cell`] for the content of a single board point
//! - [`Move`] and [`Submission`] for move representation
//! - Board diagram parsing

mod cell;
mod color;
mod coord;
mod diagram;
mod mov;

pub use cell::Cell;
pub use color::{Color, ColorSet};
pub use coord::{Coord, CoordParseError, Vector};
pub use diagram::{Diagram, DiagramError, DiagramParser};
pub use mov::{Move, MoveParseError, Submission};
