//! Rules engine for Go variants.
//!
//! This crate provides:
//! - [`Board`] - Point contents over a grid, hexagonal or graph [`Topology`]
//! - Chain and liberty analysis ([`chain`])
//! - [`SuperkoDetector`] - Full-history positional superko
//! - [`RuleModule`] - Trait implemented by each variant (standard, parallel,
//!   drift, quantum, pyramid)
//! - [`Game`] - Dispatcher that builds a variant from an identifier and a
//!   JSON configuration, with snapshot save and restore
//! - Area scoring with uniform or pyramid weights
//!
//! # Architecture
//!
//! Each variant owns its [`GameState`]. A move is first validated, which
//! computes its complete effect on scratch copies of the boards, and only
//! then applied. Rejected moves therefore never change a game. The engine
//! performs no I/O and holds no global state; persistence and transport
//! belong to the caller.
//!
//! # Example
//!
//! ```
//! use baduk_engine::{create_game, GameEvent};
//! use baduk_core::{Color, Coord, Move};
//! use serde_json::json;
//!
//! let mut game = create_game("baduk", &json!({"board": {"type": "grid", "width": 9, "height": 9}})).unwrap();
//! game.submit_move(Color::BLACK, Move::Place(Coord::new(2, 2))).unwrap();
//! game.submit_move(Color::WHITE, Move::Pass).unwrap();
//! let events = game.submit_move(Color::BLACK, Move::Pass).unwrap();
//! assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));
//! println!("{}", game.state().board());
//! ```

mod board;
pub mod chain;
pub mod config;
mod error;
mod game;
pub mod rules;
mod score;
mod state;
mod superko;
mod topology;

pub use board::Board;
pub use chain::{captured_chains, chain_of, dead_chains, Chain};
pub use error::{GameError, IllegalReason, SnapshotError};
pub use game::{create_game, Game, VariantKind};
pub use rules::RuleModule;
pub use score::{area_score, Score, Weighting};
pub use state::{GameEvent, GameState, Outcome, Phase, Turn};
pub use superko::{StateKey, SuperkoDetector};
pub use topology::{GraphTopology, Topology};
