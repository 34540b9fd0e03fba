//! Baduk Arena - replays Go variant matches from match files.
//!
//! This crate is a caller of the rules engine: it loads a match description,
//! creates the game through the dispatcher, replays the recorded moves and
//! persists the resulting game as a JSON snapshot.
//!
//! # Modules
//!
//! - [`config`] - TOML match files
//! - [`runner`] - Move replay and match reports
//! - [`store`] - Snapshot persistence behind the [`store::SnapshotStore`] trait

pub mod config;
pub mod runner;
pub mod store;
