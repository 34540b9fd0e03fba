//! Match file loading.
//!
//! A match file is a TOML document naming the variant, its configuration
//! and the moves to replay:
//!
//! ```toml
//! variant = "parallel"
//! moves = ["B 2,2", "W 2,2", "B pass", "W pass"]
//! snapshot = "demo"
//!
//! [config]
//! collision = "ko"
//! board = { type = "grid", width = 9, height = 9 }
//! ```

use baduk_core::{MoveParseError, Submission};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a match file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the match file from disk.
    #[error("Failed to read match file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the match file as valid TOML.
    #[error("Failed to parse match file: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A move in the `moves` list is not valid notation.
    #[error("Invalid move #{index} '{text}': {source}")]
    InvalidMove {
        index: usize,
        text: String,
        source: MoveParseError,
    },
}

/// A match to replay.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MatchConfig {
    /// Variant identifier, e.g. `"standard"` or `"drift"`.
    pub variant: String,
    /// Variant configuration, passed to the engine as JSON. Missing means
    /// the variant's defaults.
    #[serde(default)]
    pub config: serde_json::Value,
    /// Moves in notation: `"B 3,4"`, `"W pass"`, `"2 resign"`.
    #[serde(default)]
    pub moves: Vec<String>,
    /// Snapshot id to resume from and save to.
    #[serde(default)]
    pub snapshot: Option<String>,
}

impl MatchConfig {
    /// Loads a match file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read, or
    /// [`ConfigError::ParseError`] if it is not a valid match file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parses the move list.
    pub fn submissions(&self) -> Result<Vec<Submission>, ConfigError> {
        self.moves
            .iter()
            .enumerate()
            .map(|(i, text)| {
                text.parse().map_err(|source| ConfigError::InvalidMove {
                    index: i + 1,
                    text: text.clone(),
                    source,
                })
            })
            .collect()
    }
}
