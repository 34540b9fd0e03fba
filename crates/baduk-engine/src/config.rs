//! Variant configuration.
//!
//! Configurations arrive as JSON values, are decoded into typed structs and
//! validated before any board is allocated. Missing fields take defaults;
//! unknown fields and out-of-range values are [`GameError::InvalidConfig`].

use crate::topology::GraphTopology;
use crate::{GameError, Topology};
use baduk_core::{Coord, Vector};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Grid side length bounds.
pub const GRID_SIZE: std::ops::RangeInclusive<u16> = 2..=52;
/// Hex radius bounds.
pub const HEX_RADIUS: std::ops::RangeInclusive<u16> = 1..=25;
/// Largest accepted komi magnitude.
pub const MAX_KOMI: f64 = 150.0;
/// Player count bounds for simultaneous play.
pub const PLAYERS: std::ops::RangeInclusive<u8> = 2..=16;

/// Board shape as written in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardConfig {
    Grid {
        width: u16,
        height: u16,
    },
    Hex {
        radius: u16,
    },
    Graph {
        nodes: Vec<Coord>,
        edges: Vec<(Coord, Coord)>,
    },
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig::Grid {
            width: 19,
            height: 19,
        }
    }
}

impl BoardConfig {
    /// Validates the shape and builds its topology.
    pub fn build(&self) -> Result<Topology, GameError> {
        match self {
            BoardConfig::Grid { width, height } => {
                if !GRID_SIZE.contains(width) || !GRID_SIZE.contains(height) {
                    return Err(GameError::InvalidConfig(format!(
                        "grid size {}x{} outside {}..={}",
                        width,
                        height,
                        GRID_SIZE.start(),
                        GRID_SIZE.end()
                    )));
                }
                Ok(Topology::grid(*width, *height))
            }
            BoardConfig::Hex { radius } => {
                if !HEX_RADIUS.contains(radius) {
                    return Err(GameError::InvalidConfig(format!(
                        "hex radius {} outside {}..={}",
                        radius,
                        HEX_RADIUS.start(),
                        HEX_RADIUS.end()
                    )));
                }
                Ok(Topology::hex(*radius))
            }
            BoardConfig::Graph { nodes, edges } => {
                Ok(Topology::Graph(GraphTopology::new(nodes.clone(), edges)?))
            }
        }
    }
}

/// Configuration shared by the turn-based variants (standard, quantum,
/// pyramid).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StandardConfig {
    pub board: BoardConfig,
    pub komi: f64,
    pub allow_suicide: bool,
}

impl Default for StandardConfig {
    fn default() -> Self {
        StandardConfig {
            board: BoardConfig::default(),
            komi: 6.5,
            allow_suicide: false,
        }
    }
}

impl StandardConfig {
    pub fn validate(&self) -> Result<Topology, GameError> {
        validate_komi(self.komi)?;
        self.board.build()
    }
}

pub type QuantumConfig = StandardConfig;
pub type PyramidConfig = StandardConfig;

/// What happens when several players pick the same point in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The point receives one stone carrying every contributing color.
    #[default]
    Merge,
    /// The point stays empty.
    Pass,
    /// The point is blocked by a neutral marker for one round.
    Ko,
}

/// Configuration for simultaneous-move games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallelConfig {
    pub board: BoardConfig,
    pub komi: f64,
    pub allow_suicide: bool,
    pub players: u8,
    pub collision: CollisionPolicy,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        ParallelConfig {
            board: BoardConfig::default(),
            komi: 0.0,
            allow_suicide: false,
            players: 2,
            collision: CollisionPolicy::default(),
        }
    }
}

impl ParallelConfig {
    pub fn validate(&self) -> Result<Topology, GameError> {
        validate_komi(self.komi)?;
        if !PLAYERS.contains(&self.players) {
            return Err(GameError::InvalidConfig(format!(
                "player count {} outside {}..={}",
                self.players,
                PLAYERS.start(),
                PLAYERS.end()
            )));
        }
        self.board.build()
    }
}

/// Configuration for drifting-board games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriftConfig {
    pub board: BoardConfig,
    pub komi: f64,
    pub allow_suicide: bool,
    pub shift: Vector,
}

impl Default for DriftConfig {
    fn default() -> Self {
        DriftConfig {
            board: BoardConfig::default(),
            komi: 6.5,
            allow_suicide: false,
            shift: Vector::new(1, 0),
        }
    }
}

impl DriftConfig {
    pub fn validate(&self) -> Result<Topology, GameError> {
        validate_komi(self.komi)?;
        if self.shift.is_zero() {
            return Err(GameError::InvalidConfig("drift shift must be non-zero".into()));
        }
        let topology = self.board.build()?;
        if topology.grid_size().is_none() {
            return Err(GameError::InvalidConfig("drift requires a grid board".into()));
        }
        Ok(topology)
    }
}

fn validate_komi(komi: f64) -> Result<(), GameError> {
    if komi.is_finite() && komi.abs() <= MAX_KOMI {
        Ok(())
    } else {
        Err(GameError::InvalidConfig(format!(
            "komi {} outside -{max}..={max}",
            komi,
            max = MAX_KOMI
        )))
    }
}

/// Decodes a configuration value. `null` yields the defaults.
pub fn decode<T: DeserializeOwned + Default>(value: &serde_json::Value) -> Result<T, GameError> {
    if value.is_null() {
        return Ok(T::default());
    }
    T::deserialize(value).map_err(|e| GameError::InvalidConfig(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_from_null_and_empty() {
        let a: StandardConfig = decode(&serde_json::Value::Null).unwrap();
        let b: StandardConfig = decode(&json!({})).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.komi, 6.5);
        assert_eq!(a.validate().unwrap(), Topology::grid(19, 19));
    }

    #[test]
    fn board_shapes() {
        let config: StandardConfig =
            decode(&json!({"board": {"type": "hex", "radius": 3}})).unwrap();
        assert_eq!(config.validate().unwrap(), Topology::hex(3));

        let config: StandardConfig = decode(&json!({
            "board": {
                "type": "graph",
                "nodes": [{"x": 0, "y": 0}, {"x": 1, "y": 0}],
                "edges": [[{"x": 0, "y": 0}, {"x": 1, "y": 0}]]
            }
        }))
        .unwrap();
        assert_eq!(config.validate().unwrap().len(), 2);
    }

    #[test]
    fn rejects_bad_dimensions() {
        let config: StandardConfig =
            decode(&json!({"board": {"type": "grid", "width": 1, "height": 9}})).unwrap();
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let config: StandardConfig =
            decode(&json!({"board": {"type": "hex", "radius": 0}})).unwrap();
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_bad_komi() {
        let config: StandardConfig = decode(&json!({"komi": 500.0})).unwrap();
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_unknown_fields_and_policies() {
        assert!(matches!(
            decode::<StandardConfig>(&json!({"komi": 6.5, "handicap": 2})),
            Err(GameError::InvalidConfig(_))
        ));
        assert!(matches!(
            decode::<ParallelConfig>(&json!({"collision": "explode"})),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn parallel_options() {
        let config: ParallelConfig = decode(&json!({"players": 4, "collision": "ko"})).unwrap();
        assert_eq!(config.collision, CollisionPolicy::Ko);
        assert!(config.validate().is_ok());

        let config: ParallelConfig = decode(&json!({"players": 1})).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn drift_options() {
        let config: DriftConfig = decode(&json!({"shift": {"dx": 0, "dy": -2}})).unwrap();
        assert_eq!(config.shift, Vector::new(0, -2));
        assert!(config.validate().is_ok());

        let config: DriftConfig = decode(&json!({"shift": {"dx": 0, "dy": 0}})).unwrap();
        assert!(config.validate().is_err());

        let config: DriftConfig = decode(&json!({"board": {"type": "hex", "radius": 2}})).unwrap();
        assert!(config.validate().is_err());
    }
}
