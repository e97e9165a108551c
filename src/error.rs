//! Construction-time errors
//!
//! Everything that can go wrong happens while loading configuration or
//! building a level. Blocked movement and lost lives are ordinary outcomes.

use std::path::PathBuf;

use crate::sim::GhostMode;

pub type GameResult<T> = Result<T, GameError>;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("configuration has no levels")]
    NoLevels,

    #[error("numLives must be at least 1")]
    NoLives,

    #[error("level {level}: {field} must be positive and finite, got {value}")]
    InvalidSpeed {
        level: usize,
        field: &'static str,
        value: f64,
    },

    #[error("level {level}: {mode:?} duration must be at least one tick")]
    ZeroModeLength { level: usize, mode: GhostMode },

    #[error("no maze supplied (set `map` or `mapRows`)")]
    MissingMap,

    #[error("maze is empty")]
    EmptyMaze,

    #[error("maze has no controllable player")]
    MissingPlayer,

    #[error("maze has {0} player spawns, expected exactly one")]
    MultiplePlayers(usize),
}
