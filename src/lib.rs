//! Maze Chase - a tick-driven maze pursuit simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, ghost AI, collisions, level state)
//! - `engine`: Level lifecycle, warm-up phase and observer fan-out
//! - `maze`: Maze layout parsing and the grid oracle
//! - `config`: Data-driven level tuning loaded from JSON

pub mod config;
pub mod engine;
pub mod error;
pub mod maze;
pub mod sim;

pub use config::{GameConfig, LevelConfig};
pub use engine::{Engine, EnginePhase, GameObserver, GameSnapshot, ObserverId};
pub use error::{GameError, GameResult};
pub use maze::{GridOracle, Maze};

/// Game configuration constants
pub mod consts {
    /// Tick period the external driver rate-limits to (~29 Hz)
    pub const TICK_MS: u64 = 34;

    /// Side length of one maze tile, in world units
    pub const TILE_SIZE: f64 = 16.0;
    /// Player and ghost boxes fill exactly one tile
    pub const ACTOR_SIZE: f64 = TILE_SIZE;
    /// Pellet box side, centred in its tile
    pub const PELLET_SIZE: f64 = 4.0;
    /// Default points awarded per pellet
    pub const PELLET_POINTS: u32 = 10;

    /// Ticks spent in the READY state before a level starts running
    pub const READY_TICKS: u32 = 100;
    /// Player mouth open/closed swap period (ticks)
    pub const PLAYER_SPRITE_SWAP_TICKS: u32 = 8;
    /// Distance the grid oracle nudges a box to test a direction
    pub const DIRECTION_PROBE: f64 = 1.0;
}
