//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, and only while building a level
//! - Stable iteration order (maze order for movers, row-major for pellets)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod geometry;
pub mod ghost;
pub mod kinematics;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{Contact, detect_contacts, resolve_wall_collision};
pub use entity::{DynamicEntity, Layer, Pellet, RenderView, Renderable, Visual, Wall, WallShape};
pub use geometry::{BoundingBox, Direction, DirectionSet};
pub use ghost::{Ghost, GhostMode, ModeTable};
pub use kinematics::KinematicState;
pub use player::{Player, PlayerSprite};
pub use state::{Level, ModeScheduler};
pub use tick::{TickReport, tick};
