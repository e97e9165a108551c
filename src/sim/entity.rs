//! Entity variants and their read-only render export
//!
//! The set of entity kinds is closed: walls and pellets are static, the
//! player and ghosts are dynamic. Behaviour is dispatched on the variant tag.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::resolve_wall_collision;
use super::geometry::{BoundingBox, Direction, DirectionSet};
use super::ghost::Ghost;
use super::kinematics::KinematicState;
use super::player::{Player, PlayerSprite};

/// Depth ordering for presentation (drawn back to front)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Background,
    Foreground,
}

/// Wall tile shapes (sprite selection only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallShape {
    Horizontal,
    Vertical,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

/// A static obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub bounds: BoundingBox,
    pub shape: WallShape,
    /// Drawn, but entities move through it
    pub passable: bool,
}

/// A collectable worth `points` the first time the player touches it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pellet {
    pub id: u32,
    pub bounds: BoundingBox,
    pub points: u32,
    collected: bool,
}

impl Pellet {
    pub fn new(id: u32, bounds: BoundingBox, points: u32) -> Self {
        Self {
            id,
            bounds,
            points,
            collected: false,
        }
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Mark consumed. Yields the points only on the first call.
    pub fn collect(&mut self) -> Option<u32> {
        if self.collected {
            return None;
        }
        self.collected = true;
        Some(self.points)
    }
}

/// A movable entity
#[derive(Debug, Clone)]
pub enum DynamicEntity {
    Player(Player),
    Ghost(Ghost),
}

impl DynamicEntity {
    pub fn kinematics(&self) -> &KinematicState {
        match self {
            DynamicEntity::Player(player) => player.kinematics(),
            DynamicEntity::Ghost(ghost) => ghost.kinematics(),
        }
    }

    pub fn position(&self) -> DVec2 {
        self.kinematics().position()
    }

    pub fn size(&self) -> DVec2 {
        match self {
            DynamicEntity::Player(player) => player.size(),
            DynamicEntity::Ghost(ghost) => ghost.size(),
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        match self {
            DynamicEntity::Player(player) => player.bounds(),
            DynamicEntity::Ghost(ghost) => ghost.bounds(),
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, DynamicEntity::Player(_))
    }

    pub fn is_ghost(&self) -> bool {
        matches!(self, DynamicEntity::Ghost(_))
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            DynamicEntity::Player(player) => Some(player),
            DynamicEntity::Ghost(_) => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            DynamicEntity::Player(player) => Some(player),
            DynamicEntity::Ghost(_) => None,
        }
    }

    pub fn as_ghost(&self) -> Option<&Ghost> {
        match self {
            DynamicEntity::Ghost(ghost) => Some(ghost),
            DynamicEntity::Player(_) => None,
        }
    }

    pub fn as_ghost_mut(&mut self) -> Option<&mut Ghost> {
        match self {
            DynamicEntity::Ghost(ghost) => Some(ghost),
            DynamicEntity::Player(_) => None,
        }
    }

    pub fn possible_directions(&self) -> DirectionSet {
        match self {
            DynamicEntity::Player(player) => player.possible_directions(),
            DynamicEntity::Ghost(ghost) => ghost.possible_directions(),
        }
    }

    pub fn set_possible_directions(&mut self, directions: DirectionSet) {
        match self {
            DynamicEntity::Player(player) => player.set_possible_directions(directions),
            DynamicEntity::Ghost(ghost) => ghost.set_possible_directions(directions),
        }
    }

    /// Directional overlap test using the entity's current heading
    pub fn collides_with(&self, other: &BoundingBox) -> bool {
        self.bounds().collides_with(self.kinematics().direction(), other)
    }

    /// One movement step: the ghost decides, the player follows its intent
    pub fn update(&mut self, player_position: Option<DVec2>) {
        match self {
            DynamicEntity::Player(player) => {
                player.update();
            }
            DynamicEntity::Ghost(ghost) => {
                ghost.update(player_position);
            }
        }
    }

    /// Push back out of a wall this entity ran into
    pub fn resolve_against(&mut self, wall: &BoundingBox) {
        let size = self.size();
        let kinematics = match self {
            DynamicEntity::Player(player) => player.kinematics_mut(),
            DynamicEntity::Ghost(ghost) => ghost.kinematics_mut(),
        };
        resolve_wall_collision(kinematics, size, wall);
    }

    pub fn reset(&mut self) {
        match self {
            DynamicEntity::Player(player) => player.reset(),
            DynamicEntity::Ghost(ghost) => ghost.reset(),
        }
    }
}

/// How a renderer should draw an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Visual {
    Wall { shape: WallShape },
    Pellet,
    Player { sprite: PlayerSprite },
    Ghost { direction: Direction },
}

/// Read-only snapshot of one live entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderView {
    pub bounds: BoundingBox,
    pub layer: Layer,
    pub visual: Visual,
}

/// Anything that shows up in the render set
pub trait Renderable {
    fn bounds(&self) -> BoundingBox;
    fn layer(&self) -> Layer;
    fn visual(&self) -> Visual;

    fn render_view(&self) -> RenderView {
        RenderView {
            bounds: self.bounds(),
            layer: self.layer(),
            visual: self.visual(),
        }
    }
}

impl Renderable for Wall {
    fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    fn layer(&self) -> Layer {
        Layer::Background
    }

    fn visual(&self) -> Visual {
        Visual::Wall { shape: self.shape }
    }
}

impl Renderable for Pellet {
    fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    fn layer(&self) -> Layer {
        Layer::Background
    }

    fn visual(&self) -> Visual {
        Visual::Pellet
    }
}

impl Renderable for DynamicEntity {
    fn bounds(&self) -> BoundingBox {
        DynamicEntity::bounds(self)
    }

    fn layer(&self) -> Layer {
        Layer::Foreground
    }

    fn visual(&self) -> Visual {
        match self {
            DynamicEntity::Player(player) => Visual::Player {
                sprite: player.sprite(),
            },
            DynamicEntity::Ghost(ghost) => Visual::Ghost {
                direction: ghost.direction(),
            },
        }
    }
}
