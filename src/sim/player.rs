//! The player: queued intent, kinematics and sprite bookkeeping

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{BoundingBox, Direction, DirectionSet};
use super::kinematics::KinematicState;
use crate::consts::PLAYER_SPRITE_SWAP_TICKS;

/// Sprite key a renderer should draw for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerSprite {
    Up,
    Down,
    Left,
    Right,
    Closed,
}

impl From<Direction> for PlayerSprite {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => PlayerSprite::Up,
            Direction::Down => PlayerSprite::Down,
            Direction::Left => PlayerSprite::Left,
            Direction::Right => PlayerSprite::Right,
        }
    }
}

/// The controllable entity. Purely reactive: it only moves toward its queued
/// direction, and only when the grid allows it.
#[derive(Debug, Clone)]
pub struct Player {
    kinematics: KinematicState,
    size: DVec2,
    start_position: DVec2,
    start_direction: Direction,
    queued_direction: Option<Direction>,
    possible_directions: DirectionSet,
    mouth_open: bool,
    visual_ticks: u32,
}

impl Player {
    pub fn new(position: DVec2, size: DVec2, direction: Direction) -> Self {
        Self {
            kinematics: KinematicState::new(position, direction),
            size,
            start_position: position,
            start_direction: direction,
            queued_direction: None,
            possible_directions: DirectionSet::EMPTY,
            mouth_open: true,
            visual_ticks: 0,
        }
    }

    pub fn kinematics(&self) -> &KinematicState {
        &self.kinematics
    }

    pub(crate) fn kinematics_mut(&mut self) -> &mut KinematicState {
        &mut self.kinematics
    }

    pub fn position(&self) -> DVec2 {
        self.kinematics.position()
    }

    pub fn direction(&self) -> Direction {
        self.kinematics.direction()
    }

    pub fn size(&self) -> DVec2 {
        self.size
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.kinematics.position(), self.size.x, self.size.y)
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.kinematics.set_speed(speed);
    }

    /// Record a movement command. It stays queued until replaced.
    pub fn queue_direction(&mut self, direction: Direction) {
        self.queued_direction = Some(direction);
    }

    pub fn queued_direction(&self) -> Option<Direction> {
        self.queued_direction
    }

    pub fn possible_directions(&self) -> DirectionSet {
        self.possible_directions
    }

    pub fn set_possible_directions(&mut self, directions: DirectionSet) {
        self.possible_directions = directions;
    }

    /// Step toward the queued direction if the grid allows it.
    /// Returns whether the player moved.
    pub fn update(&mut self) -> bool {
        match self.queued_direction {
            Some(direction) if self.possible_directions.contains(direction) => {
                self.kinematics.commit(direction);
                true
            }
            _ => false,
        }
    }

    /// Advance the mouth animation by one tick
    pub fn advance_visual(&mut self) {
        self.visual_ticks = self.visual_ticks.wrapping_add(1);
        if self.visual_ticks % PLAYER_SPRITE_SWAP_TICKS == 0 {
            self.mouth_open = !self.mouth_open;
        }
    }

    pub fn sprite(&self) -> PlayerSprite {
        if self.mouth_open {
            self.kinematics.direction().into()
        } else {
            PlayerSprite::Closed
        }
    }

    /// Back to the spawn tile facing the spawn direction, intent cleared
    pub fn reset(&mut self) {
        self.kinematics.set_position(self.start_position);
        self.kinematics.set_direction(self.start_direction);
        self.queued_direction = None;
        self.possible_directions = DirectionSet::EMPTY;
    }
}
