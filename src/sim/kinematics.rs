//! Position, heading and speed of a moving entity

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Direction;

/// Kinematic state of a player or ghost.
///
/// `previous_position` changes exactly once per committed move, immediately
/// before `position` does. Wall corrections leave it alone so callers can see
/// that a move was attempted and reverted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    position: DVec2,
    previous_position: DVec2,
    direction: Direction,
    speed: f64,
}

impl KinematicState {
    pub fn new(position: DVec2, direction: Direction) -> Self {
        Self {
            position,
            previous_position: position,
            direction,
            speed: 0.0,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    #[inline]
    pub fn previous_position(&self) -> DVec2 {
        self.previous_position
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Where one step in `direction` would land. Does not mutate.
    #[inline]
    pub fn potential_position(&self, direction: Direction) -> DVec2 {
        self.position + direction.unit() * self.speed
    }

    /// Take one step in `direction`
    pub fn commit(&mut self, direction: Direction) {
        let next = self.potential_position(direction);
        self.previous_position = self.position;
        self.direction = direction;
        self.position = next;
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Teleport. Also clears the previous position so no revert is reported.
    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
        self.previous_position = position;
    }

    /// Push the entity back out of an obstacle after a committed move
    pub(crate) fn correct_position(&mut self, position: DVec2) {
        self.position = position;
    }
}
