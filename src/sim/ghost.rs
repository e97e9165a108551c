//! Ghost agent: pursuit modes and greedy direction selection

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{BoundingBox, Direction, DirectionSet};
use super::kinematics::KinematicState;

/// Ghost pursuit mode. Cycles SCATTER -> CHASE -> SCATTER ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostMode {
    /// Head for the ghost's home corner
    Scatter,
    /// Head for the player
    Chase,
}

impl GhostMode {
    pub fn next(self) -> Self {
        match self {
            GhostMode::Scatter => GhostMode::Chase,
            GhostMode::Chase => GhostMode::Scatter,
        }
    }
}

/// One value per pursuit mode (speeds, durations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeTable<T> {
    pub scatter: T,
    pub chase: T,
}

impl<T: Copy> ModeTable<T> {
    pub fn new(scatter: T, chase: T) -> Self {
        Self { scatter, chase }
    }

    #[inline]
    pub fn get(&self, mode: GhostMode) -> T {
        match mode {
            GhostMode::Scatter => self.scatter,
            GhostMode::Chase => self.chase,
        }
    }
}

/// An autonomous pursuer
#[derive(Debug, Clone)]
pub struct Ghost {
    pub id: u32,
    kinematics: KinematicState,
    size: DVec2,
    start_position: DVec2,
    start_direction: Direction,
    home_corner: DVec2,
    mode: GhostMode,
    speeds: ModeTable<f64>,
    possible_directions: DirectionSet,
}

impl Ghost {
    /// New ghost in SCATTER, moving at its SCATTER speed
    pub fn new(
        id: u32,
        position: DVec2,
        size: DVec2,
        direction: Direction,
        home_corner: DVec2,
        speeds: ModeTable<f64>,
    ) -> Self {
        let mode = GhostMode::Scatter;
        Self {
            id,
            kinematics: KinematicState::new(position, direction).with_speed(speeds.get(mode)),
            size,
            start_position: position,
            start_direction: direction,
            home_corner,
            mode,
            speeds,
            possible_directions: DirectionSet::EMPTY,
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

    pub fn mode(&self) -> GhostMode {
        self.mode
    }

    pub fn speed(&self) -> f64 {
        self.kinematics.speed()
    }

    pub fn home_corner(&self) -> DVec2 {
        self.home_corner
    }

    pub fn set_home_corner(&mut self, corner: DVec2) {
        self.home_corner = corner;
    }

    pub fn possible_directions(&self) -> DirectionSet {
        self.possible_directions
    }

    pub fn set_possible_directions(&mut self, directions: DirectionSet) {
        self.possible_directions = directions;
    }

    /// Switch mode. Speed always follows the mode.
    pub fn set_mode(&mut self, mode: GhostMode) {
        self.mode = mode;
        self.kinematics.set_speed(self.speeds.get(mode));
    }

    pub fn set_speeds(&mut self, speeds: ModeTable<f64>) {
        self.speeds = speeds;
        self.kinematics.set_speed(speeds.get(self.mode));
    }

    /// Where the ghost is heading this tick
    pub fn target_location(&self, player_position: Option<DVec2>) -> DVec2 {
        match (self.mode, player_position) {
            (GhostMode::Chase, Some(player)) => player,
            _ => self.home_corner,
        }
    }

    /// Pick the direction for this tick without moving.
    ///
    /// Returns `None` when nothing is available, in which case the ghost
    /// stays put this tick.
    pub fn decide(&self, player_position: Option<DVec2>) -> Option<Direction> {
        let available = DirectionSet::ALL.intersection(self.possible_directions);
        let target = self.target_location(player_position);

        let mut choice = nearest_direction(&self.kinematics, available, target)?;
        if self.kinematics.potential_position(choice) == self.kinematics.position() {
            // Nominally open but going nowhere: drop it and search once more
            let mut remaining = available;
            remaining.remove(choice);
            choice = nearest_direction(&self.kinematics, remaining, target)
                .unwrap_or(self.kinematics.direction());
        }

        log::trace!(
            "ghost {} {:?}: available {:?} target {} -> {:?}",
            self.id,
            self.mode,
            available.iter().collect::<Vec<_>>(),
            target,
            choice
        );
        Some(choice)
    }

    /// Decide and commit one step. Returns the direction moved, if any.
    pub fn update(&mut self, player_position: Option<DVec2>) -> Option<Direction> {
        let choice = self.decide(player_position)?;
        self.kinematics.commit(choice);
        Some(choice)
    }

    /// Back to the spawn tile in place. Mode and speed are kept.
    pub fn reset(&mut self) {
        self.kinematics.set_position(self.start_position);
        self.kinematics.set_direction(self.start_direction);
        self.possible_directions = DirectionSet::EMPTY;
    }
}

/// Candidate whose potential position is closest to `target`.
/// Ties keep the first candidate in enumeration order.
fn nearest_direction(
    kinematics: &KinematicState,
    candidates: DirectionSet,
    target: DVec2,
) -> Option<Direction> {
    let mut best: Option<(Direction, f64)> = None;
    for direction in candidates.iter() {
        let distance = kinematics.potential_position(direction).distance(target);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((direction, distance)),
        }
    }
    best.map(|(direction, _)| direction)
}
