//! Grid directions and axis-aligned bounding boxes
//!
//! World space has its origin at the maze's top-left corner with y growing
//! downward, so `Up` is the negative y axis.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// One of the four movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Enumeration order. Greedy ties resolve to the earliest entry.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit displacement for one step in this direction
    #[inline]
    pub fn unit(self) -> DVec2 {
        match self {
            Direction::Up => DVec2::new(0.0, -1.0),
            Direction::Down => DVec2::new(0.0, 1.0),
            Direction::Left => DVec2::new(-1.0, 0.0),
            Direction::Right => DVec2::new(1.0, 0.0),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Direction::Up => 0b0001,
            Direction::Down => 0b0010,
            Direction::Left => 0b0100,
            Direction::Right => 0b1000,
        }
    }
}

/// Small set of directions, iterated in enumeration order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const EMPTY: DirectionSet = DirectionSet(0);
    pub const ALL: DirectionSet = DirectionSet(0b1111);

    #[inline]
    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    pub fn intersection(self, other: DirectionSet) -> DirectionSet {
        DirectionSet(self.0 & other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = DirectionSet::EMPTY;
        for direction in iter {
            set.insert(direction);
        }
        set
    }
}

/// Rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top_left: DVec2,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(top_left: DVec2, width: f64, height: f64) -> Self {
        Self {
            top_left,
            width,
            height,
        }
    }

    #[inline]
    pub fn left_x(&self) -> f64 {
        self.top_left.x
    }

    #[inline]
    pub fn right_x(&self) -> f64 {
        self.top_left.x + self.width
    }

    #[inline]
    pub fn top_y(&self) -> f64 {
        self.top_left.y
    }

    #[inline]
    pub fn bottom_y(&self) -> f64 {
        self.top_left.y + self.height
    }

    pub fn middle_x(&self) -> f64 {
        self.top_left.x + self.width / 2.0
    }

    pub fn middle_y(&self) -> f64 {
        self.top_left.y + self.height / 2.0
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.middle_x(), self.middle_y())
    }

    /// Same box moved by `offset`
    pub fn translated(&self, offset: DVec2) -> Self {
        Self {
            top_left: self.top_left + offset,
            ..*self
        }
    }

    /// Strict overlap: boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        other.left_x() < self.right_x()
            && self.left_x() < other.right_x()
            && other.top_y() < self.bottom_y()
            && self.top_y() < other.bottom_y()
    }

    /// Overlap test for a box travelling in `heading`.
    ///
    /// The leading edge is inclusive, so touching whatever lies directly ahead
    /// counts as contact. Every other edge is exclusive, so sliding flush along
    /// a wall is not a collision.
    pub fn collides_with(&self, heading: Direction, other: &BoundingBox) -> bool {
        let x_overlap = match heading {
            Direction::Left => other.left_x() < self.right_x() && self.left_x() <= other.right_x(),
            Direction::Right => other.left_x() <= self.right_x() && self.left_x() < other.right_x(),
            Direction::Up | Direction::Down => {
                other.left_x() < self.right_x() && self.left_x() < other.right_x()
            }
        };
        let y_overlap = match heading {
            Direction::Up => other.top_y() < self.bottom_y() && self.top_y() <= other.bottom_y(),
            Direction::Down => other.top_y() <= self.bottom_y() && self.top_y() < other.bottom_y(),
            Direction::Left | Direction::Right => {
                other.top_y() < self.bottom_y() && self.top_y() < other.bottom_y()
            }
        };
        x_overlap && y_overlap
    }
}
