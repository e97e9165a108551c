//! Maze layout parsing and the grid oracle
//!
//! A maze is a block of text, one glyph per tile. The simulation never reads
//! the text itself: it gets wall and pellet entities, spawn points and
//! corner targets from here, and asks the [`GridOracle`] which directions
//! are open each tick.

use std::fs;
use std::path::Path;

use glam::DVec2;

use crate::consts::{DIRECTION_PROBE, PELLET_SIZE, TILE_SIZE};
use crate::error::{GameError, GameResult};
use crate::sim::{BoundingBox, Direction, DirectionSet, Pellet, Wall, WallShape};

/// Built-in layout used when no map is configured
pub const DEMO_ROWS: [&str; 9] = [
    "3111111111114",
    "2777777777772",
    "2717171717172",
    "2777777g77772",
    "2717171717172",
    "277777777g772",
    "2717171717172",
    "27777p7777772",
    "5111111111116",
];

/// One maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall(WallShape),
    /// Drawn like a wall but never blocks movement
    Barrier,
    Pellet,
    PlayerSpawn,
    GhostSpawn,
}

impl Tile {
    fn from_glyph(glyph: char) -> Self {
        match glyph {
            '1' => Tile::Wall(WallShape::Horizontal),
            '2' => Tile::Wall(WallShape::Vertical),
            '3' => Tile::Wall(WallShape::UpLeft),
            '4' => Tile::Wall(WallShape::UpRight),
            '5' => Tile::Wall(WallShape::DownLeft),
            '6' => Tile::Wall(WallShape::DownRight),
            '=' => Tile::Barrier,
            '7' => Tile::Pellet,
            'p' => Tile::PlayerSpawn,
            'g' => Tile::GhostSpawn,
            _ => Tile::Empty,
        }
    }

    #[inline]
    fn blocks(self) -> bool {
        matches!(self, Tile::Wall(_))
    }
}

/// Answers "which directions are open for this box right now"
pub trait GridOracle {
    fn possible_directions(&self, bounds: &BoundingBox) -> DirectionSet;
}

/// Static maze geometry, reused across levels
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    tiles: Vec<Vec<Tile>>,
    width: usize,
    height: usize,
}

impl Maze {
    /// Parse newline-separated rows. Trailing blank lines are ignored.
    pub fn parse(text: &str) -> GameResult<Self> {
        let rows: Vec<&str> = text.lines().collect();
        Self::from_rows(&rows)
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> GameResult<Self> {
        let mut tiles: Vec<Vec<Tile>> = rows
            .iter()
            .map(|row| row.as_ref().trim_end_matches('\r').chars().map(Tile::from_glyph).collect())
            .collect();
        while tiles.last().is_some_and(|row: &Vec<Tile>| row.is_empty()) {
            tiles.pop();
        }

        let width = tiles.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Err(GameError::EmptyMaze);
        }
        // Ragged rows are padded with floor
        for row in &mut tiles {
            row.resize(width, Tile::Empty);
        }
        let height = tiles.len();

        log::debug!("parsed maze {}x{} tiles", width, height);
        Ok(Self {
            tiles,
            width,
            height,
        })
    }

    pub fn load(path: &Path) -> GameResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn demo() -> GameResult<Self> {
        Self::from_rows(&DEMO_ROWS)
    }

    /// Width in tiles
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles
    pub fn height(&self) -> usize {
        self.height
    }

    /// World-space extent
    pub fn pixel_size(&self) -> DVec2 {
        DVec2::new(self.width as f64, self.height as f64) * TILE_SIZE
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<Tile> {
        self.tiles.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Top-left corner of tile (x, y) in world space
    pub fn tile_origin(x: usize, y: usize) -> DVec2 {
        DVec2::new(x as f64, y as f64) * TILE_SIZE
    }

    /// Tiles in row-major order with their grid coordinates
    fn tiles(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .flat_map(|(y, row)| row.iter().enumerate().map(move |(x, tile)| (x, y, *tile)))
    }

    fn origins_of(&self, wanted: Tile) -> Vec<DVec2> {
        self.tiles()
            .filter(|(_, _, tile)| *tile == wanted)
            .map(|(x, y, _)| Self::tile_origin(x, y))
            .collect()
    }

    /// Wall entities, including pass-through barriers
    pub fn walls(&self) -> Vec<Wall> {
        self.tiles()
            .filter_map(|(x, y, tile)| {
                let (shape, passable) = match tile {
                    Tile::Wall(shape) => (shape, false),
                    Tile::Barrier => (WallShape::Horizontal, true),
                    _ => return None,
                };
                Some(Wall {
                    bounds: BoundingBox::new(Self::tile_origin(x, y), TILE_SIZE, TILE_SIZE),
                    shape,
                    passable,
                })
            })
            .collect()
    }

    /// Pellet entities centred in their tiles, ids in row-major order
    pub fn pellets(&self, points: u32) -> Vec<Pellet> {
        let inset = (TILE_SIZE - PELLET_SIZE) / 2.0;
        self.origins_of(Tile::Pellet)
            .into_iter()
            .zip(0u32..)
            .map(|(origin, id)| {
                let bounds =
                    BoundingBox::new(origin + DVec2::splat(inset), PELLET_SIZE, PELLET_SIZE);
                Pellet::new(id, bounds, points)
            })
            .collect()
    }

    pub fn player_spawns(&self) -> Vec<DVec2> {
        self.origins_of(Tile::PlayerSpawn)
    }

    pub fn ghost_spawns(&self) -> Vec<DVec2> {
        self.origins_of(Tile::GhostSpawn)
    }

    /// The four outer corners, used as scatter targets
    pub fn corners(&self) -> [DVec2; 4] {
        let size = self.pixel_size();
        [
            DVec2::ZERO,
            DVec2::new(size.x, 0.0),
            DVec2::new(0.0, size.y),
            size,
        ]
    }

    /// Whether any blocking tile strictly overlaps `bounds`.
    /// Anything reaching outside the grid counts as blocked.
    fn blocked(&self, bounds: &BoundingBox) -> bool {
        let x0 = (bounds.left_x() / TILE_SIZE).floor() as i64;
        let x1 = (bounds.right_x() / TILE_SIZE).ceil() as i64 - 1;
        let y0 = (bounds.top_y() / TILE_SIZE).floor() as i64;
        let y1 = (bounds.bottom_y() / TILE_SIZE).ceil() as i64 - 1;

        for ty in y0..=y1 {
            for tx in x0..=x1 {
                if tx < 0 || ty < 0 || tx >= self.width as i64 || ty >= self.height as i64 {
                    return true;
                }
                if self.tiles[ty as usize][tx as usize].blocks() {
                    return true;
                }
            }
        }
        false
    }
}

impl GridOracle for Maze {
    fn possible_directions(&self, bounds: &BoundingBox) -> DirectionSet {
        Direction::ALL
            .into_iter()
            .filter(|d| !self.blocked(&bounds.translated(d.unit() * DIRECTION_PROBE)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORRIDOR: [&str; 3] = ["31111111111114", "2p77g777777772", "51111111111116"];

    fn actor_at(x: f64, y: f64) -> BoundingBox {
        BoundingBox::new(DVec2::new(x, y), TILE_SIZE, TILE_SIZE)
    }

    #[test]
    fn test_parse_corridor() {
        let maze = Maze::from_rows(&CORRIDOR).unwrap();
        assert_eq!(maze.width(), 14);
        assert_eq!(maze.height(), 3);
        assert_eq!(maze.player_spawns(), vec![DVec2::new(16.0, 16.0)]);
        assert_eq!(maze.ghost_spawns(), vec![DVec2::new(64.0, 16.0)]);
        assert_eq!(maze.pellets(10).len(), 10);
        assert_eq!(maze.walls().len(), 14 + 2 + 14);
        assert_eq!(maze.tile(0, 0), Some(Tile::Wall(WallShape::UpLeft)));
        assert_eq!(maze.tile(14, 0), None);
    }

    #[test]
    fn test_pellets_are_centred() {
        let maze = Maze::from_rows(&["7"]).unwrap();
        let pellet = &maze.pellets(50)[0];
        assert_eq!(pellet.bounds.center(), DVec2::new(8.0, 8.0));
        assert_eq!(pellet.points, 50);
    }

    #[test]
    fn test_barrier_is_passable_wall() {
        let maze = Maze::from_rows(&["=p"]).unwrap();
        let walls = maze.walls();
        assert_eq!(walls.len(), 1);
        assert!(walls[0].passable);
    }

    #[test]
    fn test_empty_maze_rejected() {
        assert!(matches!(Maze::parse(""), Err(GameError::EmptyMaze)));
        assert!(matches!(Maze::parse("\n\n"), Err(GameError::EmptyMaze)));
    }

    #[test]
    fn test_parse_handles_crlf_and_ragged_rows() {
        let maze = Maze::parse("3114\r\n2p\r\n5116\r\n").unwrap();
        assert_eq!(maze.width(), 4);
        assert_eq!(maze.height(), 3);
        assert_eq!(maze.tile(3, 1), Some(Tile::Empty));
    }

    #[test]
    fn test_corners_span_the_maze() {
        let maze = Maze::from_rows(&CORRIDOR).unwrap();
        let corners = maze.corners();
        assert_eq!(corners[0], DVec2::ZERO);
        assert_eq!(corners[3], DVec2::new(224.0, 48.0));
    }

    #[test]
    fn test_oracle_in_corridor() {
        let maze = Maze::from_rows(&CORRIDOR).unwrap();
        let open = maze.possible_directions(&actor_at(16.0, 16.0));
        assert_eq!(open.iter().collect::<Vec<_>>(), vec![Direction::Right]);

        let open = maze.possible_directions(&actor_at(64.0, 16.0));
        assert_eq!(open.iter().collect::<Vec<_>>(), vec![Direction::Left, Direction::Right]);

        // Off the grid alignment, vertical moves still hit the walls
        let open = maze.possible_directions(&actor_at(70.5, 16.0));
        assert!(!open.contains(Direction::Up));
        assert!(!open.contains(Direction::Down));
    }

    #[test]
    fn test_oracle_crossroads_and_barrier() {
        let maze = Maze::from_rows(&["31=14", "2   2", "1 p 1", "2   2", "51116"]).unwrap();
        // Centre tile: open on all sides
        assert_eq!(maze.possible_directions(&actor_at(32.0, 32.0)), DirectionSet::ALL);
        // Directly under the barrier: up stays open
        assert!(maze.possible_directions(&actor_at(32.0, 16.0)).contains(Direction::Up));
        // Outside the grid blocks
        assert!(!maze.possible_directions(&actor_at(32.0, 0.0)).contains(Direction::Up));
    }

    #[test]
    fn test_demo_maze_is_well_formed() {
        let maze = Maze::demo().unwrap();
        assert_eq!(maze.player_spawns().len(), 1);
        assert_eq!(maze.ghost_spawns().len(), 2);
        assert!(!maze.pellets(10).is_empty());
    }
}
