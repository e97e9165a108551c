//! Level state and pursuit-mode scheduling
//!
//! A `Level` owns every entity for one level. It is rebuilt from the maze
//! layout at the start of each level; players and ghosts are reset in place
//! when a life is lost, never recreated.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{DynamicEntity, Pellet, Renderable, RenderView, Wall};
use super::geometry::Direction;
use super::ghost::{Ghost, GhostMode, ModeTable};
use super::player::Player;
use crate::config::LevelConfig;
use crate::consts::ACTOR_SIZE;
use crate::error::{GameError, GameResult};
use crate::maze::{GridOracle, Maze};

/// Cycles SCATTER -> CHASE -> SCATTER on configured tick counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeScheduler {
    mode: GhostMode,
    ticks: u32,
    lengths: ModeTable<u32>,
}

impl ModeScheduler {
    pub fn new(lengths: ModeTable<u32>) -> Self {
        Self {
            mode: GhostMode::Scatter,
            ticks: 0,
            lengths,
        }
    }

    pub fn mode(&self) -> GhostMode {
        self.mode
    }

    /// Ticks spent in the current mode
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Count one tick. Returns the new mode when the current one has run out.
    ///
    /// The switching tick already runs in the new mode, so the first scatter
    /// phase moves ghosts for one tick less than its configured length.
    pub fn advance(&mut self) -> Option<GhostMode> {
        self.ticks += 1;
        if self.ticks < self.lengths.get(self.mode) {
            return None;
        }
        self.mode = self.mode.next();
        self.ticks = 0;
        Some(self.mode)
    }
}

/// Simulation state for one level
#[derive(Debug, Clone)]
pub struct Level {
    pub(crate) maze: Maze,
    pub(crate) walls: Vec<Wall>,
    /// Uncollected pellets only. Shrinks monotonically.
    pub(crate) pellets: Vec<Pellet>,
    /// Player and ghosts in maze order
    pub(crate) entities: Vec<DynamicEntity>,
    pub(crate) scheduler: ModeScheduler,
    pub(crate) score: u64,
    pub(crate) lives: u32,
    pub(crate) game_over: bool,
    /// Ticks simulated since the level was built
    pub(crate) elapsed: u64,
}

impl Level {
    /// Build a level from the maze layout.
    ///
    /// Each ghost gets a random maze corner as its scatter target and a
    /// random starting heading. The player starts facing left.
    pub fn new<R: Rng>(
        config: &LevelConfig,
        maze: &Maze,
        lives: u32,
        pellet_points: u32,
        rng: &mut R,
    ) -> GameResult<Self> {
        let player_spawns = maze.player_spawns();
        let player_spawn = match player_spawns.as_slice() {
            [] => return Err(GameError::MissingPlayer),
            [spawn] => *spawn,
            many => return Err(GameError::MultiplePlayers(many.len())),
        };

        let size = DVec2::splat(ACTOR_SIZE);
        let corners = maze.corners();

        let mut player = Player::new(player_spawn, size, Direction::Left);
        player.set_speed(config.player_speed);

        let mut spawns: Vec<(DVec2, DynamicEntity)> =
            vec![(player_spawn, DynamicEntity::Player(player))];
        for (id, spawn) in (1u32..).zip(maze.ghost_spawns()) {
            let home_corner = corners[rng.random_range(0..corners.len())];
            let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
            let ghost = Ghost::new(id, spawn, size, direction, home_corner, config.ghost_speed);
            spawns.push((spawn, DynamicEntity::Ghost(ghost)));
        }
        // Row-major, the order the layout lists them in
        spawns.sort_by(|(a, _), (b, _)| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

        let mut level = Self {
            maze: maze.clone(),
            walls: maze.walls(),
            pellets: maze.pellets(pellet_points),
            entities: spawns.into_iter().map(|(_, entity)| entity).collect(),
            scheduler: ModeScheduler::new(config.mode_lengths),
            score: 0,
            lives,
            game_over: false,
            elapsed: 0,
        };
        level.refresh_directions();

        log::info!(
            "Level built: {} ghosts, {} pellets, {} lives",
            level.entities.len() - 1,
            level.pellets.len(),
            lives
        );
        Ok(level)
    }

    /// Re-query the oracle for every mover
    pub(crate) fn refresh_directions(&mut self) {
        for entity in &mut self.entities {
            let open = self.maze.possible_directions(&entity.bounds());
            entity.set_possible_directions(open);
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over || self.lives == 0
    }

    pub fn is_level_finished(&self) -> bool {
        self.pellets.is_empty()
    }

    pub fn mode(&self) -> GhostMode {
        self.scheduler.mode()
    }

    pub fn scheduler(&self) -> &ModeScheduler {
        &self.scheduler
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn entities(&self) -> &[DynamicEntity] {
        &self.entities
    }

    pub fn player(&self) -> Option<&Player> {
        self.entities.iter().find_map(DynamicEntity::as_player)
    }

    fn player_mut(&mut self) -> Option<&mut Player> {
        self.entities.iter_mut().find_map(DynamicEntity::as_player_mut)
    }

    pub fn player_position(&self) -> Option<DVec2> {
        self.player().map(Player::position)
    }

    pub fn ghosts(&self) -> impl Iterator<Item = &Ghost> {
        self.entities.iter().filter_map(DynamicEntity::as_ghost)
    }

    /// The `index`-th ghost in maze order
    pub fn ghost_mut(&mut self, index: usize) -> Option<&mut Ghost> {
        self.entities.iter_mut().filter_map(DynamicEntity::as_ghost_mut).nth(index)
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Pellets not yet collected
    pub fn pellets(&self) -> &[Pellet] {
        &self.pellets
    }

    /// Everything currently drawable, background first
    pub fn renderables(&self) -> Vec<RenderView> {
        self.walls
            .iter()
            .map(Renderable::render_view)
            .chain(self.pellets.iter().map(Renderable::render_view))
            .chain(self.entities.iter().map(Renderable::render_view))
            .collect()
    }

    /// Set the player's movement intent
    pub fn queue_player_direction(&mut self, direction: Direction) {
        if let Some(player) = self.player_mut() {
            player.queue_direction(direction);
        }
    }

    pub(crate) fn advance_player_visual(&mut self) {
        if let Some(player) = self.player_mut() {
            player.advance_visual();
        }
    }
}
