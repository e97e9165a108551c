//! Game engine: level lifecycle, warm-up and observer fan-out
//!
//! The engine is driven from outside, one [`Engine::tick`] per timer period.
//! It owns the current [`Level`], rebuilds it from the shared maze when a
//! level is cleared, and notifies observers once per tick after all state
//! for that tick is final.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::maze::Maze;
use crate::sim::{self, Direction, GhostMode, Level, RenderView};

/// Where the engine is in the level lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnginePhase {
    /// Warm-up before the level starts moving
    ReadyToStart,
    Running,
    /// A level was just cleared and the next one built. Lasts one tick.
    LevelComplete,
    /// Out of lives, or the last level cleared
    GameOver,
}

/// Read-only view handed to observers once per tick
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub tick: u64,
    pub level: usize,
    pub score: u64,
    pub lives: u32,
    pub game_over: bool,
    pub level_complete: bool,
    pub ready_to_start: bool,
    pub mode: GhostMode,
    pub renderables: Vec<RenderView>,
}

/// Presentation hook. Called synchronously at the end of every tick.
pub trait GameObserver {
    fn on_tick(&mut self, snapshot: &GameSnapshot);
}

impl<F: FnMut(&GameSnapshot)> GameObserver for F {
    fn on_tick(&mut self, snapshot: &GameSnapshot) {
        self(snapshot)
    }
}

/// Handle returned by [`Engine::add_observer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

pub struct Engine {
    config: GameConfig,
    maze: Maze,
    rng: Pcg32,
    level: Level,
    /// 1-based
    level_number: usize,
    phase: EnginePhase,
    ready_elapsed: u32,
    ticks: u64,
    won: bool,
    observers: Vec<(ObserverId, Box<dyn GameObserver>)>,
    next_observer: u64,
}

impl Engine {
    /// Validate the configuration, load the maze and build level 1
    pub fn new(config: GameConfig) -> GameResult<Self> {
        config.validate()?;
        let maze = config.maze()?;
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let level = Self::build_level(&config, &maze, 1, config.num_lives, &mut rng)?;

        log::info!(
            "Engine ready: {}x{} maze, {} levels, seed {}",
            maze.width(),
            maze.height(),
            config.levels.len(),
            config.seed
        );

        let mut engine = Self {
            config,
            maze,
            rng,
            level,
            level_number: 1,
            phase: EnginePhase::ReadyToStart,
            ready_elapsed: 0,
            ticks: 0,
            won: false,
            observers: Vec::new(),
            next_observer: 0,
        };
        engine.enter_ready();
        Ok(engine)
    }

    fn build_level(
        config: &GameConfig,
        maze: &Maze,
        number: usize,
        lives: u32,
        rng: &mut Pcg32,
    ) -> GameResult<Level> {
        let level_config = config.level(number).ok_or(GameError::NoLevels)?;
        log::info!("Starting level {} of {}", number, config.levels.len());
        Level::new(level_config, maze, lives, config.pellet_points, rng)
    }

    fn enter_ready(&mut self) {
        self.ready_elapsed = 0;
        self.phase = if self.config.ready_ticks == 0 {
            EnginePhase::Running
        } else {
            EnginePhase::ReadyToStart
        };
    }

    /// Advance one externally timed step and notify observers.
    ///
    /// Only fails when the next level cannot be built.
    pub fn tick(&mut self) -> GameResult<()> {
        self.ticks += 1;

        match self.phase {
            EnginePhase::GameOver => {}
            EnginePhase::LevelComplete => self.enter_ready(),
            EnginePhase::ReadyToStart => {
                self.ready_elapsed += 1;
                if self.ready_elapsed >= self.config.ready_ticks {
                    log::debug!("Level {} running", self.level_number);
                    self.phase = EnginePhase::Running;
                }
            }
            EnginePhase::Running => {
                let report = sim::tick(&mut self.level);
                if report.game_over {
                    log::info!(
                        "Game over on level {} with score {}",
                        self.level_number,
                        self.level.score()
                    );
                    self.phase = EnginePhase::GameOver;
                } else if report.level_finished {
                    self.advance_level()?;
                }
            }
        }

        self.notify();
        Ok(())
    }

    /// Move to the next level, or finish the game when there is none
    fn advance_level(&mut self) -> GameResult<()> {
        log::info!(
            "Level {} cleared with score {}",
            self.level_number,
            self.level.score()
        );
        if self.level_number >= self.config.levels.len() {
            log::info!("All {} levels cleared", self.config.levels.len());
            self.won = true;
            self.phase = EnginePhase::GameOver;
            return Ok(());
        }

        let next = self.level_number + 1;
        let lives = self.level.lives();
        self.level = Self::build_level(&self.config, &self.maze, next, lives, &mut self.rng)?;
        self.level_number = next;
        self.phase = EnginePhase::LevelComplete;
        Ok(())
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, observer) in &mut self.observers {
            observer.on_tick(&snapshot);
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns false when the id was not registered
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        match self.observers.iter().position(|(registered, _)| *registered == id) {
            Some(index) => {
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Forward a movement intent to the player. Accepted in every phase.
    pub fn queue_direction(&mut self, direction: Direction) {
        self.level.queue_player_direction(direction);
    }

    pub fn move_up(&mut self) {
        self.queue_direction(Direction::Up);
    }

    pub fn move_down(&mut self) {
        self.queue_direction(Direction::Down);
    }

    pub fn move_left(&mut self) {
        self.queue_direction(Direction::Left);
    }

    pub fn move_right(&mut self) {
        self.queue_direction(Direction::Right);
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Score of the current level
    pub fn score(&self) -> u64 {
        self.level.score()
    }

    pub fn lives(&self) -> u32 {
        self.level.lives()
    }

    pub fn level_number(&self) -> usize {
        self.level_number
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == EnginePhase::GameOver
    }

    /// True for the tick a level is cleared, and for good once the last one is
    pub fn is_level_complete(&self) -> bool {
        match self.phase {
            EnginePhase::LevelComplete => true,
            EnginePhase::GameOver => self.won,
            _ => false,
        }
    }

    pub fn is_ready_to_start(&self) -> bool {
        self.phase == EnginePhase::ReadyToStart
    }

    pub fn renderables(&self) -> Vec<RenderView> {
        self.level.renderables()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            tick: self.ticks,
            level: self.level_number,
            score: self.score(),
            lives: self.lives(),
            game_over: self.is_game_over(),
            level_complete: self.is_level_complete(),
            ready_to_start: self.is_ready_to_start(),
            mode: self.level.mode(),
            renderables: self.renderables(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelConfig;
    use crate::sim::ModeTable;
    use glam::DVec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn level(scatter: u32, chase: u32) -> LevelConfig {
        LevelConfig {
            player_speed: 2.0,
            ghost_speed: ModeTable::new(1.0, 2.0),
            mode_lengths: ModeTable::new(scatter, chase),
        }
    }

    fn config(rows: &[&str], levels: usize, lives: u32) -> GameConfig {
        GameConfig {
            map: None,
            map_rows: Some(rows.iter().map(|row| row.to_string()).collect()),
            num_lives: lives,
            seed: 11,
            ready_ticks: 3,
            pellet_points: 10,
            levels: vec![level(20, 20); levels],
        }
    }

    const ONE_PELLET: [&str; 3] = ["3114", "2p72", "5116"];

    #[test]
    fn test_warm_up_holds_level() {
        let mut engine = Engine::new(config(&ONE_PELLET, 1, 3)).unwrap();
        engine.move_right();
        assert!(engine.is_ready_to_start());

        engine.tick().unwrap();
        engine.tick().unwrap();
        assert!(engine.is_ready_to_start());
        assert_eq!(
            engine.level().player_position(),
            Some(DVec2::new(16.0, 16.0))
        );

        engine.tick().unwrap();
        assert_eq!(engine.phase(), EnginePhase::Running);
        engine.tick().unwrap();
        assert_eq!(
            engine.level().player_position(),
            Some(DVec2::new(18.0, 16.0))
        );
    }

    #[test]
    fn test_zero_ready_ticks_starts_running() {
        let mut cfg = config(&ONE_PELLET, 1, 3);
        cfg.ready_ticks = 0;
        let engine = Engine::new(cfg).unwrap();
        assert_eq!(engine.phase(), EnginePhase::Running);
    }

    #[test]
    fn test_clearing_last_level_wins() {
        let mut engine = Engine::new(config(&ONE_PELLET, 1, 3)).unwrap();
        engine.move_right();
        for _ in 0..6 {
            engine.tick().unwrap();
        }
        assert!(engine.is_game_over());
        assert!(engine.is_level_complete());
        assert_eq!(engine.score(), 10);

        // Further ticks change nothing
        engine.tick().unwrap();
        assert_eq!(engine.phase(), EnginePhase::GameOver);
        assert_eq!(engine.score(), 10);
    }

    #[test]
    fn test_level_advance_resets_score_and_mode() {
        let mut engine = Engine::new(config(&ONE_PELLET, 2, 3)).unwrap();
        engine.move_right();
        for _ in 0..6 {
            engine.tick().unwrap();
        }
        assert_eq!(engine.phase(), EnginePhase::LevelComplete);
        assert!(engine.is_level_complete());
        assert!(!engine.is_game_over());
        assert_eq!(engine.level_number(), 2);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.lives(), 3);
        assert_eq!(engine.level().mode(), GhostMode::Scatter);
        assert_eq!(engine.level().pellets().len(), 1);
        assert_eq!(
            engine.level().player_position(),
            Some(DVec2::new(16.0, 16.0))
        );

        engine.tick().unwrap();
        assert!(engine.is_ready_to_start());
        assert!(!engine.is_level_complete());

        engine.move_right();
        for _ in 0..6 {
            engine.tick().unwrap();
        }
        assert!(engine.is_game_over());
        assert!(engine.is_level_complete());
        assert_eq!(engine.score(), 10);
    }

    #[test]
    fn test_losing_last_life_is_game_over() {
        let mut cfg = config(&["31111114", "2p  g 72", "51111116"], 1, 1);
        cfg.levels = vec![level(1, 100)];
        let mut engine = Engine::new(cfg).unwrap();
        for _ in 0..60 {
            engine.tick().unwrap();
        }
        assert!(engine.is_game_over());
        assert!(!engine.is_level_complete());
        assert_eq!(engine.lives(), 0);
    }

    #[test]
    fn test_observers_notified_every_tick() {
        let mut engine = Engine::new(config(&ONE_PELLET, 1, 3)).unwrap();
        let seen: Rc<RefCell<Vec<GameSnapshot>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let id = engine.add_observer(Box::new(move |snapshot: &GameSnapshot| {
            sink.borrow_mut().push(snapshot.clone());
        }));

        engine.move_right();
        for _ in 0..8 {
            engine.tick().unwrap();
        }
        {
            let seen = seen.borrow();
            assert_eq!(seen.len(), 8);
            assert!(seen[0].ready_to_start);
            assert_eq!(seen[5].score, 10);
            assert!(seen[5].game_over && seen[5].level_complete);
            assert_eq!(
                seen.iter().map(|s| s.tick).collect::<Vec<_>>(),
                (1..=8u64).collect::<Vec<_>>()
            );
        }

        assert!(engine.remove_observer(id));
        assert!(!engine.remove_observer(id));
        engine.tick().unwrap();
        assert_eq!(seen.borrow().len(), 8);
    }

    #[test]
    fn test_snapshot_serializes() {
        let engine = Engine::new(config(&ONE_PELLET, 1, 3)).unwrap();
        let json = serde_json::to_value(engine.snapshot()).unwrap();
        assert_eq!(json["lives"], 3);
        assert_eq!(json["readyToStart"], true);
        assert_eq!(json["mode"], "scatter");
        assert!(json["renderables"].as_array().is_some_and(|views| !views.is_empty()));
    }

    #[test]
    fn test_same_seed_replays_identically() {
        let run = || {
            let mut engine = Engine::new(GameConfig::default()).unwrap();
            let mut snapshots = Vec::new();
            for n in 0..300u32 {
                match n % 60 {
                    0 => engine.move_left(),
                    15 => engine.move_up(),
                    30 => engine.move_right(),
                    45 => engine.move_down(),
                    _ => {}
                }
                engine.tick().unwrap();
                snapshots.push(engine.snapshot());
            }
            snapshots
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_construction_errors() {
        let err = Engine::new(config(&["3114", "2772", "5116"], 1, 3)).err();
        assert!(matches!(err, Some(GameError::MissingPlayer)));

        let err = Engine::new(config(&ONE_PELLET, 0, 3)).err();
        assert!(matches!(err, Some(GameError::NoLevels)));

        let mut cfg = config(&ONE_PELLET, 1, 3);
        cfg.map_rows = None;
        assert!(matches!(Engine::new(cfg).err(), Some(GameError::MissingMap)));
    }
}
