//! Game configuration
//!
//! Loaded from a JSON file next to the maze it points at. Every value the
//! simulation tunes per level lives in [`LevelConfig`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{PELLET_POINTS, READY_TICKS};
use crate::error::{GameError, GameResult};
use crate::maze::{DEMO_ROWS, Maze};
use crate::sim::{GhostMode, ModeTable};

fn default_lives() -> u32 {
    3
}

fn default_seed() -> u64 {
    7
}

fn default_ready_ticks() -> u32 {
    READY_TICKS
}

fn default_pellet_points() -> u32 {
    PELLET_POINTS
}

/// Tuning for a single level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    /// Player step length per tick
    #[serde(rename = "pacmanSpeed", alias = "playerSpeed")]
    pub player_speed: f64,
    /// Ghost step length per tick, per mode
    pub ghost_speed: ModeTable<f64>,
    /// How many ticks each mode lasts before switching
    pub mode_lengths: ModeTable<u32>,
}

impl LevelConfig {
    fn validate(&self, level: usize) -> GameResult<()> {
        let speeds = [
            ("pacmanSpeed", self.player_speed),
            ("ghostSpeed.scatter", self.ghost_speed.scatter),
            ("ghostSpeed.chase", self.ghost_speed.chase),
        ];
        for (field, value) in speeds {
            if !value.is_finite() || value <= 0.0 {
                return Err(GameError::InvalidSpeed { level, field, value });
            }
        }
        for mode in [GhostMode::Scatter, GhostMode::Chase] {
            if self.mode_lengths.get(mode) == 0 {
                return Err(GameError::ZeroModeLength { level, mode });
            }
        }
        Ok(())
    }
}

/// Whole-game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Maze file. Relative paths resolve against the config file's directory.
    #[serde(default)]
    pub map: Option<PathBuf>,
    /// Inline maze rows, used when `map` is absent
    #[serde(default)]
    pub map_rows: Option<Vec<String>>,
    #[serde(default = "default_lives")]
    pub num_lives: u32,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_ready_ticks")]
    pub ready_ticks: u32,
    #[serde(default = "default_pellet_points")]
    pub pellet_points: u32,
    pub levels: Vec<LevelConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map: None,
            map_rows: Some(DEMO_ROWS.iter().map(|row| row.to_string()).collect()),
            num_lives: default_lives(),
            seed: default_seed(),
            ready_ticks: READY_TICKS,
            pellet_points: PELLET_POINTS,
            levels: vec![
                LevelConfig {
                    player_speed: 2.0,
                    ghost_speed: ModeTable::new(1.0, 2.0),
                    mode_lengths: ModeTable::new(140, 600),
                },
                LevelConfig {
                    player_speed: 2.0,
                    ghost_speed: ModeTable::new(2.0, 2.0),
                    mode_lengths: ModeTable::new(100, 800),
                },
            ],
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> GameResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file. A relative `map` is re-rooted at the file's directory.
    pub fn load(path: &Path) -> GameResult<Self> {
        let json = fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&json)?;

        if let (Some(map), Some(dir)) = (config.map.as_ref(), path.parent()) {
            if map.is_relative() {
                config.map = Some(dir.join(map));
            }
        }

        log::info!(
            "Loaded configuration from {} ({} levels, {} lives)",
            path.display(),
            config.levels.len(),
            config.num_lives
        );
        Ok(config)
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.levels.is_empty() {
            return Err(GameError::NoLevels);
        }
        if self.num_lives == 0 {
            return Err(GameError::NoLives);
        }
        for (index, level) in self.levels.iter().enumerate() {
            level.validate(index + 1)?;
        }
        Ok(())
    }

    /// Build the maze this configuration points at
    pub fn maze(&self) -> GameResult<Maze> {
        match (&self.map, &self.map_rows) {
            (Some(path), _) => Maze::load(path),
            (None, Some(rows)) => Maze::from_rows(rows),
            (None, None) => Err(GameError::MissingMap),
        }
    }

    /// Tuning for a 1-based level number
    pub fn level(&self, number: usize) -> Option<&LevelConfig> {
        number.checked_sub(1).and_then(|index| self.levels.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"{
        "pacmanSpeed": 1.5,
        "ghostSpeed": { "scatter": 1.0, "chase": 2.0 },
        "modeLengths": { "scatter": 20, "chase": 20 }
    }"#;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        let maze = config.maze().unwrap();
        assert_eq!(maze.player_spawns().len(), 1);
    }

    #[test]
    fn test_parse_with_defaults() {
        let json = format!(r#"{{ "mapRows": ["3114", "2p72", "5116"], "levels": [{LEVEL}] }}"#);
        let config = GameConfig::from_json(&json).unwrap();
        assert_eq!(config.num_lives, 3);
        assert_eq!(config.ready_ticks, READY_TICKS);
        assert_eq!(config.pellet_points, PELLET_POINTS);
        assert_eq!(config.levels[0].player_speed, 1.5);
        assert_eq!(config.levels[0].mode_lengths.get(GhostMode::Chase), 20);
        assert_eq!(config.level(1), Some(&config.levels[0]));
        assert_eq!(config.level(0), None);
        assert_eq!(config.level(2), None);
    }

    #[test]
    fn test_player_speed_alias() {
        let json = r#"{ "mapRows": ["p"], "levels": [{
            "playerSpeed": 3.0,
            "ghostSpeed": { "scatter": 1.0, "chase": 1.0 },
            "modeLengths": { "scatter": 1, "chase": 1 }
        }] }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.levels[0].player_speed, 3.0);
    }

    #[test]
    fn test_validation_errors() {
        let json = r#"{ "mapRows": ["p"], "levels": [] }"#;
        assert!(matches!(GameConfig::from_json(json), Err(GameError::NoLevels)));

        let json = format!(r#"{{ "mapRows": ["p"], "numLives": 0, "levels": [{LEVEL}] }}"#);
        assert!(matches!(GameConfig::from_json(&json), Err(GameError::NoLives)));

        let mut config = GameConfig::default();
        config.levels[1].ghost_speed.chase = -1.0;
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidSpeed {
                level: 2,
                field: "ghostSpeed.chase",
                ..
            })
        ));

        let mut config = GameConfig::default();
        config.levels[0].player_speed = f64::NAN;
        assert!(matches!(config.validate(), Err(GameError::InvalidSpeed { level: 1, .. })));

        let mut config = GameConfig::default();
        config.levels[0].mode_lengths.scatter = 0;
        assert!(matches!(
            config.validate(),
            Err(GameError::ZeroModeLength {
                level: 1,
                mode: GhostMode::Scatter
            })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(GameConfig::from_json("{ not json"), Err(GameError::Parse(_))));
        // levels is required
        assert!(matches!(GameConfig::from_json("{}"), Err(GameError::Parse(_))));
    }

    #[test]
    fn test_missing_map() {
        let json = format!(r#"{{ "levels": [{LEVEL}] }}"#);
        let config = GameConfig::from_json(&json).unwrap();
        assert!(matches!(config.maze(), Err(GameError::MissingMap)));
    }

    #[test]
    fn test_load_resolves_map_relative_to_config() {
        let dir = std::env::temp_dir().join(format!("maze-chase-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("maze.txt"), "3114\n2p72\n5116\n").unwrap();
        let json = format!(r#"{{ "map": "maze.txt", "levels": [{LEVEL}] }}"#);
        fs::write(dir.join("config.json"), json).unwrap();

        let config = GameConfig::load(&dir.join("config.json")).unwrap();
        assert_eq!(config.map, Some(dir.join("maze.txt")));
        let maze = config.maze().unwrap();
        assert_eq!(maze.width(), 4);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let err = GameConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, GameError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
