//! Fixed-step level tick
//!
//! One call advances a level by exactly one discrete step, as an ordered
//! pipeline: mode scheduling, player visuals, movement with wall resolution
//! and pellet pickup, player/ghost contact, life loss, completion check.

use serde::Serialize;

use super::collision::detect_contacts;
use super::entity::{DynamicEntity, Pellet};
use super::ghost::GhostMode;
use super::state::Level;
use crate::maze::GridOracle;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Mode the ghosts switched to at the start of the tick
    pub mode_switched: Option<GhostMode>,
    pub pellets_eaten: u32,
    pub points: u64,
    pub life_lost: bool,
    pub level_finished: bool,
    pub game_over: bool,
}

/// Advance the level by one step. A finished game is left untouched.
pub fn tick(level: &mut Level) -> TickReport {
    let mut report = TickReport::default();
    if level.is_game_over() {
        report.game_over = true;
        return report;
    }

    report.mode_switched = schedule_modes(level);
    level.advance_player_visual();

    let (eaten, points) = move_entities(level);
    report.pellets_eaten = eaten;
    report.points = points;

    let contacts = detect_contacts(&level.entities);
    if !contacts.is_empty() {
        if contacts.len() > 1 {
            log::debug!("{} ghosts reached the player together", contacts.len());
        }
        lose_life(level);
        report.life_lost = true;
    }

    report.level_finished = level.is_level_finished();
    report.game_over = level.is_game_over();
    level.elapsed += 1;
    report
}

/// Advance the scheduler and push a new mode (and its speed) to every ghost
fn schedule_modes(level: &mut Level) -> Option<GhostMode> {
    let mode = level.scheduler.advance()?;
    log::debug!("ghosts switch to {:?} after tick {}", mode, level.elapsed);
    for ghost in level.entities.iter_mut().filter_map(DynamicEntity::as_ghost_mut) {
        ghost.set_mode(mode);
    }
    Some(mode)
}

/// Move every entity in order. Returns pellets eaten and points gained.
fn move_entities(level: &mut Level) -> (u32, u64) {
    // Sampled once so every ghost chases the same spot
    let player_position = level.player_position();

    let Level {
        maze,
        walls,
        pellets,
        entities,
        score,
        ..
    } = level;

    let mut eaten = 0;
    let mut gained = 0;
    for entity in entities.iter_mut() {
        entity.set_possible_directions(maze.possible_directions(&entity.bounds()));
        entity.update(player_position);

        for wall in walls.iter().filter(|wall| !wall.passable) {
            if entity.collides_with(&wall.bounds) {
                entity.resolve_against(&wall.bounds);
            }
        }

        if entity.is_player() {
            let (count, points) = consume_pellets(entity, pellets);
            eaten += count;
            gained += points;
        }
    }

    *score += gained;
    (eaten, gained)
}

/// Collect every pellet the player touches. Collected pellets leave the set.
fn consume_pellets(player: &DynamicEntity, pellets: &mut Vec<Pellet>) -> (u32, u64) {
    let mut count = 0;
    let mut points = 0;
    pellets.retain_mut(|pellet| {
        if !player.collides_with(&pellet.bounds) {
            return true;
        }
        if let Some(value) = pellet.collect() {
            count += 1;
            points += u64::from(value);
        }
        false
    });
    (count, points)
}

/// Deduct one life. Either ends the game or sends everyone home.
fn lose_life(level: &mut Level) {
    level.lives = level.lives.saturating_sub(1);
    if level.lives == 0 {
        level.game_over = true;
        log::info!("Player caught with no lives left: game over (score {})", level.score);
        return;
    }

    log::info!("Player caught, {} lives left", level.lives);
    for entity in &mut level.entities {
        entity.reset();
    }
    // Stale after the teleport
    level.refresh_directions();
}
