//! Collision detection and response on the tile grid
//!
//! Two rules live here: how a mover is pushed back out of a wall it ran
//! into, and which pairs of movers are in contact after everyone has moved.

use glam::DVec2;

use super::entity::DynamicEntity;
use super::geometry::{BoundingBox, Direction};
use super::kinematics::KinematicState;

/// Outcome of a pairwise contact between two movers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// A ghost touched the player. Indices into the mover list.
    PlayerCaught { player: usize, ghost: usize },
}

/// Clamp a mover flush against the wall it penetrated.
///
/// Only the axis of travel is corrected: a mover heading left ends with its
/// left edge on the wall's right edge, and so on. The previous position is
/// left untouched.
pub fn resolve_wall_collision(state: &mut KinematicState, size: DVec2, wall: &BoundingBox) {
    let position = state.position();
    let corrected = match state.direction() {
        Direction::Left => DVec2::new(wall.right_x(), position.y),
        Direction::Right => DVec2::new(wall.left_x() - size.x, position.y),
        Direction::Up => DVec2::new(position.x, wall.bottom_y()),
        Direction::Down => DVec2::new(position.x, wall.top_y() - size.y),
    };
    state.correct_position(corrected);
}

/// Response for a colliding pair, dispatched on the variant tags.
/// Only player/ghost pairs matter; everything else is ignored.
pub fn classify_contact(
    (i, a): (usize, &DynamicEntity),
    (j, b): (usize, &DynamicEntity),
) -> Option<Contact> {
    match (a, b) {
        (DynamicEntity::Player(_), DynamicEntity::Ghost(_)) => {
            Some(Contact::PlayerCaught { player: i, ghost: j })
        }
        (DynamicEntity::Ghost(_), DynamicEntity::Player(_)) => {
            Some(Contact::PlayerCaught { player: j, ghost: i })
        }
        _ => None,
    }
}

/// Test every unordered pair once (i < j) and collect the meaningful contacts
pub fn detect_contacts(entities: &[DynamicEntity]) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for (i, a) in entities.iter().enumerate() {
        for (j, b) in entities.iter().enumerate().skip(i + 1) {
            if !a.collides_with(&b.bounds()) {
                continue;
            }
            if let Some(contact) = classify_contact((i, a), (j, b)) {
                contacts.push(contact);
            }
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::DirectionSet;
    use crate::sim::ghost::{Ghost, ModeTable};
    use crate::sim::player::Player;

    fn wall(x: f64, y: f64) -> BoundingBox {
        BoundingBox::new(DVec2::new(x, y), 16.0, 16.0)
    }

    fn moved(from: DVec2, direction: Direction, speed: f64) -> KinematicState {
        let mut state = KinematicState::new(from, direction).with_speed(speed);
        state.commit(direction);
        state
    }

    #[test]
    fn test_resolve_each_approach_axis() {
        let size = DVec2::splat(16.0);

        let mut left = moved(DVec2::new(17.0, 32.0), Direction::Left, 3.0);
        resolve_wall_collision(&mut left, size, &wall(0.0, 32.0));
        assert_eq!(left.position(), DVec2::new(16.0, 32.0));

        let mut right = moved(DVec2::new(15.0, 32.0), Direction::Right, 3.0);
        resolve_wall_collision(&mut right, size, &wall(32.0, 32.0));
        assert_eq!(right.position(), DVec2::new(16.0, 32.0));

        let mut up = moved(DVec2::new(32.0, 17.0), Direction::Up, 3.0);
        resolve_wall_collision(&mut up, size, &wall(32.0, 0.0));
        assert_eq!(up.position(), DVec2::new(32.0, 16.0));

        let mut down = moved(DVec2::new(32.0, 15.0), Direction::Down, 3.0);
        resolve_wall_collision(&mut down, size, &wall(32.0, 32.0));
        assert_eq!(down.position(), DVec2::new(32.0, 16.0));
        // Perpendicular axis untouched
        assert_eq!(down.position().x, 32.0);
    }

    fn player_at(x: f64, y: f64) -> DynamicEntity {
        let mut player = Player::new(DVec2::new(x, y), DVec2::splat(16.0), Direction::Left);
        player.set_possible_directions(DirectionSet::ALL);
        DynamicEntity::Player(player)
    }

    fn ghost_at(id: u32, x: f64, y: f64) -> DynamicEntity {
        DynamicEntity::Ghost(Ghost::new(
            id,
            DVec2::new(x, y),
            DVec2::splat(16.0),
            Direction::Left,
            DVec2::ZERO,
            ModeTable::new(1.0, 2.0),
        ))
    }

    #[test]
    fn test_contacts_only_for_player_and_ghost() {
        // Two ghosts stacked on each other, player far away
        let entities = vec![
            player_at(200.0, 200.0),
            ghost_at(1, 16.0, 16.0),
            ghost_at(2, 20.0, 16.0),
        ];
        assert!(detect_contacts(&entities).is_empty());
    }

    #[test]
    fn test_contact_in_either_order() {
        let entities = vec![ghost_at(1, 30.0, 16.0), player_at(16.0, 16.0)];
        assert_eq!(
            detect_contacts(&entities),
            vec![Contact::PlayerCaught { player: 1, ghost: 0 }]
        );

        let entities = vec![player_at(16.0, 16.0), ghost_at(1, 30.0, 16.0)];
        assert_eq!(
            detect_contacts(&entities),
            vec![Contact::PlayerCaught { player: 0, ghost: 1 }]
        );
    }

    #[test]
    fn test_each_pair_reported_once() {
        let entities = vec![
            player_at(16.0, 16.0),
            ghost_at(1, 20.0, 16.0),
            ghost_at(2, 12.0, 16.0),
        ];
        let contacts = detect_contacts(&entities);
        assert_eq!(contacts.len(), 2);
        assert!(contacts.contains(&Contact::PlayerCaught { player: 0, ghost: 1 }));
        assert!(contacts.contains(&Contact::PlayerCaught { player: 0, ghost: 2 }));
    }
}
