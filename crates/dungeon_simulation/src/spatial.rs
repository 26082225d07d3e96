//! Spatial queries: sphere overlap по категориям коллайдеров
//!
//! Категории — rapier `Group` (битовая маска physics layers).
//! Тело участвует в overlap если его memberships пересекаются с фильтром.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{CollisionGroups, Group};

/// Group 1: Environment (стены, пол, препятствия)
pub const ENVIRONMENT_GROUP: Group = Group::GROUP_1;

/// Group 2: Player (character controller игрока)
pub const PLAYER_GROUP: Group = Group::GROUP_2;

/// Group 3: Adversary
pub const ADVERSARY_GROUP: Group = Group::GROUP_3;

/// Player коллайдит с environment + adversary
pub fn player_collision_groups() -> CollisionGroups {
    CollisionGroups::new(PLAYER_GROUP, ENVIRONMENT_GROUP | ADVERSARY_GROUP)
}

/// Adversary коллайдит с environment + player
pub fn adversary_collision_groups() -> CollisionGroups {
    CollisionGroups::new(ADVERSARY_GROUP, ENVIRONMENT_GROUP | PLAYER_GROUP)
}

/// Тело-кандидат для overlap теста
#[derive(Debug, Clone, Copy)]
pub struct OverlapCandidate {
    pub position: Vec3,
    pub radius: f32,
    pub memberships: Group,
}

/// overlapSphere(point, radius, categoryFilter) -> bool
pub fn overlap_sphere(
    center: Vec3,
    radius: f32,
    filter: Group,
    candidates: impl IntoIterator<Item = OverlapCandidate>,
) -> bool {
    candidates.into_iter().any(|candidate| {
        candidate.memberships.intersects(filter)
            && candidate.position.distance(center) <= radius + candidate.radius
    })
}
