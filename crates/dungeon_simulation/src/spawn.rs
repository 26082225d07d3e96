//! Spawn helpers: стандартные bundles игрока и противника
//!
//! Required components (`#[require]` на Player/Adversary) добавляются
//! автоматически; здесь только то, что зависит от параметров уровня.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;
use crate::adversary::{AdversaryConfig, PatrolRoute};
use crate::components::{Adversary, Player};
use crate::spatial::{adversary_collision_groups, player_collision_groups};

/// Игрок: character controller + rigid body velocity + player collision group
pub fn player_bundle(position: Vec3) -> impl Bundle {
    (
        Player,
        Transform::from_translation(position),
        Velocity::zero(),
        player_collision_groups(),
    )
}

/// Противник: nav agent + patrol route + adversary collision group
pub fn adversary_bundle(position: Vec3, config: AdversaryConfig, waypoints: Vec<Vec3>) -> impl Bundle {
    (
        Adversary,
        Transform::from_translation(position),
        config,
        PatrolRoute::new(waypoints),
        adversary_collision_groups(),
    )
}
