//! Роли акторов: Player, Adversary + физический размер тела

use bevy::prelude::*;

/// Marker component для игрока
///
/// Ровно один entity в single-player. Противник хранит handle на него
/// (`AdversaryTarget`) и ищет заново через этот marker только если handle протух.
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(
    Transform,
    crate::components::CharacterController,
    crate::progression::CheckpointProgress,
    OverlapShape
)]
pub struct Player;

/// Marker component для противника (патрулирует, преследует, "бьёт" игрока)
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(
    Transform,
    crate::components::NavAgent,
    crate::adversary::AdversaryConfig,
    crate::adversary::AdversaryState,
    crate::adversary::AdversaryTarget,
    crate::adversary::HitLockout,
    crate::adversary::RespawnProgress,
    OverlapShape
)]
pub struct Adversary;

/// Радиус тела для sphere-overlap тестов
///
/// Overlap = расстояние между центрами <= radius сферы + radius тела.
/// Default 0.4m — радиус капсулы персонажа.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct OverlapShape {
    pub radius: f32,
}

impl Default for OverlapShape {
    fn default() -> Self {
        Self { radius: 0.4 }
    }
}
