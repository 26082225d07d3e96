//! Hit events

use bevy::prelude::*;

/// Откуда пришёл удар
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSource {
    /// Игрок в attack radius (Attack mode)
    AttackRange,
    /// Игрок вошёл в trigger volume вокруг противника
    TriggerVolume,
    /// Физическое столкновение с игроком
    Collision,
}

/// Event: кандидат на удар (ещё не прошёл gate)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitAttempt {
    pub adversary: Entity,
    pub source: HitSource,
}

/// Event: удар принят, игрок телепортирован на respawn
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HitAccepted {
    pub adversary: Entity,
    pub player: Entity,
    pub source: HitSource,
    pub respawn_position: Vec3,
}
