//! Respawn resolver: (level id, checkpoint index) → позиция после удара
//!
//! Fallback chain (никогда не падает):
//! 1. первый непустой RespawnSet с совпадающим level id → clamp index
//! 2. default respawn point
//! 3. fallback (обычно позиция игрока до удара)

use bevy::prelude::*;

/// Упорядоченные точки возрождения одного уровня
///
/// Отдельно от progression checkpoints: уровень может иметь более
/// частые respawn точки.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RespawnSet {
    pub level_id: String,
    pub points: Vec<Vec3>,
}

impl RespawnSet {
    pub fn new(level_id: impl Into<String>, points: Vec<Vec3>) -> Self {
        Self {
            level_id: level_id.into(),
            points,
        }
    }
}

/// Resource: все respawn sets (immutable после загрузки уровня)
#[derive(Resource, Debug, Clone, Default)]
pub struct RespawnPoints {
    pub sets: Vec<RespawnSet>,
    pub default_point: Option<Vec3>,
}

impl RespawnPoints {
    pub fn new(sets: Vec<RespawnSet>, default_point: Option<Vec3>) -> Self {
        Self { sets, default_point }
    }

    pub fn resolve(&self, level_id: &str, checkpoint: usize, fallback: Vec3) -> Vec3 {
        let matching = self
            .sets
            .iter()
            .find(|set| set.level_id == level_id && !set.points.is_empty());

        if let Some(set) = matching {
            let index = checkpoint.min(set.points.len() - 1);
            return set.points[index];
        }

        self.default_point.unwrap_or(fallback)
    }
}
