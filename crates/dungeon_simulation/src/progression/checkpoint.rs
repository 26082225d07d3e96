//! Checkpoint компоненты и level segment старты

use bevy::prelude::*;

/// Axis-aligned volume checkpoint'а (world space)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CheckpointVolume {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl CheckpointVolume {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// contains(volume, point) — границы включительно
    pub fn contains(&self, point: Vec3) -> bool {
        let offset = (point - self.center).abs();
        offset.cmple(self.half_extents).all()
    }
}

/// Checkpoint (ordered volume)
///
/// Инвариант: активен ровно checkpoint с index == currentCheckpointIndex
/// (или ни один, если уровень пройден). Меняет только progression система.
#[derive(Component, Debug, Clone, Reflect)]
pub struct Checkpoint {
    pub index: usize,
    pub volume: CheckpointVolume,
    /// Visibility flag (следующий checkpoint для прохождения)
    pub active: bool,
}

impl Checkpoint {
    pub fn new(index: usize, volume: CheckpointVolume) -> Self {
        Self {
            index,
            volume,
            active: false,
        }
    }
}

/// Прогресс игрока по checkpoints
///
/// - `current` — следующий checkpoint (0..N, N = terminal)
/// - `was_inside` — containment на прошлом кадре (edge detection)
/// - `primed` — первый кадр отработан (visibility выставлена, was_inside
///   инициализирован текущей позицией)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct CheckpointProgress {
    pub current: usize,
    pub was_inside: bool,
    pub primed: bool,
}

impl CheckpointProgress {
    pub fn is_finished(&self, total: usize) -> bool {
        self.current >= total
    }
}

/// Старт сегмента после clamp'а индекса
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSegment {
    pub index: usize,
    pub player_start: Option<Vec3>,
    pub adversary_start: Option<Vec3>,
    pub level_id: String,
}

/// Resource: старты level segments (параллельно checkpoints)
///
/// Сегмент i — где продолжается игра после checkpoint i-1
/// (сегмент 0 — начальный spawn). Массивы могут быть разной длины.
#[derive(Resource, Debug, Clone, Default)]
pub struct LevelStarts {
    pub player_starts: Vec<Vec3>,
    pub adversary_starts: Vec<Vec3>,
    pub level_ids: Vec<String>,
}

impl LevelStarts {
    /// Индекс clamp'ится к последнему player start (никогда не ошибка)
    pub fn resolve(&self, segment: usize) -> ResolvedSegment {
        let index = segment.min(self.player_starts.len().saturating_sub(1));

        let level_id = self
            .level_ids
            .get(index)
            .filter(|id| !id.is_empty())
            .cloned()
            .unwrap_or_else(|| default_level_id(index));

        ResolvedSegment {
            index,
            player_start: self.player_starts.get(index).copied(),
            adversary_start: self.adversary_starts.get(index).copied(),
            level_id,
        }
    }
}

/// "Level{n}", n с единицы
pub fn default_level_id(index: usize) -> String {
    format!("Level{}", index + 1)
}
