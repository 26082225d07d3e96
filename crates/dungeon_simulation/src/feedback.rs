//! Audio/UI feedback events (presentation layer вне симуляции)
//!
//! Симуляция только пишет события; проигрывание звука и показ overlay —
//! ответственность хоста.

use bevy::prelude::*;

/// One-shot звуковые сигналы
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Игрок вошёл в очередной checkpoint
    CheckpointReached,
    /// Пройден последний checkpoint (ровно один раз)
    LevelCompleted,
    /// Противник "ударил" игрока
    AdversaryHit,
}

/// Блокирующий hit overlay
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum HitOverlayEvent {
    Shown { adversary: Entity, duration_secs: f32 },
    Hidden { adversary: Entity },
}
