//! Progression events

use bevy::prelude::*;

/// Event: игрок прошёл checkpoint
///
/// `index` — сколько checkpoints пройдено (следующий для прохождения).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CheckpointAdvanced {
    pub player: Entity,
    pub index: usize,
    pub level_id: String,
    /// Последний checkpoint — уровень пройден
    pub completed: bool,
}
