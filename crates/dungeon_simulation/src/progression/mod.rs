//! Checkpoint progression (level segments)
//!
//! Игрок проходит упорядоченные checkpoint volumes. Вход в активный volume
//! (rising edge) → следующий level segment: телепорт игрока и противника
//! на старты сегмента, сброс respawn прогресса противника.

use bevy::prelude::*;

pub mod checkpoint;
pub mod events;
pub mod systems;


pub use checkpoint::{
    default_level_id, Checkpoint, CheckpointProgress, CheckpointVolume, LevelStarts, ResolvedSegment,
};
pub use events::CheckpointAdvanced;
pub use systems::advance_checkpoints;

/// Progression Plugin
///
/// Одна система в `SimulationSet::Progression` (Update, каждый кадр).
pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CheckpointAdvanced>()
            .add_event::<crate::AudioCue>()
            .init_resource::<LevelStarts>()
            .init_resource::<crate::NavMesh>()
            .add_systems(Update, advance_checkpoints.in_set(crate::SimulationSet::Progression));
    }
}
