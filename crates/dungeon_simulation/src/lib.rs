//! Dungeon Simulation Core
//!
//! ECS-ядро checkpoint уровня на Bevy 0.16:
//! - Progression: упорядоченные checkpoints → level segments
//! - Adversary: Patrol / Chase / Attack + hit lockout + respawn игрока
//!
//! Физика, navmesh, звук и UI — внешние сервисы. Ядро видит их через
//! компоненты (`NavAgent`, `CharacterController`, rapier `Velocity`),
//! resources (`NavMesh`) и события (`CollisionEvent`, `AudioCue`,
//! `HitOverlayEvent`).
//!
//! Часы:
//! - `Time<Virtual>` — global clock, замораживается hit overlay'ем
//! - `Time<Real>` — pause-immune, только для cooldown/immunity

use bevy::prelude::*;

// Публичные модули
pub mod adversary;
pub mod components;
pub mod config;
pub mod feedback;
pub mod logger;
pub mod navigation;
pub mod progression;
pub mod respawn;
pub mod spatial;
pub mod spawn;
pub mod teleport;

pub use adversary::{AdversaryConfig, AdversaryMode, AdversaryPlugin, HitAccepted, HitLockout, RespawnProgress};
pub use components::*;
pub use config::{ConfigError, LevelConfig, SpawnedLevel};
pub use feedback::{AudioCue, HitOverlayEvent};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, LogLevel};
pub use navigation::{HeadlessNavigationPlugin, NavMesh};
pub use progression::{CheckpointAdvanced, CheckpointProgress, LevelStarts, ProgressionPlugin};
pub use respawn::RespawnPoints;

/// Порядок подсистем внутри кадра (Update)
///
/// Progression → Adversary → Navigation: телепорт после checkpoint'а
/// виден противнику в том же кадре, nav driver исполняет свежий intent.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Progression,
    Adversary,
    Navigation,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Navigation service не включён: хост подключает свой или
/// `HeadlessNavigationPlugin`.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                SimulationSet::Progression,
                SimulationSet::Adversary,
                SimulationSet::Navigation,
            )
                .chain(),
        )
        // Пустые defaults: уровень без конфига inert, а не panic
        .init_resource::<NavMesh>()
        .init_resource::<RespawnPoints>()
        .init_resource::<LevelStarts>()
        .add_plugins((ProgressionPlugin, AdversaryPlugin));
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins);

    app
}
