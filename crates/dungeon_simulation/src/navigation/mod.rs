//! Navigation service boundary
//!
//! Движок (navmesh pathfinder) — black box. ECS видит только:
//! - `NavAgent` компонент (intent + path state)
//! - `NavMesh` resource (sampleNearestWalkable)
//!
//! `HeadlessNavigationPlugin` — упрощённая замена движка для headless
//! симуляции и интеграционных тестов (прямые пути, без препятствий).

use bevy::prelude::*;

pub mod driver;
pub mod surface;

pub use driver::{drive_nav_agents, integrate_character_velocity};
pub use surface::{NavMesh, WalkableRect, WalkableRegions, WalkableSurface};

/// Headless navigation + locomotion
///
/// Работает в `SimulationSet::Navigation` (после AI, в том же кадре
/// исполняет выставленные destination). Время — `Time<Virtual>`, поэтому
/// во время hit overlay (time scale = 0) всё стоит.
pub struct HeadlessNavigationPlugin;

impl Plugin for HeadlessNavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (drive_nav_agents, integrate_character_velocity).in_set(crate::SimulationSet::Navigation),
        );
    }
}
