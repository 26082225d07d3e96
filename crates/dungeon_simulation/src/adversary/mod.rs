//! Adversary behavior machine
//!
//! Два ортогональных state:
//! - Patrol / Chase / Attack — пересчитывается каждый кадр из двух
//!   sphere-overlap предикатов (sight, attack), без transition table
//! - Unlocked / Locked — hit eligibility. Locked ставится синхронно при
//!   принятии удара, снимается только когда hit overlay закрылся
//!
//! Три источника удара (attack range, trigger volume, collision) сходятся
//! в один gate: `HitAttempt` → `process_hit_attempts`.

use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;

pub mod classification;
pub mod components;
pub mod events;
pub mod systems;


pub use classification::{classify, effective_radii, AdversaryMode};
pub use components::{
    AdversaryConfig, AdversaryState, AdversaryTarget, HitFreeze, HitLockout, LockoutBehavior, PatrolRoute,
    PendingRecovery, RespawnProgress,
};
pub use events::{HitAccepted, HitAttempt, HitSource};

/// Adversary Plugin
///
/// Порядок выполнения (Update, `SimulationSet::Adversary`):
/// 1. snap_spawned_adversaries — новые противники садятся на navmesh
/// 2. adversary_behavior — классификация + nav intent + attack-range удар
/// 3. collect_contact_hits — trigger/collision события → HitAttempt
/// 4. process_hit_attempts — gate + respawn игрока + overlay
/// 5. finish_hit_recovery — overlay истёк → unlock + immunity
pub struct AdversaryPlugin;

impl Plugin for AdversaryPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HitAttempt>()
            .add_event::<HitAccepted>()
            .add_event::<crate::AudioCue>()
            .add_event::<crate::HitOverlayEvent>()
            .add_event::<CollisionEvent>()
            .init_resource::<HitFreeze>()
            .init_resource::<crate::RespawnPoints>()
            .init_resource::<crate::NavMesh>()
            .add_systems(
                Update,
                (
                    systems::snap_spawned_adversaries,
                    systems::adversary_behavior,
                    systems::collect_contact_hits,
                    systems::process_hit_attempts,
                    systems::finish_hit_recovery,
                )
                    .chain() // Последовательно: gate должен видеть все источники кадра
                    .in_set(crate::SimulationSet::Adversary),
            );
    }
}
