//! Hit overlay recovery (explicit timer на pause-immune clock)

use bevy::prelude::*;
use bevy_rapier3d::prelude::ColliderDisabled;
use crate::adversary::{AdversaryConfig, HitFreeze, HitLockout, PendingRecovery};
use crate::components::{Adversary, NavAgent};
use crate::feedback::HitOverlayEvent;

/// Система: overlay истёк → возврат в игру
///
/// Для каждого противника с истёкшим `PendingRecovery`:
/// overlay Hidden, movement resume, collision on, unlock.
/// Cooldown и immunity считаются от момента unlock'а.
///
/// Global time scale восстанавливается когда не осталось ни одного pending overlay.
pub fn finish_hit_recovery(
    mut commands: Commands,
    mut adversaries: Query<
        (Entity, &mut NavAgent, &mut HitLockout, &AdversaryConfig, &PendingRecovery),
        With<Adversary>,
    >,
    real_time: Res<Time<Real>>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut freeze: ResMut<HitFreeze>,
    mut overlays: EventWriter<HitOverlayEvent>,
) {
    let now = real_time.elapsed();
    let mut still_pending = false;

    for (entity, mut agent, mut lockout, config, pending) in adversaries.iter_mut() {
        if now < pending.ends_at {
            still_pending = true;
            continue;
        }

        overlays.write(HitOverlayEvent::Hidden { adversary: entity });
        agent.set_stopped(false);
        lockout.release(now, config.respawn_immunity());

        commands.entity(entity).remove::<(PendingRecovery, ColliderDisabled)>();

        crate::log_info(&format!(
            "✅ Adversary {:?} re-armed, next hit allowed at {:.3}s",
            entity,
            lockout.next_allowed.as_secs_f32()
        ));
    }

    if still_pending {
        return;
    }

    if let Some(speed) = freeze.restore_speed.take() {
        virtual_time.set_relative_speed(speed);
        crate::log(&format!("⏱️ Global time scale restored to {}", speed));
    }
}
