//! Hit funnel: три источника → один gate → respawn игрока

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ColliderDisabled, CollisionEvent, CollisionGroups, Velocity};
use bevy_rapier3d::rapier::geometry::CollisionEventFlags;
use crate::adversary::{
    AdversaryConfig, AdversaryTarget, HitAccepted, HitAttempt, HitFreeze, HitLockout, HitSource, PendingRecovery,
    RespawnProgress,
};
use crate::components::{Adversary, CharacterController, NavAgent, Player};
use crate::feedback::{AudioCue, HitOverlayEvent};
use crate::navigation::NavMesh;
use crate::respawn::RespawnPoints;
use crate::teleport::{snap_agent_to_surface, teleport_character};

/// Система: rapier contact events → HitAttempt
///
/// Пара (adversary, player) в любом порядке. SENSOR → trigger volume,
/// иначе физическая коллизия. Противник с `ColliderDisabled` игнорируется
/// (rapier может доставить событие, созданное до отключения коллайдера).
pub fn collect_contact_hits(
    mut collisions: EventReader<CollisionEvent>,
    adversaries: Query<(), (With<Adversary>, Without<ColliderDisabled>)>,
    players: Query<(), With<Player>>,
    mut attempts: EventWriter<HitAttempt>,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(first, second, flags) = event else {
            continue;
        };

        let adversary = if adversaries.contains(*first) && players.contains(*second) {
            *first
        } else if adversaries.contains(*second) && players.contains(*first) {
            *second
        } else {
            continue;
        };

        let source = if flags.contains(CollisionEventFlags::SENSOR) {
            HitSource::TriggerVolume
        } else {
            HitSource::Collision
        };

        attempts.write(HitAttempt { adversary, source });
    }
}

/// Система: gate + обработка принятого удара
///
/// Gate (`HitLockout::try_lock`) закрывается до любых side effects, поэтому
/// из нескольких источников одного кадра проходит ровно один.
///
/// После принятия:
/// 1. игрок (handle или повторный поиск); нет → unlock, abort
/// 2. AdversaryHit cue
/// 3. global time freeze + overlay Shown
/// 4. respawn позиция (RespawnProgress противника) + Y offset → телепорт игрока
/// 5. противник: re-snap на navmesh, stop, ColliderDisabled, PendingRecovery
pub fn process_hit_attempts(
    mut commands: Commands,
    mut attempts: EventReader<HitAttempt>,
    mut adversaries: Query<
        (
            &mut Transform,
            &mut NavAgent,
            &mut HitLockout,
            &mut AdversaryTarget,
            &RespawnProgress,
            &AdversaryConfig,
        ),
        (With<Adversary>, Without<Player>),
    >,
    mut players: Query<
        (
            &mut Transform,
            Option<&mut CharacterController>,
            Option<&mut Velocity>,
            Option<&CollisionGroups>,
        ),
        (With<Player>, Without<Adversary>),
    >,
    player_entities: Query<Entity, (With<Player>, Without<Adversary>)>,
    respawn_points: Res<RespawnPoints>,
    navmesh: Res<NavMesh>,
    real_time: Res<Time<Real>>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut freeze: ResMut<HitFreeze>,
    mut cues: EventWriter<AudioCue>,
    mut overlays: EventWriter<HitOverlayEvent>,
    mut accepted: EventWriter<HitAccepted>,
) {
    let now = real_time.elapsed();

    for attempt in attempts.read() {
        let Ok((mut transform, mut agent, mut lockout, mut target, respawn, config)) =
            adversaries.get_mut(attempt.adversary)
        else {
            continue;
        };

        if !lockout.try_lock(now, config.hit_cooldown()) {
            continue;
        }

        let player = target.resolve(
            |player| player_entities.contains(player),
            || {
                let player = player_entities.iter().next()?;
                let memberships = players
                    .get(player)
                    .ok()
                    .and_then(|(_, _, _, groups)| groups.map(|groups| groups.memberships));
                Some((player, memberships))
            },
        );

        let Some(player) = player else {
            lockout.abort();
            crate::log_warning(&format!(
                "⚠️ Adversary {:?}: hit ({:?}) aborted, no player to respawn",
                attempt.adversary, attempt.source
            ));
            continue;
        };

        let Ok((mut player_transform, mut controller, mut body, _)) = players.get_mut(player) else {
            lockout.abort();
            continue;
        };

        cues.write(AudioCue::AdversaryHit);

        // Скорость до первой заморозки (повторная заморозка её не перезаписывает)
        freeze.restore_speed.get_or_insert(virtual_time.relative_speed());
        virtual_time.set_relative_speed(0.0);

        let overlay = config.overlay_duration();
        overlays.write(HitOverlayEvent::Shown {
            adversary: attempt.adversary,
            duration_secs: overlay.as_secs_f32(),
        });

        let hit_position = player_transform.translation;
        let respawn_position = respawn_points.resolve(&respawn.level_id, respawn.checkpoint, hit_position)
            + Vec3::Y * config.respawn_y_offset;
        teleport_character(
            &mut player_transform,
            controller.as_deref_mut(),
            body.as_deref_mut(),
            respawn_position,
        );

        snap_agent_to_surface(&mut transform, &mut agent, &navmesh, config.navmesh_sample_radius);
        agent.set_stopped(true);

        // insert заменяет предыдущий PendingRecovery (не два таймера)
        commands.entity(attempt.adversary).insert((
            ColliderDisabled,
            PendingRecovery { ends_at: now + overlay },
        ));

        crate::log_info(&format!(
            "💥 Adversary {:?} hit player {:?} ({:?}) → respawn {:?} [{} #{}]",
            attempt.adversary, player, attempt.source, respawn_position, respawn.level_id, respawn.checkpoint
        ));

        accepted.write(HitAccepted {
            adversary: attempt.adversary,
            player,
            source: attempt.source,
            respawn_position,
        });
    }
}
