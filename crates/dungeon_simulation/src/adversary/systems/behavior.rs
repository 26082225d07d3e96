//! Adversary behavior: Patrol / Chase / Attack каждый кадр

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ColliderDisabled, CollisionGroups, Group};
use crate::adversary::{
    classify, effective_radii, AdversaryConfig, AdversaryMode, AdversaryState, AdversaryTarget, HitAttempt,
    HitLockout, HitSource, LockoutBehavior, PatrolRoute,
};
use crate::components::{Adversary, NavAgent, OverlapShape, Player};
use crate::navigation::NavMesh;
use crate::spatial::{overlap_sphere, OverlapCandidate};
use crate::teleport::snap_agent_to_surface;

/// Система: новые противники садятся на navmesh в точке спавна
pub fn snap_spawned_adversaries(
    mut spawned: Query<(Entity, &mut Transform, &mut NavAgent, &AdversaryConfig), Added<Adversary>>,
    navmesh: Res<NavMesh>,
) {
    for (entity, mut transform, mut agent, config) in spawned.iter_mut() {
        match snap_agent_to_surface(&mut transform, &mut agent, &navmesh, config.navmesh_sample_radius) {
            Some(point) => {
                crate::log(&format!("📍 Adversary {:?} snapped to navmesh at {:?}", entity, point));
            }
            None => {
                crate::log_warning(&format!(
                    "⚠️ Adversary {:?}: no walkable point within {:.1}m of spawn {:?}",
                    entity, config.navmesh_sample_radius, transform.translation
                ));
            }
        }
    }
}

/// Система: классификация + nav intent
///
/// 1. Агент вне navmesh → warning (один раз за жизнь противника), кадр пропускается
/// 2. Игрок (handle или повторный поиск); нет игрока → кадр пропускается
/// 3. Два sphere overlap (sight, attack) → mode
/// 4. Patrol → waypoint (arrival → следующий), Chase → игрок,
///    Attack → игрок + HitAttempt если lockout открыт
///
/// Overlap кандидаты — тела с `CollisionGroups` и игрок (без групп = все группы),
/// кроме `ColliderDisabled`.
pub fn adversary_behavior(
    mut adversaries: Query<
        (
            Entity,
            &Transform,
            &mut NavAgent,
            &mut AdversaryState,
            &mut AdversaryTarget,
            &HitLockout,
            &AdversaryConfig,
            Option<&mut PatrolRoute>,
        ),
        (With<Adversary>, Without<Player>),
    >,
    players: Query<(Entity, &Transform, Option<&CollisionGroups>), (With<Player>, Without<Adversary>)>,
    bodies: Query<
        (Entity, &Transform, Option<&CollisionGroups>, Option<&OverlapShape>),
        (Or<(With<CollisionGroups>, With<Player>)>, Without<ColliderDisabled>),
    >,
    time: Res<Time<Real>>,
    mut attempts: EventWriter<HitAttempt>,
) {
    let candidates: Vec<(Entity, OverlapCandidate)> = bodies
        .iter()
        .map(|(entity, transform, groups, shape)| {
            let candidate = OverlapCandidate {
                position: transform.translation,
                radius: shape.map(|shape| shape.radius).unwrap_or(0.0),
                // Коллайдер без CollisionGroups (rapier) состоит во всех группах
                memberships: groups.map(|groups| groups.memberships).unwrap_or(Group::ALL),
            };
            (entity, candidate)
        })
        .collect();

    let now = time.elapsed();

    for (entity, transform, mut agent, mut state, mut target, lockout, config, mut route) in adversaries.iter_mut() {
        if !agent.is_on_surface() {
            if !state.warned_off_surface {
                crate::log_warning(&format!(
                    "⚠️ Adversary {:?} is not on the navmesh at {:?}, behavior suspended",
                    entity, transform.translation
                ));
                state.warned_off_surface = true;
            }
            continue;
        }

        let player = target.resolve(
            |player| players.contains(player),
            || {
                players
                    .iter()
                    .next()
                    .map(|(player, _, groups)| (player, groups.map(|groups| groups.memberships)))
            },
        );
        let Some(player_position) = player
            .and_then(|player| players.get(player).ok())
            .map(|(_, player_transform, _)| player_transform.translation)
        else {
            continue;
        };

        let filter = target.filter(config);
        let (sight_radius, attack_radius) = effective_radii(config, state.mode);
        let position = transform.translation;

        let overlaps = |radius: f32| {
            overlap_sphere(
                position,
                radius,
                filter,
                candidates
                    .iter()
                    .filter(|(owner, _)| *owner != entity)
                    .map(|(_, candidate)| *candidate),
            )
        };
        let in_sight = overlaps(sight_radius);
        let in_attack_range = overlaps(attack_radius);
        let mode = classify(in_sight, in_attack_range);

        if state.mode != Some(mode) {
            crate::log(&format!(
                "🧠 Adversary {:?}: {:?} → {:?} (in_sight={}, in_attack_range={})",
                entity, state.mode, mode, in_sight, in_attack_range
            ));
            state.mode = Some(mode);
        }

        match mode {
            AdversaryMode::Patrol => {
                let Some(route) = route.as_mut() else {
                    continue;
                };
                let Some(waypoint) = route.current() else {
                    continue;
                };

                agent.set_destination(waypoint);
                if agent.has_arrived(config.waypoint_reach_distance) {
                    route.advance();
                }
            }
            AdversaryMode::Chase => {
                agent.set_destination(player_position);
            }
            AdversaryMode::Attack => {
                let open = lockout.is_open(now, config.hit_cooldown());

                if open {
                    attempts.write(HitAttempt {
                        adversary: entity,
                        source: HitSource::AttackRange,
                    });
                }

                match config.lockout_behavior {
                    LockoutBehavior::HoldPosition if !open => agent.reset_path(),
                    _ => agent.set_destination(player_position),
                }
            }
        }
    }
}
