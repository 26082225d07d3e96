//! Progression system: edge-triggered checkpoint advancement

use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;
use crate::adversary::{AdversaryConfig, RespawnProgress};
use crate::components::{Adversary, CharacterController, NavAgent, Player};
use crate::feedback::AudioCue;
use crate::navigation::NavMesh;
use crate::progression::{Checkpoint, CheckpointAdvanced, CheckpointProgress, LevelStarts};
use crate::teleport::{teleport_character, warp_agent, WarpOutcome};

/// Система: checkpoint progression
///
/// Каждый кадр:
/// 1. current >= N → terminal, ничего не делаем
/// 2. containment игрока в checkpoint[current]
/// 3. rising edge (false → true) → advance:
///    cue, телепорт игрока/противника на старт сегмента,
///    RespawnProgress противника = (level id сегмента, 0),
///    visibility, re-arm was_inside = false
/// 4. current == N → LevelCompleted cue (ровно один раз)
///
/// Нет checkpoints → система inert.
pub fn advance_checkpoints(
    mut players: Query<
        (
            Entity,
            &mut CheckpointProgress,
            &mut Transform,
            Option<&mut CharacterController>,
            Option<&mut Velocity>,
        ),
        (With<Player>, Without<Adversary>),
    >,
    mut checkpoints: Query<&mut Checkpoint>,
    mut adversaries: Query<
        (&mut Transform, &mut NavAgent, &mut RespawnProgress, &AdversaryConfig),
        (With<Adversary>, Without<Player>),
    >,
    starts: Res<LevelStarts>,
    navmesh: Res<NavMesh>,
    mut cues: EventWriter<AudioCue>,
    mut advanced: EventWriter<CheckpointAdvanced>,
) {
    let total = checkpoints.iter().count();
    if total == 0 {
        return;
    }

    for (player, mut progress, mut transform, mut controller, mut body) in players.iter_mut() {
        if !progress.primed {
            // Первый кадр: игрок мог заспавниться внутри checkpoint 0 —
            // тогда advance только после выхода и повторного входа
            sync_checkpoint_visibility(&mut checkpoints, progress.current);
            progress.was_inside = find_checkpoint(&checkpoints, progress.current)
                .map(|checkpoint| checkpoint.volume.contains(transform.translation))
                .unwrap_or(false);
            progress.primed = true;
            continue;
        }

        if progress.is_finished(total) {
            continue;
        }

        let Some(next) = find_checkpoint(&checkpoints, progress.current) else {
            // Дырка в индексах — конфиг битый, стоим на месте
            continue;
        };

        let inside = next.volume.contains(transform.translation);
        if !inside || progress.was_inside {
            if progress.was_inside != inside {
                progress.was_inside = inside;
            }
            continue;
        }

        progress.current += 1;
        cues.write(AudioCue::CheckpointReached);

        let segment = starts.resolve(progress.current);

        if let Some(start) = segment.player_start {
            teleport_character(
                &mut transform,
                controller.as_deref_mut(),
                body.as_deref_mut(),
                start,
            );
        }

        for (mut adversary_transform, mut agent, mut respawn, config) in adversaries.iter_mut() {
            if let Some(start) = segment.adversary_start {
                let outcome = warp_agent(
                    &mut adversary_transform,
                    &mut agent,
                    &navmesh,
                    start,
                    config.navmesh_sample_radius,
                );
                crate::log(&format!(
                    "🚪 Adversary moved to segment {} start {:?} (snapped: {})",
                    segment.index,
                    outcome.position(),
                    matches!(outcome, WarpOutcome::Snapped(_))
                ));
            }

            // Пара (level id, index) пишется целиком
            *respawn = RespawnProgress::new(segment.level_id.clone(), 0);
        }

        sync_checkpoint_visibility(&mut checkpoints, progress.current);
        progress.was_inside = false;

        let completed = progress.is_finished(total);

        crate::log_info(&format!(
            "🏁 Checkpoint {}/{} reached by {:?} → segment {} ({})",
            progress.current, total, player, segment.index, segment.level_id
        ));

        advanced.write(CheckpointAdvanced {
            player,
            index: progress.current,
            level_id: segment.level_id,
            completed,
        });

        if completed {
            cues.write(AudioCue::LevelCompleted);
            crate::log_info("🎉 All checkpoints cleared — level completed");
        }
    }
}

fn find_checkpoint<'a>(checkpoints: &'a Query<&mut Checkpoint>, index: usize) -> Option<&'a Checkpoint> {
    checkpoints.iter().find(|checkpoint| checkpoint.index == index)
}

/// Активен ровно checkpoint с index == current (terminal → ни один)
fn sync_checkpoint_visibility(checkpoints: &mut Query<&mut Checkpoint>, current: usize) {
    for mut checkpoint in checkpoints.iter_mut() {
        let active = checkpoint.index == current;
        if checkpoint.active != active {
            checkpoint.active = active;
        }
    }
}
