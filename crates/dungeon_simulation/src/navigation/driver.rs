//! Headless navigation driver (замена внешнего pathfinder'а)

use bevy::prelude::*;
use crate::components::{CharacterController, NavAgent};

/// Система: исполнение NavAgent destination
///
/// Путь = прямая, считается за один кадр (path_pending сбрасывается сразу).
/// Stopped агент пересчитывает remaining_distance, но не двигается.
pub fn drive_nav_agents(
    mut agents: Query<(&mut NavAgent, &mut Transform)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (mut agent, mut transform) in agents.iter_mut() {
        if !agent.on_surface {
            continue;
        }

        let Some(destination) = agent.destination else {
            continue;
        };

        let to_target = destination - transform.translation;
        let distance = to_target.length();

        agent.path_pending = false;
        agent.remaining_distance = distance;

        if agent.stopped || delta <= 0.0 || distance <= f32::EPSILON {
            agent.velocity = Vec3::ZERO;
            continue;
        }

        let direction = to_target / distance;
        let step = (agent.speed * delta).min(distance);

        transform.translation += direction * step;
        agent.velocity = direction * agent.speed;
        agent.remaining_distance = distance - step;
    }
}

/// Система: интеграция velocity контроллера → Transform (position += velocity * dt)
pub fn integrate_character_velocity(
    mut characters: Query<(&CharacterController, &mut Transform), Without<NavAgent>>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (controller, mut transform) in characters.iter_mut() {
        if !controller.enabled {
            continue;
        }
        transform.translation += controller.velocity * delta;
    }
}
