//! Teleport protocol: перемещение физических акторов без артефактов
//!
//! Две ветки:
//! - Character (capsule controller + опционально rigid body): выключить
//!   контроллер → записать позицию → включить; обнулить linvel/angvel.
//! - Navigation agent: warp на ближайшую walkable точку, иначе raw warp;
//!   агент вне navmesh — raw запись Transform.
//!
//! Обе ветки идемпотентны и не оставляют velocity / pending path.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;
use crate::components::{CharacterController, NavAgent};
use crate::navigation::NavMesh;

/// Результат перемещения navigation агента
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WarpOutcome {
    /// Warp на ближайшую walkable точку
    Snapped(Vec3),
    /// Walkable точки в радиусе нет — warp на исходную цель (best effort)
    Raw(Vec3),
    /// Агент не на navmesh — прямая запись Transform
    OffSurface(Vec3),
}

impl WarpOutcome {
    pub fn position(&self) -> Vec3 {
        match self {
            WarpOutcome::Snapped(p) | WarpOutcome::Raw(p) | WarpOutcome::OffSurface(p) => *p,
        }
    }
}

/// Телепорт игрока (character controller + rigid body)
pub fn teleport_character(
    transform: &mut Transform,
    controller: Option<&mut CharacterController>,
    body: Option<&mut Velocity>,
    target: Vec3,
) {
    match controller {
        Some(controller) => {
            // Выключенный контроллер не видит "прыжок" сквозь геометрию
            controller.enabled = false;
            transform.translation = target;
            controller.velocity = Vec3::ZERO;
            controller.enabled = true;
        }
        None => {
            transform.translation = target;
        }
    }

    // Rigid body пишем после контроллера, чтобы оба представления совпали
    if let Some(body) = body {
        *body = Velocity::zero();
        transform.translation = target;
    }
}

/// Телепорт navigation агента
pub fn warp_agent(
    transform: &mut Transform,
    agent: &mut NavAgent,
    navmesh: &NavMesh,
    target: Vec3,
    search_radius: f32,
) -> WarpOutcome {
    if !agent.is_on_surface() {
        transform.translation = target;
        agent.reset_path();
        return WarpOutcome::OffSurface(target);
    }

    match navmesh.sample_nearest_walkable(target, search_radius) {
        Some(walkable) => {
            agent.warp(transform, walkable);
            WarpOutcome::Snapped(walkable)
        }
        None => {
            agent.warp(transform, target);
            WarpOutcome::Raw(target)
        }
    }
}

/// Пере-посадка агента на navmesh в текущей позиции
///
/// Ничего не делает если агент вне navmesh или walkable точки рядом нет.
pub fn snap_agent_to_surface(
    transform: &mut Transform,
    agent: &mut NavAgent,
    navmesh: &NavMesh,
    search_radius: f32,
) -> Option<Vec3> {
    if !agent.is_on_surface() {
        return None;
    }

    let walkable = navmesh.sample_nearest_walkable(transform.translation, search_radius)?;
    agent.warp(transform, walkable);
    Some(walkable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{WalkableRect, WalkableRegions};

    fn floor_navmesh() -> NavMesh {
        NavMesh::new(WalkableRegions::new(vec![WalkableRect::new(
            Vec2::new(-10.0, -10.0),
            Vec2::new(10.0, 10.0),
            0.0,
        )]))
    }

    #[test]
    fn test_character_teleport_zeroes_all_velocity() {
        let mut transform = Transform::from_translation(Vec3::new(3.0, 0.0, 3.0));
        let mut controller = CharacterController {
            velocity: Vec3::new(4.0, -2.0, 0.0),
            ..default()
        };
        let mut body = Velocity {
            linvel: Vec3::new(1.0, 2.0, 3.0),
            angvel: Vec3::new(0.5, 0.0, 0.0),
        };
        let target = Vec3::new(-5.0, 1.3, 8.0);

        teleport_character(&mut transform, Some(&mut controller), Some(&mut body), target);

        assert!(transform.translation.distance(target) < 1e-6);
        assert_eq!(controller.velocity, Vec3::ZERO);
        assert!(controller.enabled);
        assert_eq!(body.linvel, Vec3::ZERO);
        assert_eq!(body.angvel, Vec3::ZERO);
    }

    #[test]
    fn test_character_teleport_without_controller() {
        let mut transform = Transform::default();
        teleport_character(&mut transform, None, None, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_character_teleport_is_idempotent() {
        let mut transform = Transform::default();
        let mut controller = CharacterController::default();
        let target = Vec3::new(2.0, 0.3, -1.0);

        teleport_character(&mut transform, Some(&mut controller), None, target);
        let first = transform.translation;
        teleport_character(&mut transform, Some(&mut controller), None, target);

        assert_eq!(first, transform.translation);
        assert_eq!(controller.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_warp_snaps_to_walkable() {
        let mut transform = Transform::default();
        let mut agent = NavAgent::default();
        agent.set_destination(Vec3::new(9.0, 0.0, 9.0));

        let outcome = warp_agent(&mut transform, &mut agent, &floor_navmesh(), Vec3::new(2.0, 1.5, 2.0), 2.0);

        assert_eq!(outcome, WarpOutcome::Snapped(Vec3::new(2.0, 0.0, 2.0)));
        assert_eq!(transform.translation, outcome.position());
        assert!(!agent.is_pending());
        assert_eq!(agent.destination, None);
        assert_eq!(agent.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_warp_without_walkable_point_goes_raw() {
        let mut transform = Transform::default();
        let mut agent = NavAgent::default();
        let target = Vec3::new(50.0, 0.0, 50.0);

        let outcome = warp_agent(&mut transform, &mut agent, &floor_navmesh(), target, 2.0);

        assert_eq!(outcome, WarpOutcome::Raw(target));
        assert_eq!(outcome.position(), target);
        assert_eq!(transform.translation, target);
    }

    #[test]
    fn test_warp_off_surface_writes_transform() {
        let mut transform = Transform::default();
        let mut agent = NavAgent {
            on_surface: false,
            velocity: Vec3::X,
            ..default()
        };
        let target = Vec3::new(1.0, 1.0, 1.0);

        let outcome = warp_agent(&mut transform, &mut agent, &floor_navmesh(), target, 2.0);

        assert_eq!(outcome, WarpOutcome::OffSurface(target));
        assert_eq!(outcome.position(), target);
        assert_eq!(transform.translation, target);
        assert_eq!(agent.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_snap_keeps_position_when_no_surface_nearby() {
        let mut transform = Transform::from_translation(Vec3::new(40.0, 0.0, 0.0));
        let mut agent = NavAgent::default();

        let snapped = snap_agent_to_surface(&mut transform, &mut agent, &floor_navmesh(), 2.0);

        assert_eq!(snapped, None);
        assert_eq!(transform.translation, Vec3::new(40.0, 0.0, 0.0));
    }
}
