//! Movement компоненты: character controller игрока, navigation agent противника
//!
//! Оба компонента — контракт с внешним движком (физика, navmesh pathfinding).
//! ECS пишет intent (destination, stopped), движок пишет обратно path state.

use bevy::prelude::*;

/// Capsule/character controller игрока
///
/// `velocity` — внутренняя интеграция контроллера. Телепорт обязан её обнулить,
/// иначе на следующем кадре контроллер "доедет" старую скорость.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CharacterController {
    /// Выключенный контроллер не двигает тело и не коллайдит
    pub enabled: bool,
    pub velocity: Vec3,
    pub grounded: bool,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self {
            enabled: true,
            velocity: Vec3::ZERO,
            grounded: false,
        }
    }
}

/// Navigation agent (path-follow) противника
///
/// Архитектура:
/// - ECS система вызывает `set_destination` / `set_stopped` / `warp`
/// - Внешний navigation service читает destination, считает путь,
///   пишет обратно `path_pending`, `remaining_distance`, `on_surface`
/// - В headless режиме это делает `HeadlessNavigationPlugin`
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    /// Путь ещё считается (remaining_distance невалиден)
    pub path_pending: bool,
    pub remaining_distance: f32,
    /// Агент стоит на navmesh (иначе все nav-операции невалидны)
    pub on_surface: bool,
    /// Движение заморожено (hit overlay)
    pub stopped: bool,
    pub velocity: Vec3,
    /// Скорость движения (m/s)
    pub speed: f32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            destination: None,
            path_pending: false,
            remaining_distance: 0.0,
            on_surface: true,
            stopped: false,
            velocity: Vec3::ZERO,
            speed: 3.5,
        }
    }
}

impl NavAgent {
    /// Задать цель. Повтор той же цели не сбрасывает посчитанный путь.
    pub fn set_destination(&mut self, target: Vec3) {
        if self.destination == Some(target) {
            return;
        }
        self.destination = Some(target);
        self.path_pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.path_pending
    }

    pub fn remaining_distance(&self) -> f32 {
        self.remaining_distance
    }

    pub fn is_on_surface(&self) -> bool {
        self.on_surface
    }

    /// Прибыл: путь посчитан и до цели <= tolerance
    pub fn has_arrived(&self, tolerance: f32) -> bool {
        !self.path_pending && self.remaining_distance <= tolerance
    }

    pub fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
        if stopped {
            self.velocity = Vec3::ZERO;
        }
    }

    /// Сбросить путь и скорость (после warp/raw телепорта)
    pub fn reset_path(&mut self) {
        self.destination = None;
        self.path_pending = false;
        self.remaining_distance = 0.0;
        self.velocity = Vec3::ZERO;
    }

    /// Принудительное перемещение агента (без pathfinding)
    pub fn warp(&mut self, transform: &mut Transform, point: Vec3) {
        transform.translation = point;
        self.reset_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_destination_marks_pending() {
        let mut agent = NavAgent::default();
        agent.set_destination(Vec3::new(1.0, 0.0, 0.0));
        assert!(agent.is_pending());
        assert!(!agent.has_arrived(1.0));
    }

    #[test]
    fn test_same_destination_keeps_path() {
        let mut agent = NavAgent::default();
        agent.set_destination(Vec3::X);
        agent.path_pending = false;
        agent.remaining_distance = 4.0;

        agent.set_destination(Vec3::X);
        assert!(!agent.is_pending());
        assert_eq!(agent.remaining_distance(), 4.0);
    }

    #[test]
    fn test_warp_clears_path_and_velocity() {
        let mut agent = NavAgent::default();
        let mut transform = Transform::default();
        agent.set_destination(Vec3::new(9.0, 0.0, 9.0));
        agent.velocity = Vec3::new(2.0, 0.0, 0.0);

        agent.warp(&mut transform, Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(agent.destination, None);
        assert!(!agent.is_pending());
        assert_eq!(agent.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_stop_zeroes_velocity() {
        let mut agent = NavAgent {
            velocity: Vec3::ONE,
            ..default()
        };
        agent.set_stopped(true);
        assert!(agent.stopped);
        assert_eq!(agent.velocity, Vec3::ZERO);
    }
}
