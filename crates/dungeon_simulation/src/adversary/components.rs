//! Adversary компоненты: config, shared respawn state, lockout, patrol cursor

use std::time::Duration;

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;
use serde::{Deserialize, Serialize};
use crate::adversary::AdversaryMode;

/// Поведение Attack mode пока удар заблокирован (lockout)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum LockoutBehavior {
    /// Продолжать идти к игроку (атакующий сохраняет позицию)
    #[default]
    KeepApproaching,
    /// Стоять на месте до unlock
    HoldPosition,
}

/// Параметры противника (load-time)
#[derive(Component, Debug, Clone, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AdversaryConfig {
    /// Радиус обнаружения игрока (метры)
    pub sight_radius: f32,
    /// Радиус атаки (метры)
    pub attack_radius: f32,
    /// Patrol: waypoint считается достигнутым на этой дистанции
    pub waypoint_reach_distance: f32,
    /// Минимум между ударами (секунды, pause-immune clock)
    pub hit_cooldown_secs: f32,
    /// Подъём respawn позиции над полом
    pub respawn_y_offset: f32,
    /// Неуязвимость игрока после закрытия overlay (секунды)
    pub respawn_immunity_secs: f32,
    /// Длительность hit overlay (секунды, global time заморожен)
    pub overlay_secs: f32,
    /// Радиус поиска walkable точки при warp
    pub navmesh_sample_radius: f32,
    /// Категории "player-like" коллайдеров (rapier Group bits)
    pub player_filter_bits: u32,
    /// Hysteresis для Patrol/Chase/Attack (0 = выключен)
    pub hysteresis_margin: f32,
    pub lockout_behavior: LockoutBehavior,
}

impl Default for AdversaryConfig {
    fn default() -> Self {
        Self {
            sight_radius: 25.0,
            attack_radius: 1.0,
            waypoint_reach_distance: 1.0,
            hit_cooldown_secs: 1.5,
            respawn_y_offset: 0.3,
            respawn_immunity_secs: 1.0,
            overlay_secs: 0.8,
            navmesh_sample_radius: 2.0,
            player_filter_bits: crate::spatial::PLAYER_GROUP.bits(),
            hysteresis_margin: 0.0,
            lockout_behavior: LockoutBehavior::KeepApproaching,
        }
    }
}

impl AdversaryConfig {
    pub fn player_filter(&self) -> Group {
        Group::from_bits_truncate(self.player_filter_bits)
    }

    pub fn hit_cooldown(&self) -> Duration {
        secs_to_duration(self.hit_cooldown_secs)
    }

    pub fn respawn_immunity(&self) -> Duration {
        secs_to_duration(self.respawn_immunity_secs)
    }

    pub fn overlay_duration(&self) -> Duration {
        secs_to_duration(self.overlay_secs)
    }
}

/// Отрицательные/NaN/бесконечные секунды → 0 (конфиг валидируется при загрузке)
fn secs_to_duration(secs: f32) -> Duration {
    Duration::try_from_secs_f32(secs).unwrap_or(Duration::ZERO)
}

/// Shared state: где респавнить игрока после удара
///
/// Пишет только progression (целиком, парой), читает только hit handling.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct RespawnProgress {
    pub level_id: String,
    /// Индекс в RespawnSet уровня
    pub checkpoint: usize,
}

impl Default for RespawnProgress {
    fn default() -> Self {
        Self::new(crate::progression::default_level_id(0), 0)
    }
}

impl RespawnProgress {
    pub fn new(level_id: impl Into<String>, checkpoint: usize) -> Self {
        Self {
            level_id: level_id.into(),
            checkpoint,
        }
    }
}

/// Последний классифицированный mode (только для логов и hysteresis)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct AdversaryState {
    pub mode: Option<AdversaryMode>,
    /// Off-navmesh warning уже залогирован
    pub warned_off_surface: bool,
}

/// Handle на игрока
///
/// Пере-резолвится через `Player` marker только когда handle протух.
/// `learned_filter` — memberships найденного игрока, добавленные к фильтру
/// из конфига (игрок не на ожидаемом слое всё равно детектится).
#[derive(Component, Debug, Clone)]
pub struct AdversaryTarget {
    pub player: Option<Entity>,
    pub learned_filter: Group,
}

impl Default for AdversaryTarget {
    fn default() -> Self {
        Self {
            player: None,
            learned_filter: Group::NONE,
        }
    }
}

impl AdversaryTarget {
    pub fn filter(&self, config: &AdversaryConfig) -> Group {
        config.player_filter() | self.learned_filter
    }

    /// Валидный handle или повторный поиск
    ///
    /// `is_valid` — жив ли текущий handle, `lookup` — поиск игрока
    /// (entity + его collision memberships).
    pub fn resolve(
        &mut self,
        is_valid: impl Fn(Entity) -> bool,
        lookup: impl FnOnce() -> Option<(Entity, Option<Group>)>,
    ) -> Option<Entity> {
        if let Some(player) = self.player {
            if is_valid(player) {
                return Some(player);
            }
            crate::log_warning(&format!("👻 Player handle {:?} is stale, searching again", player));
            self.player = None;
        }

        let (player, memberships) = lookup()?;
        self.attach(player, memberships);
        Some(player)
    }

    pub fn attach(&mut self, player: Entity, memberships: Option<Group>) {
        self.player = Some(player);

        if let Some(memberships) = memberships {
            if !self.learned_filter.contains(memberships) {
                self.learned_filter = self.learned_filter | memberships;
            }
        }

        crate::log(&format!(
            "👁️ Adversary target → player {:?} (learned filter bits {:#b})",
            player,
            self.learned_filter.bits()
        ));
    }
}

/// Patrol cursor: циклический индекс в waypoints
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PatrolRoute {
    pub waypoints: Vec<Vec3>,
    pub cursor: usize,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self { waypoints, cursor: 0 }
    }

    pub fn current(&self) -> Option<Vec3> {
        if self.waypoints.is_empty() {
            return None;
        }
        self.waypoints.get(self.cursor % self.waypoints.len()).copied()
    }

    /// После последнего waypoint → 0
    pub fn advance(&mut self) {
        if self.waypoints.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.waypoints.len();
    }
}

/// Hit lockout (pause-immune timestamps, `Time<Real>`)
///
/// Инвариант: пока `is_locked`, ни один удар не принимается. Дополнительно
/// cooldown от `last_hit` и immunity до `next_allowed`.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HitLockout {
    pub is_locked: bool,
    pub last_hit: Option<Duration>,
    pub next_allowed: Duration,
}

impl HitLockout {
    pub fn is_open(&self, now: Duration, cooldown: Duration) -> bool {
        if self.is_locked || now < self.next_allowed {
            return false;
        }

        match self.last_hit {
            Some(last_hit) => now.saturating_sub(last_hit) >= cooldown,
            None => true,
        }
    }

    /// Gate: проверка + lock одним шагом (до любых side effects)
    pub fn try_lock(&mut self, now: Duration, cooldown: Duration) -> bool {
        if !self.is_open(now, cooldown) {
            return false;
        }
        self.is_locked = true;
        true
    }

    /// Удар не состоялся (игрока нет) — снять lock без immunity
    pub fn abort(&mut self) {
        self.is_locked = false;
    }

    /// Overlay закрылся: unlock, cooldown и immunity считаются от `now`
    pub fn release(&mut self, now: Duration, immunity: Duration) {
        self.is_locked = false;
        self.last_hit = Some(now);
        self.next_allowed = now + immunity;
    }
}

/// Ожидание закрытия hit overlay (explicit timer на pause-immune clock)
///
/// Новый удар заменяет компонент (insert) — два таймера одновременно невозможны.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
pub struct PendingRecovery {
    pub ends_at: Duration,
}

/// Resource: time scale до заморозки hit overlay'ем
///
/// Захватывается при первой заморозке, восстанавливается когда закрылся
/// последний pending overlay.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct HitFreeze {
    pub restore_speed: Option<f32>,
}
