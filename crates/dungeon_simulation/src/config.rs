//! Level config (JSON, load-time)
//!
//! Только числовые ошибки фатальны (NaN, отрицательные радиусы/длительности).
//! Пробелы в конфиге (нет checkpoints, нет стартов, нет respawn sets)
//! допустимы: машины деградируют через clamp / fallback.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::adversary::{AdversaryConfig, RespawnProgress};
use crate::navigation::{NavMesh, WalkableRect, WalkableRegions};
use crate::progression::{Checkpoint, CheckpointVolume, LevelStarts};
use crate::respawn::{RespawnPoints, RespawnSet};
use crate::spawn::{adversary_bundle, player_bundle};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read level config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse level config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Axis-aligned checkpoint volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeConfig {
    pub center: [f32; 3],
    pub half_extents: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespawnSetConfig {
    pub level_id: String,
    #[serde(default)]
    pub points: Vec<[f32; 3]>,
}

/// Walkable прямоугольник navmesh (XZ, высота пола)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkableRectConfig {
    pub min: [f32; 2],
    pub max: [f32; 2],
    #[serde(default)]
    pub height: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdversarySpawnConfig {
    /// None → adversary_starts[0] (или origin)
    pub position: Option<[f32; 3]>,
    pub waypoints: Vec<[f32; 3]>,
    pub settings: AdversaryConfig,
}

/// Описание уровня
///
/// `player_starts[i]` / `adversary_starts[i]` / `level_ids[i]` — сегмент i
/// (сегмент 0 = начальный spawn).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub checkpoints: Vec<VolumeConfig>,
    pub player_starts: Vec<[f32; 3]>,
    pub adversary_starts: Vec<[f32; 3]>,
    pub level_ids: Vec<String>,
    pub respawn_sets: Vec<RespawnSetConfig>,
    pub default_respawn: Option<[f32; 3]>,
    /// Пусто → navmesh не запечён (warp всегда raw)
    pub walkable: Vec<WalkableRectConfig>,
    pub adversary: Option<AdversarySpawnConfig>,
}

/// Entities созданные `LevelConfig::spawn`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedLevel {
    pub player: Entity,
    pub adversary: Option<Entity>,
    pub checkpoints: usize,
}

impl LevelConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: LevelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, volume) in self.checkpoints.iter().enumerate() {
            check_point(&format!("checkpoints[{}].center", i), volume.center)?;
            check_point(&format!("checkpoints[{}].half_extents", i), volume.half_extents)?;
        }

        for (name, points) in [
            ("player_starts", &self.player_starts),
            ("adversary_starts", &self.adversary_starts),
        ] {
            for (i, point) in points.iter().enumerate() {
                check_point(&format!("{}[{}]", name, i), *point)?;
            }
        }

        for (i, set) in self.respawn_sets.iter().enumerate() {
            for (j, point) in set.points.iter().enumerate() {
                check_point(&format!("respawn_sets[{}].points[{}]", i, j), *point)?;
            }
        }

        if let Some(point) = self.default_respawn {
            check_point("default_respawn", point)?;
        }

        for (i, rect) in self.walkable.iter().enumerate() {
            let field = format!("walkable[{}]", i);
            check_point(&field, [rect.min[0], rect.min[1], rect.height])?;
            check_point(&field, [rect.max[0], rect.max[1], rect.height])?;
        }

        if let Some(adversary) = &self.adversary {
            if let Some(position) = adversary.position {
                check_point("adversary.position", position)?;
            }
            for (i, point) in adversary.waypoints.iter().enumerate() {
                check_point(&format!("adversary.waypoints[{}]", i), *point)?;
            }
            validate_adversary(&adversary.settings)?;
        }

        Ok(())
    }

    /// Resources + entities уровня
    ///
    /// Игрок спавнится всегда (player_starts[0] или origin), противник —
    /// только если описан. RespawnProgress противника = level id сегмента 0.
    pub fn spawn(&self, world: &mut World) -> SpawnedLevel {
        let starts = LevelStarts {
            player_starts: self.player_starts.iter().copied().map(Vec3::from).collect(),
            adversary_starts: self.adversary_starts.iter().copied().map(Vec3::from).collect(),
            level_ids: self.level_ids.clone(),
        };
        let initial_level_id = starts.resolve(0).level_id;

        let respawn = RespawnPoints::new(
            self.respawn_sets
                .iter()
                .map(|set| RespawnSet::new(set.level_id.clone(), set.points.iter().copied().map(Vec3::from).collect()))
                .collect(),
            self.default_respawn.map(Vec3::from),
        );

        let navmesh = if self.walkable.is_empty() {
            NavMesh::unbaked()
        } else {
            NavMesh::new(WalkableRegions::new(
                self.walkable
                    .iter()
                    .map(|rect| WalkableRect::new(Vec2::from(rect.min), Vec2::from(rect.max), rect.height))
                    .collect(),
            ))
        };

        world.insert_resource(starts);
        world.insert_resource(respawn);
        world.insert_resource(navmesh);

        for (index, volume) in self.checkpoints.iter().enumerate() {
            let mut checkpoint = Checkpoint::new(
                index,
                CheckpointVolume::new(Vec3::from(volume.center), Vec3::from(volume.half_extents)),
            );
            // Видим только первый checkpoint ещё до первого кадра progression
            checkpoint.active = index == 0;
            world.spawn(checkpoint);
        }

        let player_start = self.player_starts.first().copied().map(Vec3::from).unwrap_or(Vec3::ZERO);
        let player = world.spawn(player_bundle(player_start)).id();

        let adversary = self.adversary.as_ref().map(|adversary| {
            let position = adversary
                .position
                .or_else(|| self.adversary_starts.first().copied())
                .map(Vec3::from)
                .unwrap_or(Vec3::ZERO);
            let waypoints = adversary.waypoints.iter().copied().map(Vec3::from).collect();

            world
                .spawn((
                    adversary_bundle(position, adversary.settings.clone(), waypoints),
                    RespawnProgress::new(initial_level_id.clone(), 0),
                ))
                .id()
        });

        crate::log_info(&format!(
            "🗺️ Level spawned: {} checkpoints, {} segments, {} respawn sets, adversary: {}",
            self.checkpoints.len(),
            self.player_starts.len(),
            self.respawn_sets.len(),
            adversary.is_some()
        ));

        SpawnedLevel {
            player,
            adversary,
            checkpoints: self.checkpoints.len(),
        }
    }
}

fn check_point(field: &str, point: [f32; 3]) -> Result<(), ConfigError> {
    if point.iter().all(|value| value.is_finite()) {
        return Ok(());
    }
    Err(ConfigError::InvalidValue {
        field: field.to_string(),
        reason: format!("non-finite coordinate in {:?}", point),
    })
}

fn validate_adversary(settings: &AdversaryConfig) -> Result<(), ConfigError> {
    let values = [
        ("sight_radius", settings.sight_radius),
        ("attack_radius", settings.attack_radius),
        ("waypoint_reach_distance", settings.waypoint_reach_distance),
        ("hit_cooldown_secs", settings.hit_cooldown_secs),
        ("respawn_immunity_secs", settings.respawn_immunity_secs),
        ("overlay_secs", settings.overlay_secs),
        ("navmesh_sample_radius", settings.navmesh_sample_radius),
        ("hysteresis_margin", settings.hysteresis_margin),
    ];

    for (name, value) in values {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: format!("adversary.settings.{}", name),
                reason: format!("expected a finite non-negative number, got {}", value),
            });
        }
    }

    if !settings.respawn_y_offset.is_finite() {
        return Err(ConfigError::InvalidValue {
            field: "adversary.settings.respawn_y_offset".to_string(),
            reason: format!("expected a finite number, got {}", settings.respawn_y_offset),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adversary::LockoutBehavior;
    use crate::components::{Adversary, Player};

    const LEVEL_JSON: &str = r#"{
        "checkpoints": [
            { "center": [0.0, 1.0, 10.0], "half_extents": [2.0, 2.0, 1.0] },
            { "center": [0.0, 1.0, 30.0], "half_extents": [2.0, 2.0, 1.0] }
        ],
        "player_starts": [[0.0, 0.0, 0.0], [0.0, 0.0, 15.0], [0.0, 0.0, 35.0]],
        "adversary_starts": [[5.0, 0.0, 5.0]],
        "level_ids": ["Crypt", "", "Tower"],
        "respawn_sets": [{ "level_id": "Crypt", "points": [[0.0, 0.0, 1.0]] }],
        "walkable": [{ "min": [-10.0, -10.0], "max": [10.0, 50.0] }],
        "adversary": {
            "waypoints": [[5.0, 0.0, 5.0], [-5.0, 0.0, 5.0]],
            "settings": { "sight_radius": 12.0, "lockout_behavior": "HoldPosition" }
        }
    }"#;

    #[test]
    fn test_parse_level_with_partial_settings() {
        let config = LevelConfig::from_json_str(LEVEL_JSON).unwrap();

        assert_eq!(config.checkpoints.len(), 2);
        assert_eq!(config.walkable[0].height, 0.0);

        let adversary = config.adversary.unwrap();
        assert_eq!(adversary.settings.sight_radius, 12.0);
        assert_eq!(adversary.settings.lockout_behavior, LockoutBehavior::HoldPosition);
        // Не указанные поля — defaults
        assert_eq!(adversary.settings.attack_radius, 1.0);
        assert_eq!(adversary.settings.overlay_secs, 0.8);
    }

    #[test]
    fn test_empty_level_is_valid() {
        let config = LevelConfig::from_json_str("{}").unwrap();
        assert!(config.checkpoints.is_empty());
        assert!(config.adversary.is_none());
    }

    #[test]
    fn test_negative_duration_rejected() {
        let json = r#"{ "adversary": { "settings": { "hit_cooldown_secs": -1.0 } } }"#;
        let error = LevelConfig::from_json_str(json).unwrap_err();

        match error {
            ConfigError::InvalidValue { field, .. } => {
                assert_eq!(field, "adversary.settings.hit_cooldown_secs");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let error = LevelConfig::from_json_str("{ \"checkpoints\": 5 }").unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let error = LevelConfig::from_path("/definitely/not/here/level.json").unwrap_err();
        assert!(matches!(error, ConfigError::Io { .. }));
    }

    #[test]
    fn test_spawn_builds_world() {
        let config = LevelConfig::from_json_str(LEVEL_JSON).unwrap();
        let mut world = World::new();

        let spawned = config.spawn(&mut world);

        assert_eq!(spawned.checkpoints, 2);
        assert!(world.get::<Player>(spawned.player).is_some());

        let adversary = spawned.adversary.unwrap();
        assert!(world.get::<Adversary>(adversary).is_some());
        assert_eq!(world.get::<Transform>(adversary).unwrap().translation, Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(world.get::<RespawnProgress>(adversary).unwrap().level_id, "Crypt");

        let starts = world.resource::<LevelStarts>();
        // Пустой id → сгенерированный
        assert_eq!(starts.resolve(1).level_id, "Level2");
        assert_eq!(starts.resolve(9).level_id, "Tower");

        let mut checkpoints = world.query::<&Checkpoint>();
        let active: Vec<usize> = checkpoints
            .iter(&world)
            .filter(|checkpoint| checkpoint.active)
            .map(|checkpoint| checkpoint.index)
            .collect();
        assert_eq!(active, vec![0]);

        assert!(world.resource::<NavMesh>().is_baked());
        assert_eq!(
            world.resource::<RespawnPoints>().resolve("Crypt", 4, Vec3::ZERO),
            Vec3::new(0.0, 0.0, 1.0)
        );
    }
}
