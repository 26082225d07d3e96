//! Headless симуляция checkpoint уровня
//!
//! `dungeon_simulation [level.json]` — без аргумента грузит встроенный
//! demo уровень. Скриптовый "игрок" идёт прямо к активному checkpoint'у.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use dungeon_simulation::progression::Checkpoint;
use dungeon_simulation::*;

const DEMO_LEVEL: &str = include_str!("../demos/crypt.json");

/// Скорость скриптового игрока (m/s)
const WALKER_SPEED: f32 = 4.0;

const MAX_TICKS: u32 = 3600;

/// Система: velocity контроллера → к центру активного checkpoint'а
fn walk_to_active_checkpoint(
    mut walkers: Query<(&Transform, &mut CharacterController), With<Player>>,
    checkpoints: Query<&Checkpoint>,
) {
    let target = checkpoints
        .iter()
        .find(|checkpoint| checkpoint.active)
        .map(|checkpoint| checkpoint.volume.center);

    for (transform, mut controller) in walkers.iter_mut() {
        controller.velocity = match target {
            Some(center) => {
                let flat = Vec3::new(center.x, transform.translation.y, center.z) - transform.translation;
                flat.normalize_or_zero() * WALKER_SPEED
            }
            None => Vec3::ZERO,
        };
    }
}

fn load_level() -> Result<LevelConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log_info(&format!("Loading level from {}", path));
            LevelConfig::from_path(path)
        }
        None => {
            log_info("Loading built-in demo level");
            LevelConfig::from_json_str(DEMO_LEVEL)
        }
    }
}

fn main() {
    println!("Starting dungeon headless simulation");

    let mut app = create_headless_app();
    set_log_level(LogLevel::Info);

    let level = match load_level() {
        Ok(level) => level,
        Err(error) => {
            log_error(&format!("❌ {}", error));
            std::process::exit(1);
        }
    };

    let spawned = level.spawn(app.world_mut());

    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .add_plugins((SimulationPlugin, HeadlessNavigationPlugin))
        .add_systems(Update, walk_to_active_checkpoint.before(SimulationSet::Progression));

    for tick in 0..MAX_TICKS {
        app.update();

        let Some(progress) = app.world().get::<CheckpointProgress>(spawned.player) else {
            break;
        };
        let current = progress.current;

        if tick % 60 == 0 {
            let position = app
                .world()
                .get::<Transform>(spawned.player)
                .map(|transform| transform.translation)
                .unwrap_or_default();
            println!(
                "Tick {}: checkpoint {}/{}, player at {:.1?}",
                tick, current, spawned.checkpoints, position
            );
        }

        if spawned.checkpoints > 0 && current >= spawned.checkpoints {
            println!("Level completed at tick {}", tick);
            break;
        }
    }

    println!("Simulation complete!");
}
