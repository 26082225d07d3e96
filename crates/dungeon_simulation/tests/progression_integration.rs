//! Progression integration test
//!
//! Уровень из JSON → SimulationPlugin + HeadlessNavigationPlugin:
//! checkpoint advance переносит противника на старт сегмента и меняет
//! respawn set, которым пользуется следующий удар.

use std::time::Duration;

use bevy::ecs::event::EventCursor;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use dungeon_simulation::*;

const LEVEL_JSON: &str = r#"{
    "checkpoints": [
        { "center": [0.0, 1.0, 10.0], "half_extents": [3.0, 2.0, 1.0] },
        { "center": [0.0, 1.0, 30.0], "half_extents": [3.0, 2.0, 1.0] }
    ],
    "player_starts": [[0.0, 0.0, 0.0], [0.0, 0.0, 15.0], [0.0, 0.0, 35.0]],
    "adversary_starts": [[20.0, 0.0, 0.0], [20.0, 0.5, 15.0]],
    "level_ids": ["Crypt", "Ossuary"],
    "respawn_sets": [
        { "level_id": "Crypt", "points": [[0.0, 0.0, 1.0]] },
        { "level_id": "Ossuary", "points": [[0.0, 0.0, 16.0]] }
    ],
    "walkable": [{ "min": [-30.0, -30.0], "max": [30.0, 60.0] }],
    "adversary": { "settings": { "sight_radius": 3.0 } }
}"#;

/// Helper: App с загруженным уровнем
fn create_level_app() -> (App, SpawnedLevel) {
    let mut app = create_headless_app();
    let level = LevelConfig::from_json_str(LEVEL_JSON).unwrap();
    let spawned = level.spawn(app.world_mut());

    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
        .add_plugins((SimulationPlugin, HeadlessNavigationPlugin));

    (app, spawned)
}

fn move_player(app: &mut App, player: Entity, position: Vec3) {
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
        transform.translation = position;
    }
}

/// Helper: события типа `E`, накопленные с прошлого чтения
struct EventLog<E: Event> {
    cursor: EventCursor<E>,
}

impl<E: Event + Clone> EventLog<E> {
    fn new(app: &App) -> Self {
        Self {
            cursor: app.world().resource::<Events<E>>().get_cursor(),
        }
    }

    fn drain(&mut self, app: &App) -> Vec<E> {
        self.cursor.read(app.world().resource::<Events<E>>()).cloned().collect()
    }
}

/// Test: checkpoint → сегмент "Ossuary" → удар респавнит в Ossuary set
#[test]
fn test_checkpoint_switches_respawn_set() {
    let (mut app, spawned) = create_level_app();
    let player = spawned.player;
    let adversary = spawned.adversary.unwrap();
    let mut advanced_log = EventLog::<CheckpointAdvanced>::new(&app);
    let mut hit_log = EventLog::<HitAccepted>::new(&app);

    app.update();
    assert!(advanced_log.drain(&app).is_empty());
    assert_eq!(
        app.world().get::<RespawnProgress>(adversary).unwrap(),
        &RespawnProgress::new("Crypt", 0)
    );

    move_player(&mut app, player, Vec3::new(0.0, 0.0, 10.0));
    app.update();

    let advanced = advanced_log.drain(&app);
    assert_eq!(advanced.len(), 1);
    assert_eq!(advanced[0].level_id, "Ossuary");
    assert_eq!(app.world().get::<Transform>(player).unwrap().translation, Vec3::new(0.0, 0.0, 15.0));

    // Противник на старте сегмента, посажен на navmesh (y = 0)
    assert_eq!(
        app.world().get::<Transform>(adversary).unwrap().translation,
        Vec3::new(20.0, 0.0, 15.0)
    );
    assert_eq!(
        app.world().get::<RespawnProgress>(adversary).unwrap(),
        &RespawnProgress::new("Ossuary", 0)
    );

    // Игрок вплотную к противнику → удар
    move_player(&mut app, player, Vec3::new(20.0, 0.0, 15.5));
    app.update();

    let hits = hit_log.drain(&app);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].respawn_position, Vec3::new(0.0, 0.3, 16.0));
}

/// Test: последний checkpoint → completed + LevelCompleted cue
#[test]
fn test_level_completion() {
    let (mut app, spawned) = create_level_app();
    let player = spawned.player;
    let mut advanced_log = EventLog::<CheckpointAdvanced>::new(&app);
    let mut cue_log = EventLog::<AudioCue>::new(&app);

    app.update();

    move_player(&mut app, player, Vec3::new(0.0, 0.0, 10.0));
    app.update();
    let advanced = advanced_log.drain(&app);
    assert_eq!(advanced.len(), 1);
    assert!(!advanced[0].completed);
    cue_log.drain(&app);

    move_player(&mut app, player, Vec3::new(0.0, 0.0, 30.0));
    app.update();

    let advanced = advanced_log.drain(&app);
    assert_eq!(advanced.len(), 1);
    assert!(advanced[0].completed);
    assert_eq!(advanced[0].index, 2);

    let cues = cue_log.drain(&app);
    assert!(cues.contains(&AudioCue::LevelCompleted));

    // Сегмент 2 без adversary start → RespawnProgress всё равно обновлён
    let adversary = spawned.adversary.unwrap();
    assert_eq!(
        app.world().get::<RespawnProgress>(adversary).unwrap().level_id,
        "Level3"
    );
    assert_eq!(
        app.world().get::<CheckpointProgress>(player).unwrap().current,
        spawned.checkpoints
    );
}
