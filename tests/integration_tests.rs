use std::io::Write;

use tile_chase::{
    assets::{load_tilemap, AssetError},
    game::{
        config::{PLAYER_SPEED, TILE_SIZE},
        input::{Direction, InputSnapshot},
        math::Vector2F
    },
    rendering::compose_frame,
    simulation::simulate
};

fn write_tilemap(width: u32, height: u32) -> tempfile::NamedTempFile {
    let data: Vec<String> = (0..width * height).map(|i| (i % 5).to_string()).collect();
    let json = format!(
        r#"{{ "layers": [ {{ "data": [{}], "width": {width}, "height": {height}, "name": "Floor" }} ], "tilewidth": 16 }}"#,
        data.join(",")
    );

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_simulate_walking_right_from_file() {
    let file = write_tilemap(40, 30);
    let tilemap = load_tilemap(file.path()).unwrap();
    assert_eq!(tilemap.pixel_size(TILE_SIZE), Vector2F::new(640.0, 480.0));

    let summary = simulate(&tilemap, 60, &InputSnapshot::holding(&[Direction::Right]));
    let world = &summary.world;

    assert_eq!(world.ticks(), 60);
    assert_eq!(world.player.position, Vector2F::new(60.0 * PLAYER_SPEED, 100.0));

    // Player crosses the first potion (x=80) on tick 41 and the second (x=100) on tick 51.
    assert_eq!(summary.potions_triggered, 20 + 10);
    assert_eq!(world.player.health, 130.0);

    // The idle skeleton stays where it spawned.
    assert_eq!(world.enemies[1].position, Vector2F::new(75.0, 75.0));

    // Player at (120, 100): both axes clamp to the map's top-left corner.
    assert_eq!(world.camera.offset, Vector2F::new(0.0, 0.0));
}

#[test]
fn test_simulate_without_input_lets_enemies_close_in() {
    let file = write_tilemap(40, 30);
    let tilemap = load_tilemap(file.path()).unwrap();

    let summary = simulate(&tilemap, 200, &InputSnapshot::default());
    let world = &summary.world;

    assert_eq!(world.player.position, Vector2F::new(0.0, 100.0));
    assert_eq!(world.player.health, 100.0);
    assert_eq!(summary.potions_triggered, 0);

    // (50, 50) reaches the player's row after 50 ticks and column after 50 ticks.
    assert_eq!(world.enemies[0].position, Vector2F::new(0.0, 100.0));
    // (150, 150) needs 150 ticks on x and 50 on y.
    assert_eq!(world.enemies[2].position, Vector2F::new(0.0, 100.0));
}

#[test]
fn test_small_map_is_centered_in_viewport() {
    let file = write_tilemap(10, 30);
    let tilemap = load_tilemap(file.path()).unwrap();

    let summary = simulate(&tilemap, 1, &InputSnapshot::holding(&[Direction::Down]));
    assert_eq!(summary.world.camera.offset.x, 80.0);
    assert_eq!(summary.world.camera.offset.y, 0.0);
}

#[test]
fn test_frame_after_simulation_has_tiles_and_sprites() {
    let file = write_tilemap(4, 4);
    let tilemap = load_tilemap(file.path()).unwrap();
    let summary = simulate(&tilemap, 3, &InputSnapshot::default());

    let draws = compose_frame(&summary.world, &tilemap);
    // Ids cycle 0..5, so 4 of the 16 cells are empty.
    assert_eq!(draws.len(), 12 + 1 + 3 + 2);
}

#[test]
fn test_summary_serializes_to_json() {
    let file = write_tilemap(40, 30);
    let tilemap = load_tilemap(file.path()).unwrap();
    let summary = simulate(&tilemap, 1, &InputSnapshot::default());

    let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["ticks"], 1);
    assert_eq!(json["world"]["player"]["health"], 100.0);
    assert_eq!(json["world"]["enemies"].as_array().unwrap().len(), 3);
    assert_eq!(json["world"]["camera"]["offset"]["x"], 0.0);
}

#[test]
fn test_broken_tilemap_file_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();
    let result = load_tilemap(file.path());
    assert!(matches!(result, Err(AssetError::TilemapError { .. })));
}
