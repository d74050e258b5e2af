use serde::Serialize;

use super::{
    camera::Camera,
    config::{
        viewport_size,
        ENEMY_CHASE_STEP,
        PLAYER_SPEED,
        PLAYER_START_HEALTH,
        TILE_SIZE
    },
    entities::{
        Enemy,
        Player,
        Potion
    },
    input::{
        Direction,
        InputSnapshot
    },
    math::Vector2F,
    tilemap::TilemapJson
};

/// Game session state, mutated in place once per tick.
#[derive(Debug, Clone, Serialize)]
pub struct World {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub potions: Vec<Potion>,
    pub camera: Camera,
    map_size: Vector2F,
    ticks: u64,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub potions_triggered: usize,
}

impl World {
    pub fn new(player: Player, map_size: Vector2F) -> Self {
        log::info!("World created, map size {map_size}");
        Self {
            player,
            enemies: vec![],
            potions: vec![],
            camera: Camera::new(0.0, 0.0),
            map_size,
            ticks: 0,
        }
    }

    /// The starting layout of the demo level.
    pub fn spawn(tilemap: &TilemapJson) -> Self {
        let mut world = Self::new(
            Player::new(Vector2F::new(0.0, 100.0), PLAYER_START_HEALTH),
            tilemap.pixel_size(TILE_SIZE)
        );

        world.add_enemy(Enemy::new(Vector2F::new(50.0, 50.0), true));
        world.add_enemy(Enemy::new(Vector2F::new(75.0, 75.0), false));
        world.add_enemy(Enemy::new(Vector2F::new(150.0, 150.0), true));

        world.add_potion(Potion::new(Vector2F::new(80.0, 50.0), 1.0));
        world.add_potion(Potion::new(Vector2F::new(100.0, 20.0), 1.0));
        world
    }

    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    pub fn add_potion(&mut self, potion: Potion) {
        self.potions.push(potion);
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick(&mut self, input: &InputSnapshot) -> TickReport {
        log::trace!("World tick {}", self.ticks);
        self.ticks += 1;

        self.move_player(input);
        self.chase_player();
        let potions_triggered = self.apply_potions();
        self.update_camera();

        log::trace!(" - player {:?}, camera {}", self.player, self.camera.offset);
        TickReport { potions_triggered }
    }

    fn move_player(&mut self, input: &InputSnapshot) {
        // Each held key applies on its own: opposite keys cancel, diagonals are not normalized.
        let moves = [
            (Direction::Right, Vector2F::new(PLAYER_SPEED, 0.0)),
            (Direction::Left, Vector2F::new(-PLAYER_SPEED, 0.0)),
            (Direction::Up, Vector2F::new(0.0, -PLAYER_SPEED)),
            (Direction::Down, Vector2F::new(0.0, PLAYER_SPEED)),
        ];

        for (direction, delta) in moves {
            if input.is_held(direction) {
                self.player.position += delta;
            }
        }
    }

    fn chase_player(&mut self) {
        let target = self.player.position;
        self.enemies
            .iter_mut()
            .filter(|enemy| enemy.follows_player)
            .for_each(|enemy| {
                enemy.position = enemy.position.step_toward(target, ENEMY_CHASE_STEP);
            });
    }

    fn apply_potions(&mut self) -> usize {
        let mut triggered = 0;
        for potion in self.potions.iter() {
            if potion.is_triggered_by(&self.player) {
                self.player.health += potion.heal_amount;
                triggered += 1;
                log::debug!("Health: {}", self.player.health);
            }
        }
        triggered
    }

    fn update_camera(&mut self) {
        let viewport = viewport_size();
        self.camera.follow_target(self.player.position.x, self.player.position.y, viewport.x, viewport.y);
        self.camera.constrain(self.map_size.x, self.map_size.y, viewport.x, viewport.y);
    }
}

#[cfg(test)]
fn test_world(player_position: Vector2F) -> World {
    World::new(Player::new(player_position, 100.0), Vector2F::new(1000.0, 800.0))
}

#[test]
fn test_tuning_constants() {
    assert_eq!(PLAYER_SPEED, 2.0);
    assert_eq!(ENEMY_CHASE_STEP, 1.0);
    assert_eq!(TILE_SIZE, 16);
}

#[test]
fn test_holding_right_moves_exactly_speed_per_tick() {
    let mut world = test_world(Vector2F::new(0.0, 100.0));
    let input = InputSnapshot::holding(&[Direction::Right]);
    for n in 1..=500u32 {
        world.tick(&input);
        assert_eq!(world.player.position.x, n as f32 * PLAYER_SPEED);
        assert_eq!(world.player.position.y, 100.0);
    }
}

#[test]
fn test_no_input_keeps_player_still() {
    let mut world = test_world(Vector2F::new(10.0, 10.0));
    world.tick(&InputSnapshot::default());
    assert_eq!(world.player.position, Vector2F::new(10.0, 10.0));
}

#[test]
fn test_diagonal_movement_is_not_normalized() {
    let mut world = test_world(Vector2F::new(100.0, 100.0));
    world.tick(&InputSnapshot::holding(&[Direction::Up, Direction::Left]));
    assert_eq!(world.player.position, Vector2F::new(98.0, 98.0));

    world.tick(&InputSnapshot::holding(&[Direction::Down, Direction::Right]));
    assert_eq!(world.player.position, Vector2F::new(100.0, 100.0));
}

#[test]
fn test_opposite_keys_cancel() {
    let mut world = test_world(Vector2F::new(100.0, 100.0));
    world.tick(&InputSnapshot::holding(&[Direction::Left, Direction::Right, Direction::Up]));
    assert_eq!(world.player.position, Vector2F::new(100.0, 98.0));
}

#[test]
fn test_following_enemy_steps_until_aligned() {
    let mut world = test_world(Vector2F::new(0.0, 100.0));
    world.add_enemy(Enemy::new(Vector2F::new(5.0, 97.0), true));

    let still = InputSnapshot::default();
    world.tick(&still);
    assert_eq!(world.enemies[0].position, Vector2F::new(4.0, 98.0));
    world.tick(&still);
    world.tick(&still);
    assert_eq!(world.enemies[0].position, Vector2F::new(2.0, 100.0));

    // y is aligned now and stays put while x keeps closing in.
    world.tick(&still);
    world.tick(&still);
    assert_eq!(world.enemies[0].position, Vector2F::new(0.0, 100.0));
    world.tick(&still);
    assert_eq!(world.enemies[0].position, Vector2F::new(0.0, 100.0));
}

#[test]
fn test_following_enemy_within_step_oscillates() {
    let mut world = test_world(Vector2F::new(10.0, 10.0));
    world.add_enemy(Enemy::new(Vector2F::new(9.5, 10.0), true));

    let still = InputSnapshot::default();
    world.tick(&still);
    assert_eq!(world.enemies[0].position.x, 10.5);
    world.tick(&still);
    assert_eq!(world.enemies[0].position.x, 9.5);
    world.tick(&still);
    assert_eq!(world.enemies[0].position.x, 10.5);
    assert_eq!(world.enemies[0].position.y, 10.0);
}

#[test]
fn test_non_following_enemy_never_moves() {
    let mut world = test_world(Vector2F::new(0.0, 100.0));
    world.add_enemy(Enemy::new(Vector2F::new(75.0, 75.0), false));

    let inputs = [
        InputSnapshot::holding(&[Direction::Right]),
        InputSnapshot::holding(&[Direction::Down, Direction::Left]),
        InputSnapshot::default(),
    ];
    for _ in 0..50 {
        for input in inputs.iter() {
            world.tick(input);
            assert_eq!(world.enemies[0].position, Vector2F::new(75.0, 75.0));
        }
    }
}

#[test]
fn test_potion_heals_every_tick_past_its_x() {
    let mut world = test_world(Vector2F::new(81.0, 0.0));
    world.add_potion(Potion::new(Vector2F::new(80.0, 50.0), 2.5));

    let still = InputSnapshot::default();
    for n in 1..=1000u32 {
        let report = world.tick(&still);
        assert_eq!(report.potions_triggered, 1);
        assert_eq!(world.player.health, 100.0 + n as f32 * 2.5);
    }
    assert_eq!(world.potions.len(), 1);
}

#[test]
fn test_potion_not_triggered_at_or_before_its_x() {
    let mut world = test_world(Vector2F::new(80.0, 50.0));
    world.add_potion(Potion::new(Vector2F::new(80.0, 50.0), 1.0));

    let report = world.tick(&InputSnapshot::default());
    assert_eq!(report.potions_triggered, 0);
    assert_eq!(world.player.health, 100.0);
}

#[test]
fn test_camera_follows_player_within_map() {
    let mut world = test_world(Vector2F::new(0.0, 0.0));
    world.tick(&InputSnapshot::default());
    assert_eq!(world.camera.offset, Vector2F::new(0.0, 0.0));

    world.player.position = Vector2F::new(500.0, 400.0);
    world.tick(&InputSnapshot::default());
    assert_eq!(world.camera.offset, Vector2F::new(-340.0, -280.0));

    world.player.position = Vector2F::new(900.0, 790.0);
    world.tick(&InputSnapshot::default());
    assert_eq!(world.camera.offset, Vector2F::new(-680.0, -560.0));
}

#[test]
fn test_spawn_layout() {
    let tilemap = TilemapJson::from_json_str(
        r#"{ "layers": [ { "data": [], "width": 40, "height": 30 } ] }"#
    ).unwrap();
    let world = World::spawn(&tilemap);

    assert_eq!(world.player.position, Vector2F::new(0.0, 100.0));
    assert_eq!(world.player.health, PLAYER_START_HEALTH);
    assert_eq!(world.enemies.len(), 3);
    assert_eq!(world.enemies.iter().filter(|e| e.follows_player).count(), 2);
    assert_eq!(world.potions.len(), 2);
    assert_eq!(world.map_size, Vector2F::new(640.0, 480.0));
    assert_eq!(world.ticks(), 0);
}
