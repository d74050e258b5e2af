// Simulation
pub const PLAYER_SPEED: f32 = 2.0;
pub const ENEMY_CHASE_STEP: f32 = 1.0;
pub const PLAYER_START_HEALTH: f32 = 100.0;
pub const TICKS_PER_SECOND: u32 = 60;

// Map
pub const TILE_SIZE: u32 = 16;
pub const TILESET_COLUMNS: u32 = 22;

/// Size of every entity sprite, cut from the top-left corner of its image.
pub const SPRITE_SIZE: u32 = 16;

// Logical resolution the camera works in, independent of the window size.
pub const VIEWPORT_WIDTH: u32 = 320;
pub const VIEWPORT_HEIGHT: u32 = 240;

// Initial window
pub const WINDOW_WIDTH: u32 = 640;
pub const WINDOW_HEIGHT: u32 = 480;
pub const WINDOW_TITLE: &str = "Tile Chase";

pub const BACKGROUND_COLOR: [u8; 3] = [120, 180, 255];

pub fn viewport_size() -> super::math::Vector2F {
    super::math::Vector2F::new(VIEWPORT_WIDTH as f32, VIEWPORT_HEIGHT as f32)
}
