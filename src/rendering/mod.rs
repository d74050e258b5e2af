pub mod renderer;

use crate::{
    assets::TextureId,
    game::{
        config::{
            SPRITE_SIZE,
            TILESET_COLUMNS,
            TILE_SIZE
        },
        entities::Sprite,
        math::{
            Rect2F,
            Rect2U,
            Vector2F
        },
        tilemap::TilemapJson,
        world::World
    }
};

/// One textured quad in logical viewport pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteDraw {
    pub texture: TextureId,
    pub dest: Rect2F,
    /// Source rectangle in texels of `texture`.
    pub src: Rect2U,
}

/// Area of the window the logical frame is scaled into.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Tileset cell for a 1-based tile id, `None` for the empty id 0.
pub fn tileset_source(id: u32) -> Option<Rect2U> {
    let index = id.checked_sub(1)?;
    Some(Rect2U::new(
        (index % TILESET_COLUMNS) * TILE_SIZE,
        (index / TILESET_COLUMNS) * TILE_SIZE,
        TILE_SIZE,
        TILE_SIZE
    ))
}

/// Draw list for one frame: tiles layer by layer, then player, enemies, potions.
pub fn compose_frame(world: &World, tilemap: &TilemapJson) -> Vec<SpriteDraw> {
    let camera = world.camera;
    let tile_size = TILE_SIZE as f32;
    let mut draws = Vec::new();

    for layer in tilemap.layers.iter() {
        for (column, row, id) in layer.tiles() {
            let Some(src) = tileset_source(id) else {
                continue;
            };
            let position = camera.world_to_screen(Vector2F::new(
                column as f32 * tile_size,
                row as f32 * tile_size
            ));
            draws.push(SpriteDraw {
                texture: TextureId::Tileset,
                dest: Rect2F::new(position.x, position.y, tile_size, tile_size),
                src,
            });
        }
    }

    let sprites = std::iter::once(&world.player as &dyn Sprite)
        .chain(world.enemies.iter().map(|e| e as &dyn Sprite))
        .chain(world.potions.iter().map(|p| p as &dyn Sprite));

    let sprite_size = SPRITE_SIZE as f32;
    for sprite in sprites {
        let position = camera.world_to_screen(sprite.position());
        draws.push(SpriteDraw {
            texture: TextureId::Sprite(sprite.sprite_kind()),
            dest: Rect2F::new(position.x, position.y, sprite_size, sprite_size),
            src: Rect2U::new(0, 0, SPRITE_SIZE, SPRITE_SIZE),
        });
    }

    draws
}

/// Largest uniformly scaled logical frame that fits the window, centered.
pub fn letterbox_viewport(physical_width: u32, physical_height: u32, logical_width: u32, logical_height: u32) -> Viewport {
    if logical_width == 0 || logical_height == 0 {
        return Viewport { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };
    }

    let pw = physical_width as f32;
    let ph = physical_height as f32;
    let lw = logical_width as f32;
    let lh = logical_height as f32;

    let scale = (pw / lw).min(ph / lh);
    let width = lw * scale;
    let height = lh * scale;

    Viewport {
        x: (pw - width) / 2.0,
        y: (ph - height) / 2.0,
        width,
        height,
    }
}

/// The surface view is sRGB, clear colors are given in linear space.
pub fn srgb_to_linear(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        entities::{Enemy, Player, Potion, SpriteKind},
        input::InputSnapshot
    };

    fn tilemap() -> TilemapJson {
        TilemapJson::from_json_str(
            r#"{ "layers": [
                { "data": [1, 0, 23, 45], "width": 2, "height": 2 },
                { "data": [0, 0, 0, 2], "width": 2, "height": 2 }
            ] }"#
        ).unwrap()
    }

    #[test]
    fn test_tileset_source() {
        assert_eq!(tileset_source(0), None);
        assert_eq!(tileset_source(1), Some(Rect2U::new(0, 0, 16, 16)));
        assert_eq!(tileset_source(22), Some(Rect2U::new(336, 0, 16, 16)));
        assert_eq!(tileset_source(23), Some(Rect2U::new(0, 16, 16, 16)));
        assert_eq!(tileset_source(45), Some(Rect2U::new(0, 32, 16, 16)));
    }

    #[test]
    fn test_compose_frame_order_and_empty_tiles() {
        let tilemap = tilemap();
        let mut world = World::new(Player::new(Vector2F::new(5.0, 6.0), 100.0), tilemap.pixel_size(TILE_SIZE));
        world.add_enemy(Enemy::new(Vector2F::new(7.0, 8.0), false));
        world.add_potion(Potion::new(Vector2F::new(9.0, 10.0), 1.0));

        let draws = compose_frame(&world, &tilemap);
        let textures: Vec<_> = draws.iter().map(|d| d.texture).collect();
        assert_eq!(textures, vec![
            TextureId::Tileset,
            TextureId::Tileset,
            TextureId::Tileset,
            TextureId::Tileset,
            TextureId::Sprite(SpriteKind::Ninja),
            TextureId::Sprite(SpriteKind::Skeleton),
            TextureId::Sprite(SpriteKind::Potion),
        ]);

        assert_eq!(draws[1].dest, Rect2F::new(0.0, 16.0, 16.0, 16.0));
        assert_eq!(draws[1].src, Rect2U::new(0, 16, 16, 16));
        assert_eq!(draws[3].dest.pos, Vector2F::new(16.0, 16.0));
        assert_eq!(draws[4].dest, Rect2F::new(5.0, 6.0, 16.0, 16.0));
        assert_eq!(draws[4].src, Rect2U::new(0, 0, 16, 16));
    }

    #[test]
    fn test_compose_frame_applies_camera_offset() {
        let tilemap = TilemapJson::from_json_str(
            r#"{ "layers": [ { "data": [1], "width": 100, "height": 100 } ] }"#
        ).unwrap();
        let mut world = World::new(Player::new(Vector2F::new(500.0, 500.0), 100.0), tilemap.pixel_size(TILE_SIZE));
        world.tick(&InputSnapshot::default());

        let draws = compose_frame(&world, &tilemap);
        assert_eq!(draws[0].dest.pos, Vector2F::new(-340.0, -380.0));
        // Player is always drawn at the viewport center while the camera is unclamped.
        assert_eq!(draws[1].dest.pos, Vector2F::new(160.0, 120.0));
    }

    #[test]
    fn test_letterbox_exact_fit() {
        let viewport = letterbox_viewport(640, 480, 320, 240);
        assert_eq!(viewport, Viewport { x: 0.0, y: 0.0, width: 640.0, height: 480.0 });
    }

    #[test]
    fn test_letterbox_wide_window_gets_side_bars() {
        let viewport = letterbox_viewport(1280, 480, 320, 240);
        assert_eq!(viewport, Viewport { x: 320.0, y: 0.0, width: 640.0, height: 480.0 });
    }

    #[test]
    fn test_letterbox_tall_window_gets_top_bars() {
        let viewport = letterbox_viewport(320, 480, 320, 240);
        assert_eq!(viewport, Viewport { x: 0.0, y: 120.0, width: 320.0, height: 240.0 });
    }

    #[test]
    fn test_letterbox_zero_logical_size() {
        let viewport = letterbox_viewport(640, 480, 0, 240);
        assert_eq!(viewport.width, 0.0);
    }

    #[test]
    fn test_srgb_to_linear_endpoints() {
        assert_eq!(srgb_to_linear(0), 0.0);
        assert!((srgb_to_linear(255) - 1.0).abs() < 1e-9);
        assert!(srgb_to_linear(128) < 0.5);
    }
}
