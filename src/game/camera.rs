use serde::Serialize;

use super::math::Vector2F;

/// Translation applied to everything drawn in world space.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize)]
pub struct Camera {
    pub offset: Vector2F,
}

impl Camera {
    pub fn new(x: f32, y: f32) -> Self {
        Self { offset: Vector2F::new(x, y) }
    }

    /// Overwrites the offset so that the target lands in the middle of the viewport.
    pub fn follow_target(&mut self, target_x: f32, target_y: f32, viewport_width: f32, viewport_height: f32) {
        self.offset = Vector2F::new(
            viewport_width / 2.0 - target_x,
            viewport_height / 2.0 - target_y
        );
    }

    /// Clamps the offset so no area past the map edges is shown.
    ///
    /// On an axis where the map is smaller than the viewport there is no valid
    /// clamp range, the map is centered on that axis instead.
    pub fn constrain(&mut self, map_width_px: f32, map_height_px: f32, viewport_width: f32, viewport_height: f32) {
        self.offset.x = constrain_axis(self.offset.x, map_width_px, viewport_width);
        self.offset.y = constrain_axis(self.offset.y, map_height_px, viewport_height);
    }

    pub fn world_to_screen(&self, position: Vector2F) -> Vector2F {
        position + self.offset
    }
}

fn constrain_axis(offset: f32, map_px: f32, viewport_px: f32) -> f32 {
    if map_px < viewport_px {
        (viewport_px - map_px) / 2.0
    } else {
        offset.clamp(viewport_px - map_px, 0.0)
    }
}

#[test]
fn test_follow_target_centers_target() {
    let mut camera = Camera::new(0.0, 0.0);
    camera.follow_target(0.0, 0.0, 320.0, 240.0);
    assert_eq!(camera.offset, Vector2F::new(160.0, 120.0));

    camera.follow_target(900.0, 30.0, 320.0, 240.0);
    assert_eq!(camera.offset, Vector2F::new(-740.0, 90.0));
}

#[test]
fn test_constrain_at_map_origin_clamps_to_zero() {
    let mut camera = Camera::default();
    camera.follow_target(0.0, 0.0, 320.0, 240.0);
    camera.constrain(1000.0, 800.0, 320.0, 240.0);
    assert_eq!(camera.offset, Vector2F::new(0.0, 0.0));
}

#[test]
fn test_constrain_deep_inside_map_clamps_to_far_edge() {
    let mut camera = Camera::default();
    camera.follow_target(900.0, 790.0, 320.0, 240.0);
    assert_eq!(camera.offset.x, -740.0);
    camera.constrain(1000.0, 800.0, 320.0, 240.0);
    assert_eq!(camera.offset, Vector2F::new(-680.0, -560.0));
}

#[test]
fn test_constrain_keeps_offset_inside_range() {
    let mut camera = Camera::default();
    camera.follow_target(400.0, 300.0, 320.0, 240.0);
    camera.constrain(1000.0, 800.0, 320.0, 240.0);
    assert_eq!(camera.offset, Vector2F::new(-240.0, -180.0));
}

#[test]
fn test_constrain_centers_map_smaller_than_viewport() {
    let mut camera = Camera::default();
    for target_x in [-500.0, 0.0, 100.0, 900.0] {
        camera.follow_target(target_x, 0.0, 320.0, 240.0);
        camera.constrain(200.0, 800.0, 320.0, 240.0);
        assert_eq!(camera.offset.x, 60.0, "target_x={target_x}");
        assert_eq!(camera.offset.y, 0.0);
    }
}

#[test]
fn test_constrain_map_equal_to_viewport_pins_to_zero() {
    let mut camera = Camera::default();
    camera.follow_target(300.0, -40.0, 320.0, 240.0);
    camera.constrain(320.0, 240.0, 320.0, 240.0);
    assert_eq!(camera.offset, Vector2F::new(0.0, 0.0));
}

#[test]
fn test_world_to_screen_applies_offset() {
    let camera = Camera::new(-40.0, 10.0);
    assert_eq!(camera.world_to_screen(Vector2F::new(50.0, 50.0)), Vector2F::new(10.0, 60.0));
}
