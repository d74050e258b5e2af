use serde::Serialize;

use super::math::Vector2F;

/// Image an entity is drawn with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum SpriteKind {
    Ninja,
    Skeleton,
    Potion,
}

pub trait Sprite {
    fn position(&self) -> Vector2F;

    fn set_position(&mut self, position: Vector2F);

    fn sprite_kind(&self) -> SpriteKind;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub position: Vector2F,
    pub health: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enemy {
    pub position: Vector2F,
    pub follows_player: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Potion {
    pub position: Vector2F,
    pub heal_amount: f32,
}

impl Player {
    pub fn new(position: Vector2F, health: f32) -> Self {
        Self { position, health }
    }
}

impl Enemy {
    pub fn new(position: Vector2F, follows_player: bool) -> Self {
        Self { position, follows_player }
    }
}

impl Potion {
    pub fn new(position: Vector2F, heal_amount: f32) -> Self {
        Self { position, heal_amount }
    }

    /// Crude contact rule: only the x axis is checked and only from one side.
    pub fn is_triggered_by(&self, player: &Player) -> bool {
        player.position.x > self.position.x
    }
}

macro_rules! impl_sprite {
    ($entity:ty, $kind:expr) => {
        impl Sprite for $entity {
            fn position(&self) -> Vector2F {
                self.position
            }

            fn set_position(&mut self, position: Vector2F) {
                self.position = position;
            }

            fn sprite_kind(&self) -> SpriteKind {
                $kind
            }
        }
    };
}

impl_sprite!(Player, SpriteKind::Ninja);
impl_sprite!(Enemy, SpriteKind::Skeleton);
impl_sprite!(Potion, SpriteKind::Potion);

#[test]
fn test_sprite_kinds() {
    let player = Player::new(Vector2F::zero(), 100.0);
    let enemy = Enemy::new(Vector2F::zero(), true);
    let potion = Potion::new(Vector2F::zero(), 1.0);
    assert_eq!(player.sprite_kind(), SpriteKind::Ninja);
    assert_eq!(enemy.sprite_kind(), SpriteKind::Skeleton);
    assert_eq!(potion.sprite_kind(), SpriteKind::Potion);
}

#[test]
fn test_set_position_through_trait() {
    let mut enemy = Enemy::new(Vector2F::new(1.0, 2.0), false);
    let sprite: &mut dyn Sprite = &mut enemy;
    sprite.set_position(Vector2F::new(3.0, 4.0));
    assert_eq!(sprite.position(), Vector2F::new(3.0, 4.0));
    assert!(!enemy.follows_player);
}

#[test]
fn test_potion_trigger_is_strict_and_x_only() {
    let potion = Potion::new(Vector2F::new(80.0, 50.0), 1.0);
    let on_edge = Player::new(Vector2F::new(80.0, 50.0), 100.0);
    let past_far_away_on_y = Player::new(Vector2F::new(80.5, -1000.0), 100.0);
    assert!(!potion.is_triggered_by(&on_edge));
    assert!(potion.is_triggered_by(&past_far_away_on_y));
}
