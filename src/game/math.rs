use serde::{
    Deserialize,
    Serialize
};

pub type Vector2F = Vector2X<f32>;
pub type Vector2U = Vector2X<u32>;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector2X<T> {
    pub x: T,
    pub y: T,
}

pub type Rect2F = Rect2X<f32>;
pub type Rect2U = Rect2X<u32>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect2X<T> {
    pub pos: Vector2X<T>,
    pub size: Vector2X<T>,
}

impl<T: std::fmt::Display> std::fmt::Display for Vector2X<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

impl<T> Vector2X<T>
where
    T: Default
{
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: T::default(), y: T::default() }
    }
}

/// Moves `value` by exactly `step` toward `target`, or leaves it untouched when equal.
/// No snapping: a value closer than `step` jumps past the target.
pub fn step_toward(value: f32, target: f32, step: f32) -> f32 {
    if value < target {
        value + step
    } else if value > target {
        value - step
    } else {
        value
    }
}

impl Vector2X<f32> {
    /// Per-axis [`step_toward`], each axis independent of the other.
    pub fn step_toward(&self, target: Self, step: f32) -> Self {
        Self {
            x: step_toward(self.x, target.x, step),
            y: step_toward(self.y, target.y, step),
        }
    }
}

impl<T> std::ops::Add for Vector2X<T>
where
    T: std::ops::Add<Output = T>
{
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y
        }
    }
}

impl<T> std::ops::AddAssign for Vector2X<T>
where
    T: std::ops::AddAssign
{
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl From<Vector2X<u32>> for Vector2X<f32> {
    fn from(value: Vector2X<u32>) -> Self {
        Self { x: value.x as f32, y: value.y as f32 }
    }
}

impl<T> Rect2X<T> {
    pub fn new(x: T, y: T, w: T, h: T) -> Self {
        Self { pos: Vector2X { x, y }, size: Vector2X { x: w, y: h } }
    }
}

impl<T> Rect2X<T>
where
    T: std::ops::Add<Output = T> + Copy
{
    /// Bottom-right corner, exclusive.
    pub fn max_corner(&self) -> Vector2X<T> {
        Vector2X {
            x: self.pos.x + self.size.x,
            y: self.pos.y + self.size.y,
        }
    }
}

#[test]
fn test_vector_add_assign() {
    let mut position = Vector2F::new(0.0, 100.0);
    position += Vector2F::new(2.0, -2.0);
    assert_eq!(position, Vector2F::new(2.0, 98.0));
}

#[test]
fn test_vector_casting() {
    let size = Vector2U::new(16, 32);
    let size_f = Vector2F::from(size);
    assert_eq!(size_f, Vector2F::new(16.0, 32.0));
}

#[test]
fn test_step_toward_moves_full_step_regardless_of_distance() {
    assert_eq!(step_toward(0.0, 100.0, 1.0), 1.0);
    assert_eq!(step_toward(100.0, 0.0, 1.0), 99.0);
    assert_eq!(step_toward(0.0, 0.5, 1.0), 1.0);
    assert_eq!(step_toward(7.0, 7.0, 1.0), 7.0);
}

#[test]
fn test_vector_step_toward_is_per_axis() {
    let enemy = Vector2F::new(50.0, 100.0);
    let target = Vector2F::new(0.0, 100.0);
    assert_eq!(enemy.step_toward(target, 1.0), Vector2F::new(49.0, 100.0));
}

#[test]
fn test_rect_max_corner() {
    let rect = Rect2U::new(16, 32, 16, 16);
    assert_eq!(rect.max_corner(), Vector2U::new(32, 48));
}
