use std::collections::HashSet;

use winit::keyboard::KeyCode;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn from_key_code(key_code: KeyCode) -> Option<Self> {
        match key_code {
            KeyCode::ArrowUp => Some(Direction::Up),
            KeyCode::ArrowDown => Some(Direction::Down),
            KeyCode::ArrowLeft => Some(Direction::Left),
            KeyCode::ArrowRight => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Which directional keys are held during one tick.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputSnapshot {
    pub fn holding(directions: &[Direction]) -> Self {
        let mut snapshot = Self::default();
        for direction in directions {
            match direction {
                Direction::Up => snapshot.up = true,
                Direction::Down => snapshot.down = true,
                Direction::Left => snapshot.left = true,
                Direction::Right => snapshot.right = true,
            }
        }
        snapshot
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

/// Keys currently held down, fed from window keyboard events.
#[derive(Debug, Default)]
pub struct KeyboardState {
    keys_held: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key_code: KeyCode) {
        self.keys_held.insert(key_code);
    }

    pub fn release(&mut self, key_code: KeyCode) {
        self.keys_held.remove(&key_code);
    }

    /// Focus loss never delivers the matching release events.
    pub fn release_all(&mut self) {
        self.keys_held.clear();
    }

    pub fn snapshot(&self) -> InputSnapshot {
        let held: Vec<Direction> = self.keys_held
            .iter()
            .filter_map(|key_code| Direction::from_key_code(*key_code))
            .collect();
        InputSnapshot::holding(&held)
    }
}

#[test]
fn test_snapshot_follows_press_and_release() {
    let mut keyboard = KeyboardState::new();
    keyboard.press(KeyCode::ArrowRight);
    keyboard.press(KeyCode::KeyA);
    assert_eq!(keyboard.snapshot(), InputSnapshot { right: true, ..Default::default() });

    keyboard.release(KeyCode::ArrowRight);
    assert_eq!(keyboard.snapshot(), InputSnapshot::default());
    assert!(keyboard.keys_held.contains(&KeyCode::KeyA));
}

#[test]
fn test_snapshot_keeps_opposite_keys() {
    let mut keyboard = KeyboardState::new();
    keyboard.press(KeyCode::ArrowLeft);
    keyboard.press(KeyCode::ArrowRight);
    let snapshot = keyboard.snapshot();
    assert!(snapshot.is_held(Direction::Left));
    assert!(snapshot.is_held(Direction::Right));
    assert!(!snapshot.is_held(Direction::Up));
}

#[test]
fn test_release_all_clears_every_key() {
    let mut keyboard = KeyboardState::new();
    keyboard.press(KeyCode::ArrowUp);
    keyboard.press(KeyCode::ArrowDown);
    keyboard.release_all();
    assert_eq!(keyboard.snapshot(), InputSnapshot::default());
}

#[test]
fn test_repeated_press_is_still_held_once() {
    let mut keyboard = KeyboardState::new();
    keyboard.press(KeyCode::ArrowUp);
    keyboard.press(KeyCode::ArrowUp);
    keyboard.release(KeyCode::ArrowUp);
    assert!(!keyboard.snapshot().up);
}
