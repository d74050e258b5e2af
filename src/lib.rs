pub mod app;
pub mod assets;
pub mod game;
pub mod rendering;
pub mod simulation;

pub use assets::{
    DEFAULT_ASSETS_DIR,
    DEFAULT_MAP_PATH
};

/// Length of a headless run when none is given.
pub const DEFAULT_SIMULATION_TICKS: u32 = 60;
