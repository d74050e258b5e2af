pub mod camera;
pub mod config;
pub mod entities;
pub mod input;
pub mod math;
pub mod tilemap;
pub mod world;
