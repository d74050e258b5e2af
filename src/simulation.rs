use serde::Serialize;

use crate::game::{
    input::InputSnapshot,
    tilemap::TilemapJson,
    world::World
};

/// Result of a headless run, printed by the `simulate` command.
#[derive(Debug, Serialize)]
pub struct SimulationSummary {
    pub ticks: u32,
    pub potions_triggered: usize,
    pub world: World,
}

/// Spawns the demo level on `tilemap` and runs `ticks` ticks with the same input held.
pub fn simulate(tilemap: &TilemapJson, ticks: u32, input: &InputSnapshot) -> SimulationSummary {
    let mut world = World::spawn(tilemap);
    let potions_triggered = (0..ticks)
        .map(|_| world.tick(input).potions_triggered)
        .sum();

    SimulationSummary {
        ticks,
        potions_triggered,
        world,
    }
}
