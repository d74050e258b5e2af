use std::path::PathBuf;

use clap::{Parser, Subcommand, Args};
use tile_chase::{
    game::input::Direction,
    DEFAULT_ASSETS_DIR,
    DEFAULT_SIMULATION_TICKS
};

/// # Global Arguments
#[derive(Debug, Parser)]
#[command(version, about = "Tile map chase demo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Open the game window
    Play(PlayArgs),

    /// Run ticks without a window and print the final world state
    Simulate(SimulateArgs),
}

#[derive(Debug, Args)]
struct PlayArgs {
    /// Directory with images/ and maps/
    #[arg(short = 'a', long = "assets", value_name = "ASSETS_DIR", default_value_os_t = PathBuf::from(DEFAULT_ASSETS_DIR))]
    assets: PathBuf,

    /// Tilemap JSON, defaults to maps/spawn.json inside the assets directory
    #[arg(short = 'm', long = "map", value_name = "MAP_FILE")]
    map: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    /// Tilemap JSON
    #[arg(short = 'm', long = "map", value_name = "MAP_FILE", required = true)]
    map: PathBuf,

    /// Number of ticks to run
    #[arg(short = 't', long = "ticks", value_name = "TICKS", default_value_t = DEFAULT_SIMULATION_TICKS)]
    ticks: u32,

    /// Directions held during every tick
    #[arg(long = "hold", value_name = "DIRECTION", value_enum)]
    hold: Vec<Direction>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .format_file(false)
        .format_line_number(true)
        .init();

    let cli_args = Cli::parse();
    log::info!("Got args: '{:?}'.", cli_args);

    let result = match cli_args.mode {
        Mode::Play(play_args) => {
            cli_play::run(play_args.assets, play_args.map)
        },
        Mode::Simulate(simulate_args) => {
            cli_simulate::run(simulate_args.map, simulate_args.ticks, &simulate_args.hold)
        },
    };

    if let Err(err) = result {
        log::error!("{err}");
        std::process::exit(1);
    }
}

mod cli_play {
    use std::path::PathBuf;

    use tile_chase::{app, assets::Assets};

    pub fn run(assets_dir: PathBuf, map: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
        let assets = Assets::load(&assets_dir, map.as_deref())?;
        app::run(assets)?;
        Ok(())
    }
}

mod cli_simulate {
    use std::path::PathBuf;

    use tile_chase::{
        assets::load_tilemap,
        game::input::{Direction, InputSnapshot},
        simulation::simulate
    };

    pub fn run(map: PathBuf, ticks: u32, hold: &[Direction]) -> Result<(), Box<dyn std::error::Error>> {
        let tilemap = load_tilemap(&map)?;

        log::info!("Simulating {ticks} ticks holding {hold:?}");
        let summary = simulate(&tilemap, ticks, &InputSnapshot::holding(hold));
        log::info!("Potions applied {} time(s)", summary.potions_triggered);

        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}
