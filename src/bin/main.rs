extern crate podracer;

use std::io;

use anyhow::{Context, Result};
use tracing::info;

use podracer::{
    config::RaceConfig,
    input::{read_track, read_turn, TokenReader},
    logging::init_tracing,
    strategy::Strategy,
    world::World,
};

fn main() -> Result<()> {
    init_tracing();

    let cfg = RaceConfig::load().context("loading race config")?;

    let stdin = io::stdin();
    let mut reader = TokenReader::new(stdin.lock());
    let track = read_track(&mut reader, cfg.physics.checkpoint_radius).context("reading track")?;
    info!(laps = track.laps, checkpoints = track.len(), "race start");

    let mut world = World::new(track, &cfg);
    let mut strategy = Strategy::new(cfg);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    // game loop
    while read_turn(&mut reader, &mut world).with_context(|| format!("reading turn {}", world.turn + 1))? {
        strategy
            .play(&mut world, &mut out)
            .context("writing commands")?;
    }

    info!(turns = world.turn, "input exhausted");
    Ok(())
}
