//! Roomhop entry point
//!
//! Headless runner: loads a level (or builds the demo room), drives it with a
//! scripted input sequence at a fixed frame rate and logs what happens.
//!
//! Usage: `roomhop [LEVEL.json] [--seed N] [--frames N] [--settings PATH] [--save PATH]`

use std::process::ExitCode;

use glam::Vec2;
use roomhop::consts::{SIM_DT, TILE_SIZE};
use roomhop::renderer::build_frame;
use roomhop::sim::{FixedTimestep, TickInput, TileKind, TileMap, World, run_frame};
use roomhop::{LevelData, LevelError, Settings};

#[derive(Debug)]
struct Args {
    level: Option<String>,
    seed: u64,
    frames: u32,
    settings: Option<String>,
    save: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        level: None,
        seed: 42,
        frames: 600,
        settings: None,
        save: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--seed" => {
                let v = it.next().ok_or("--seed needs a value")?;
                args.seed = v.parse().map_err(|_| format!("bad seed: {}", v))?;
            }
            "--frames" => {
                let v = it.next().ok_or("--frames needs a value")?;
                args.frames = v.parse().map_err(|_| format!("bad frame count: {}", v))?;
            }
            "--settings" => args.settings = Some(it.next().ok_or("--settings needs a path")?),
            "--save" => args.save = Some(it.next().ok_or("--save needs a path")?),
            other if other.starts_with("--") => return Err(format!("unknown flag: {}", other)),
            other => args.level = Some(other.to_string()),
        }
    }
    Ok(args)
}

/// Two rooms wide: a floor, a tall wall to slide on, a pit of spikes, a
/// checkpoint and the exit
fn demo_world(seed: u64) -> World {
    let mut map = TileMap::new(64, 18);
    map.fill_border(TileKind::Wall);
    for x in 0..64 {
        map.set_tile(x, 16, TileKind::Wall);
    }
    for y in 8..16 {
        map.set_tile(20, y, TileKind::Wall);
    }
    for x in 26..29 {
        map.set_tile(x, 16, TileKind::KillBlock);
    }
    map.set_tile(2, 15, TileKind::PlayerSpawn);
    map.set_tile(34, 15, TileKind::Checkpoint);
    map.set_tile(60, 15, TileKind::LevelEnd);
    map.set_decoration(5, 14, "grass");

    let mut world = World::new(map, seed);
    world.add_block(Vec2::new(10.0, 15.0) * TILE_SIZE, Vec2::splat(TILE_SIZE));
    world
}

/// Input for a given frame of the demo run
fn scripted_input(frame: u32) -> TickInput {
    let movement = match frame {
        0..=29 => 0,
        30..=399 => 1,
        _ => 0,
    };
    TickInput {
        movement,
        jump_pressed: matches!(frame, 120 | 200 | 210 | 320),
        jump_held: matches!(frame, 120..=140 | 200..=225 | 320..=335),
        dash_pressed: frame == 330,
        ..Default::default()
    }
}

fn load_world(args: &Args) -> Result<World, LevelError> {
    match &args.level {
        Some(path) => LevelData::load(path)?.into_world(args.seed),
        None => Ok(demo_world(args.seed)),
    }
}

fn run(args: Args) -> Result<(), LevelError> {
    let mut world = load_world(&args)?;
    if let Some(path) = &args.settings {
        world.apply_settings(Settings::load(path));
    }
    if let Some(path) = &args.save {
        LevelData::from_world(&world).save(path)?;
    }

    let mut stepper = FixedTimestep::new();
    let mut input = TickInput::default();
    for frame in 0..args.frames {
        input.latch(&scripted_input(frame));
        run_frame(&mut world, &mut stepper, &mut input, SIM_DT);
        for event in &world.events {
            log::info!("[tick {}] {:?}", world.time_ticks, event);
        }
    }

    let frame = build_frame(&world);
    log::info!(
        "Finished after {} ticks: player {} at {:?}, {} particles, {} vertices",
        world.time_ticks,
        world.player.state.name(),
        world.player.pos,
        world.particles.len(),
        frame.vertices.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Roomhop (headless) starting...");

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            log::error!("{}", msg);
            return ExitCode::FAILURE;
        }
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
