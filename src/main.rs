use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use robotslib::config::{Config, ConfigLoader};
use robotslib::lang::stepper::ProgramSource;
use robotslib::lang::{Stepper, REGISTER_COUNT};
use robotslib::logger::get_logger;
use robotslib::presenter::RecordingPresenter;
use robotslib::runner::{Frame, Runner};
use robotslib::{log_info, log_warn, Severity, World};

/// Level used when neither the command line nor the config names one.
const DEFAULT_LEVEL: &str = "\
##########
#........#
#..F..E..#
#........#
#...P....#
#........#
##########
";

/// Headless runner for robot programs
#[derive(Parser)]
#[command(name = "robots", version)]
#[command(about = "Run a robot program against a level without rendering")]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Program file, overriding the configured one
    #[arg(short, long)]
    program: Option<PathBuf>,

    /// Level file
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Index of the robot to drive (the player by default)
    #[arg(short, long)]
    robot: Option<usize>,

    /// Stop after this many executed statements
    #[arg(long, default_value_t = 10_000)]
    max_ticks: usize,

    /// Frames between two statements, overriding the configured value
    #[arg(long)]
    frames_per_step: Option<u32>,

    /// Print every step and presentation cue
    #[arg(long)]
    trace: bool,

    /// Write the final state as JSON to this file (`-` for stdout)
    #[arg(long)]
    dump_state: Option<PathBuf>,

    /// Minimum log severity: fatal, error, warn, info or debug
    #[arg(long)]
    log_level: Option<Severity>,
}

#[derive(Serialize)]
struct StateDump<'a> {
    steps: usize,
    outcome: String,
    registers: [i32; REGISTER_COUNT],
    functions: Vec<String>,
    error: Option<String>,
    world: &'a World,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::at(path),
        None => ConfigLoader::new()?,
    };
    loader
        .load_or_create()
        .with_context(|| format!("Failed to load {}", loader.config_path().display()))
}

fn load_world(path: Option<&PathBuf>) -> Result<World> {
    let world = match path {
        Some(path) => {
            let level = fs::read_to_string(path)
                .with_context(|| format!("Failed to read level {}", path.display()))?;
            World::from_ascii(&level).with_context(|| format!("Invalid level {}", path.display()))?
        }
        None => World::from_ascii(DEFAULT_LEVEL)?,
    };
    Ok(world)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let logger = get_logger();
    logger.set_threshold(cli.log_level.unwrap_or(config.log.level));
    if config.log.to_file {
        logger.set_file_mode(config.log.directory.clone());
    }

    let mut world = load_world(cli.map.as_ref().or(config.game.level_path.as_ref()))?;
    let robot = match cli.robot.or_else(|| world.player()) {
        Some(id) if world.robot(id).is_some() => id,
        Some(id) => bail!("Level has no robot {}", id),
        None => bail!("Level has no player robot"),
    };

    let program_path = cli
        .program
        .clone()
        .unwrap_or_else(|| config.game.program_path.clone());
    let stepper = Stepper::from_source(
        robot,
        ProgramSource::File(program_path.clone()),
        config.interpreter.clone(),
    )
    .with_context(|| format!("Failed to read program {}", program_path.display()))?;

    let frames_per_step = cli.frames_per_step.unwrap_or(config.game.frames_per_step);
    let mut runner = Runner::new(stepper, frames_per_step);
    let mut presenter = RecordingPresenter::new();

    log_info!(
        "Running {} for robot {} ({} frames per step)",
        program_path.display(),
        robot,
        runner.frames_per_step()
    );
    runner.start();

    let mut steps = 0;
    let outcome = loop {
        let frame = runner.frame(&mut world, &mut presenter);
        if cli.trace {
            for cue in presenter.drain() {
                println!("      {:?}", cue);
            }
        }
        match frame {
            Frame::Waiting => {}
            Frame::Stepped(effect) => {
                steps += 1;
                if cli.trace {
                    println!("{:>5} {:?}", steps, effect);
                }
                if steps >= cli.max_ticks {
                    log_warn!("Stopping after {} steps", steps);
                    runner.stop();
                    break Frame::Idle;
                }
            }
            other => break other,
        }
    };

    let robot_state = &world.robots[robot];
    println!("{}", world);
    log_info!(
        "{:?} after {} steps: robot at ({}, {}) facing {}, fuel {}, enemies left {}",
        outcome,
        steps,
        robot_state.x,
        robot_state.y,
        robot_state.dir,
        robot_state.fuel,
        world.enemies_left()
    );

    let ctx = runner.stepper().context();
    if let Some(target) = &cli.dump_state {
        let dump = StateDump {
            steps,
            outcome: format!("{:?}", outcome),
            registers: *ctx.registers(),
            functions: ctx.function_names(),
            error: ctx.error_message(),
            world: &world,
        };
        let json = serde_json::to_string_pretty(&dump).context("Failed to serialize state")?;
        if target.as_os_str() == "-" {
            println!("{}", json);
        } else {
            fs::write(target, json)
                .with_context(|| format!("Failed to write {}", target.display()))?;
        }
    }

    if let Frame::Errored(message) = outcome {
        bail!("Program failed: {}", message);
    }
    Ok(())
}
