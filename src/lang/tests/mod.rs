use crate::config::InterpreterConfig;
use crate::lang::{evaluate, LangContext};
use crate::presenter::RecordingPresenter;
use crate::world::World;

mod arithmetic;
mod control_flow;
mod errors;

/// A 5x5 open floor with the player at (3, 3), facing north.
pub const ARENA: &str = "\
#######
#.....#
#.....#
#..P..#
#.....#
#.....#
#######
";

pub fn arena() -> World {
    World::from_ascii(ARENA).unwrap()
}

/// Runs `program` for robot 0 of `world` to completion.
pub fn run_in(world: &mut World, program: &str) -> (LangContext, RecordingPresenter) {
    let mut presenter = RecordingPresenter::new();
    let ctx = evaluate(world, &mut presenter, 0, program, InterpreterConfig::default());
    (ctx, presenter)
}

/// Runs `program` in the default arena and returns the final context.
pub fn run(program: &str) -> LangContext {
    run_in(&mut arena(), program).0
}
