//! Game-loop driver for a robot program.
//!
//! The game calls [`Runner::frame`] once per rendered frame. While running,
//! the runner executes one statement every `frames_per_step` frames and stops
//! on its own when the program ends, fails or the robot runs dry. Use
//! [`execute_program`] to run a program to completion outside a game loop.
//!
//! ```ignore
//! use robotslib::runner::execute_program;
//!
//! let result = execute_program(&mut world, &mut NullPresenter, 0, "forward\nturn cw", rules);
//! assert_eq!(result.ticks, 2);
//! ```

use serde::Serialize;
use std::io;

use crate::config::InterpreterConfig;
use crate::error::LangError;
use crate::lang::{Effect, LangContext, Stepper, REGISTER_COUNT};
use crate::log_info;
use crate::presenter::Presenter;
use crate::world::World;

/// What happened during one call to [`Runner::frame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// The runner is stopped.
    Idle,
    /// Running, but no statement is due this frame.
    Waiting,
    Stepped(Effect),
    /// The program ran out of statements.
    Finished,
    OutOfFuel,
    /// The robot was disassembled and can no longer act.
    Wrecked,
    Errored(String),
}

impl Frame {
    /// Whether this frame stopped the runner.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Frame::Finished | Frame::OutOfFuel | Frame::Wrecked | Frame::Errored(_)
        )
    }
}

/// Result of executing a program to completion.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// Number of visible steps taken.
    pub ticks: usize,
    /// Effect of every step, in order.
    pub effects: Vec<Effect>,
    /// Registers after execution.
    pub registers: [i32; REGISTER_COUNT],
    /// Names of the functions defined by the program, sorted.
    pub functions: Vec<String>,
    pub error: Option<LangError>,
}

impl ExecutionResult {
    fn from_context(ctx: &LangContext, effects: Vec<Effect>) -> Self {
        ExecutionResult {
            ticks: effects.len(),
            effects,
            registers: *ctx.registers(),
            functions: ctx.function_names(),
            error: ctx.error().cloned(),
        }
    }
}

/// Frame-cadence driver over a root stepper.
pub struct Runner {
    stepper: Stepper<'static>,
    running: bool,
    frames_per_step: u32,
    frame_counter: u32,
}

impl Runner {
    pub fn new(stepper: Stepper<'static>, frames_per_step: u32) -> Self {
        Self {
            stepper,
            running: false,
            frames_per_step: frames_per_step.max(1),
            frame_counter: 0,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            log_info!("Robot {} started", self.stepper.context().robot());
        }
        self.running = true;
        self.frame_counter = 0;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames_per_step(&self) -> u32 {
        self.frames_per_step
    }

    pub fn set_frames_per_step(&mut self, frames: u32) {
        self.frames_per_step = frames.max(1);
    }

    pub fn stepper(&self) -> &Stepper<'static> {
        &self.stepper
    }

    /// Stops the runner and re-reads the program with a fresh context.
    pub fn reload(&mut self) -> io::Result<()> {
        self.stop();
        self.stepper.reload()
    }

    pub fn frame(&mut self, world: &mut World, presenter: &mut dyn Presenter) -> Frame {
        if !self.running {
            return Frame::Idle;
        }
        self.frame_counter += 1;
        if self.frame_counter < self.frames_per_step {
            return Frame::Waiting;
        }
        self.frame_counter = 0;

        let id = self.stepper.context().robot();
        match world.robot(id) {
            Some(robot) if robot.disassembled => {
                self.running = false;
                log_info!("Robot {} was disassembled", id);
                return Frame::Wrecked;
            }
            Some(robot) if robot.fuel <= 0 && !self.stepper.is_exhausted() => {
                self.running = false;
                log_info!("Robot {} ran out of fuel", id);
                return Frame::OutOfFuel;
            }
            _ => {}
        }

        if self.stepper.step(world, presenter) {
            if let Some(effect) = self.stepper.last_effect() {
                return Frame::Stepped(effect.clone());
            }
        }

        self.running = false;
        match self.stepper.context().error_message() {
            Some(message) => {
                presenter.show_error(&message);
                Frame::Errored(message)
            }
            None => {
                log_info!(
                    "Robot {} finished after {} steps",
                    id,
                    self.stepper.steps()
                );
                Frame::Finished
            }
        }
    }
}

/// Runs `program` for `robot` to completion, without frame cadence or fuel
/// checks, and collects every step's effect.
pub fn execute_program(
    world: &mut World,
    presenter: &mut dyn Presenter,
    robot: usize,
    program: &str,
    rules: InterpreterConfig,
) -> ExecutionResult {
    let mut ctx = LangContext::with_rules(robot, rules);
    let mut effects = Vec::new();
    {
        let mut stepper = Stepper::child(&mut ctx, program.to_string());
        while stepper.step(world, presenter) {
            if let Some(effect) = stepper.last_effect() {
                effects.push(effect.clone());
            }
        }
    }
    ExecutionResult::from_context(&ctx, effects)
}
