use serde::Serialize;

use crate::error::LangError;
use crate::lang::{value, Constant, Instruction, LangContext, Op, Stepper};
use crate::log_debug;
use crate::log_message::LogMessage;
use crate::logger::get_logger;
use crate::presenter::{Presenter, Sfx};
use crate::world::{Direction, Tile, World};

/// Observable outcome of one evaluated instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Effect {
    Printed(i32),
    Moved { x: i32, y: i32 },
    Blocked,
    Turned(Direction),
    Refueled { fuel: i32 },
    NothingToRefuel,
    Rammed { target: usize },
    NothingToRam,
    Scanned { register: usize, value: i32 },
    Assigned { register: usize, value: i32 },
    Ran(String),
    Branched { taken: bool },
    FunctionOpened(String),
    FunctionClosed(String),
}

/// Comparison operator of an `if` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Comparison {
    pub fn parse(token: &str) -> Result<Self, LangError> {
        match token {
            "==" => Ok(Comparison::Eq),
            "!=" => Ok(Comparison::Ne),
            ">" => Ok(Comparison::Gt),
            "<" => Ok(Comparison::Lt),
            ">=" => Ok(Comparison::Ge),
            "<=" => Ok(Comparison::Le),
            _ => Err(LangError::InvalidComparison(token.to_string())),
        }
    }

    pub fn apply(self, a: i32, b: i32) -> bool {
        match self {
            Comparison::Eq => a == b,
            Comparison::Ne => a != b,
            Comparison::Gt => a > b,
            Comparison::Lt => a < b,
            Comparison::Ge => a >= b,
            Comparison::Le => a <= b,
        }
    }
}

fn required<'i>(ins: &'i Instruction, index: usize) -> Result<&'i str, LangError> {
    ins.arg(index).ok_or(LangError::Usage(ins.op.usage()))
}

/// Evaluates a single instruction for the context's robot.
///
/// Every operation but `end` burns one unit of fuel first, flooring at zero.
/// `run` and a taken `if` evaluate their bodies to completion before
/// returning.
pub fn evaluate(
    world: &mut World,
    ctx: &mut LangContext,
    presenter: &mut dyn Presenter,
    ins: &Instruction,
) -> Result<Effect, LangError> {
    let id = ctx.robot();
    if world.robot(id).is_none() {
        return Err(LangError::NoSuchRobot(id));
    }
    if ins.op.consumes_fuel() {
        let robot = &mut world.robots[id];
        robot.fuel = (robot.fuel - 1).max(0);
    }

    match ins.op {
        Op::Print => {
            let n = value::evaluate_or(ctx, ins.arg(0), 1)?;
            get_logger().log(LogMessage::info(format!("[PRINT] {}", n)).for_robot(id));
            Ok(Effect::Printed(n))
        }
        Op::Forward | Op::Backward => {
            let backward = ins.op == Op::Backward;
            if world.try_move(id, backward) {
                let robot = &world.robots[id];
                presenter.move_robot(id, robot.x, robot.y);
                presenter.play_sfx(if backward { Sfx::Reverse } else { Sfx::Advancing });
                Ok(Effect::Moved {
                    x: robot.x,
                    y: robot.y,
                })
            } else {
                if !presenter.is_animating(id) {
                    let dir = world.robots[id].dir;
                    presenter.ram(id, if backward { dir.opposite() } else { dir });
                }
                Ok(Effect::Blocked)
            }
        }
        Op::Turn => {
            let rotation = value::evaluate(ctx, required(ins, 0)?)?;
            let robot = &mut world.robots[id];
            robot.dir = match Constant::from_value(rotation) {
                Some(Constant::Cw) => robot.dir.clockwise(),
                Some(Constant::Ccw) => robot.dir.counter_clockwise(),
                _ => return Err(LangError::InvalidTurn(rotation)),
            };
            presenter.rotate_robot(id, robot.dir);
            presenter.play_sfx(Sfx::Rotating);
            Ok(Effect::Turned(robot.dir))
        }
        Op::Refuel => {
            let (x, y) = (world.robots[id].x, world.robots[id].y);
            if world.tile(x, y) != Tile::Fuel {
                return Ok(Effect::NothingToRefuel);
            }
            let rules = ctx.rules();
            let robot = &mut world.robots[id];
            robot.fuel = robot.fuel.saturating_add(rules.refuel_amount);
            if let Some(cap) = rules.fuel_cap {
                robot.fuel = robot.fuel.min(cap);
            }
            let fuel = robot.fuel;
            world.set_tile(x, y, Tile::Empty);
            presenter.play_sfx(Sfx::Refuel);
            Ok(Effect::Refueled { fuel })
        }
        Op::Ram => {
            let actor = &world.robots[id];
            let (x, y) = actor.ahead();
            let (dir, is_player) = (actor.dir, actor.is_player);
            let target = world
                .robot_at(x, y)
                .filter(|&t| t != id && world.robots[t].is_player != is_player);
            match target {
                Some(target) => {
                    world.robots[target].disassembled = true;
                    presenter.ram(id, dir);
                    presenter.disassemble(target);
                    presenter.play_sfx(Sfx::Disassembled);
                    Ok(Effect::Rammed { target })
                }
                None => Ok(Effect::NothingToRam),
            }
        }
        Op::Scan => {
            let register = value::register_index(required(ins, 0)?)?;
            let robot = &world.robots[id];
            let (rx, ry) = (robot.x, robot.y);
            let (x, y) = robot.ahead();
            let seen = if world.robot_at(x, y).is_some() {
                Constant::Robot
            } else {
                Constant::from(world.tile(x, y))
            };
            ctx.set_register(register, seen.value())?;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if world.in_bounds(rx + dx, ry + dy) {
                        presenter.clear_fog(rx + dx, ry + dy);
                    }
                }
            }
            Ok(Effect::Scanned {
                register,
                value: seen.value(),
            })
        }
        Op::Run => {
            let name = required(ins, 0)?;
            let body = ctx
                .function(name)
                .ok_or_else(|| LangError::NoSuchFunction(name.to_string()))?
                .body
                .clone();
            ctx.enter()?;
            log_debug!("robot {} runs `{}` at depth {}", id, name, ctx.depth());
            let result = run_body(world, ctx, presenter, &body);
            ctx.leave();
            result?;
            Ok(Effect::Ran(name.to_string()))
        }
        Op::If => {
            let a = value::evaluate(ctx, required(ins, 0)?)?;
            let b = value::evaluate(ctx, required(ins, 2)?)?;
            let taken = Comparison::parse(required(ins, 1)?)?.apply(a, b);
            if taken {
                let body = required(ins, 3)?.to_string();
                let was_defining = ctx.is_defining();
                ctx.enter()?;
                {
                    let mut child = Stepper::child(ctx, body);
                    while child.step(world, presenter) {}
                }
                ctx.leave();
                // A one-line body can never reach the matching `end`.
                if !was_defining {
                    if let Some(name) = ctx.defining() {
                        return Err(LangError::UnterminatedFunction(name.to_string()));
                    }
                }
            }
            Ok(Effect::Branched { taken })
        }
        Op::Set => {
            let register = value::register_index(required(ins, 0)?)?;
            let value = value::evaluate(ctx, required(ins, 1)?)?;
            ctx.set_register(register, value)?;
            Ok(Effect::Assigned { register, value })
        }
        Op::Fn => {
            let name = required(ins, 0)?;
            ctx.open_function(name)?;
            Ok(Effect::FunctionOpened(name.to_string()))
        }
        Op::End => ctx.close_function().map(Effect::FunctionClosed),
        Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Mod => {
            let register = value::register_index(required(ins, 0)?)?;
            let n = value::evaluate(ctx, required(ins, 1)?)?;
            let current = ctx.register(register)?;
            let value = match ins.op {
                Op::Add => current.wrapping_add(n),
                Op::Sub => current.wrapping_sub(n),
                Op::Mul => current.wrapping_mul(n),
                Op::Div if n == 0 => return Err(LangError::DivisionByZero),
                Op::Div => current.wrapping_div(n),
                Op::Mod if n == 0 => return Err(LangError::DivisionByZero),
                _ => current.wrapping_rem(n),
            };
            ctx.set_register(register, value)?;
            Ok(Effect::Assigned { register, value })
        }
    }
}

/// Evaluates a recorded function body in order, stopping at the first error.
fn run_body(
    world: &mut World,
    ctx: &mut LangContext,
    presenter: &mut dyn Presenter,
    body: &[Instruction],
) -> Result<(), LangError> {
    for ins in body {
        evaluate(world, ctx, presenter, ins)?;
        if ctx.is_errored() {
            break;
        }
    }
    Ok(())
}
