//! The robot scripting language: parsing, evaluation and stepped execution.

use serde::Serialize;
use std::fmt;

/// Named constants usable as values (`wall`, `north`, `cw`, ...).
pub mod constant;
/// Registers, function table and error state of one running program.
pub mod context;
/// Applies one parsed instruction to the world.
pub mod evaluator;
/// The operation vocabulary with arities and usage strings.
pub mod op;
/// Turns program text into instructions one statement at a time.
pub mod parser;
/// Resumable execution driven once per game tick.
pub mod stepper;
/// Resolves argument tokens to integers.
pub mod value;

#[cfg(test)]
mod tests;

pub use constant::Constant;
pub use context::{Function, LangContext};
pub use evaluator::Effect;
pub use op::Op;
pub use parser::Cursor;
pub use stepper::{evaluate, Stepper};

/// Maximum number of arguments a statement can carry.
pub const MAX_ARGS: usize = 4;

/// Number of registers available to every program.
pub const REGISTER_COUNT: usize = 16;

/// A single parsed statement.
///
/// Arguments are kept as raw tokens and only classified (register, constant
/// or integer) when the instruction is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub op: Op,
    pub args: Vec<String>,
}

impl Instruction {
    pub fn new(op: Op, args: Vec<String>) -> Self {
        Instruction { op, args }
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)?;
        for (i, arg) in self.args.iter().enumerate() {
            if self.op == Op::If && i == 3 {
                write!(f, " then")?;
            }
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
