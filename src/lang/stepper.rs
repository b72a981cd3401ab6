use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::InterpreterConfig;
use crate::error::LangError;
use crate::lang::{evaluator, parser, Cursor, Effect, LangContext, Op};
use crate::presenter::Presenter;
use crate::world::World;
use crate::{log_debug, log_info, log_warn};

/// Reads a program file, creating an empty one if it does not exist yet.
pub fn read_program(path: &Path) -> io::Result<String> {
    if !path.exists() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, "")?;
        log_info!("Created empty program at {}", path.display());
        return Ok(String::new());
    }
    fs::read_to_string(path)
}

/// Where a root stepper takes its program text from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramSource {
    File(PathBuf),
    Inline(String),
}

impl ProgramSource {
    pub fn load(&self) -> io::Result<String> {
        match self {
            ProgramSource::File(path) => read_program(path),
            ProgramSource::Inline(text) => Ok(text.clone()),
        }
    }
}

enum ContextSlot<'a> {
    Owned(Box<LangContext>),
    Shared(&'a mut LangContext),
}

impl ContextSlot<'_> {
    fn get(&self) -> &LangContext {
        match self {
            ContextSlot::Owned(ctx) => &**ctx,
            ContextSlot::Shared(ctx) => &**ctx,
        }
    }

    fn get_mut(&mut self) -> &mut LangContext {
        match self {
            ContextSlot::Owned(ctx) => &mut **ctx,
            ContextSlot::Shared(ctx) => &mut **ctx,
        }
    }
}

/// Resumable execution of a program, one visible statement per `step`.
///
/// A root stepper owns its context and can be reloaded from its source.
/// A child stepper borrows the context of the statement that spawned it and
/// runs a single literal body.
pub struct Stepper<'a> {
    program: String,
    cursor: Cursor,
    ctx: ContextSlot<'a>,
    source: Option<ProgramSource>,
    ticks: usize,
    last_effect: Option<Effect>,
}

impl Stepper<'static> {
    /// Root stepper over a program file, or over `program` when it is given.
    pub fn new(
        robot: usize,
        program: Option<String>,
        program_path: &Path,
        rules: InterpreterConfig,
    ) -> io::Result<Self> {
        let source = match program {
            Some(text) => ProgramSource::Inline(text),
            None => ProgramSource::File(program_path.to_path_buf()),
        };
        Self::from_source(robot, source, rules)
    }

    pub fn from_source(
        robot: usize,
        source: ProgramSource,
        rules: InterpreterConfig,
    ) -> io::Result<Self> {
        let program = source.load()?;
        Ok(Stepper {
            program,
            cursor: Cursor::start(),
            ctx: ContextSlot::Owned(Box::new(LangContext::with_rules(robot, rules))),
            source: Some(source),
            ticks: 0,
            last_effect: None,
        })
    }

    pub fn inline(robot: usize, program: &str, rules: InterpreterConfig) -> Self {
        Stepper {
            program: program.to_string(),
            cursor: Cursor::start(),
            ctx: ContextSlot::Owned(Box::new(LangContext::with_rules(robot, rules))),
            source: Some(ProgramSource::Inline(program.to_string())),
            ticks: 0,
            last_effect: None,
        }
    }
}

impl<'a> Stepper<'a> {
    /// Child stepper sharing `ctx` with its parent.
    pub fn child(ctx: &'a mut LangContext, program: String) -> Self {
        Stepper {
            program,
            cursor: Cursor::start(),
            ctx: ContextSlot::Shared(ctx),
            source: None,
            ticks: 0,
            last_effect: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.source.is_some()
    }

    /// Advances until one statement has a visible effect.
    ///
    /// Statements recorded into a function body and the `fn`/`end` markers
    /// themselves are consumed without ending the step. Returns `false` when
    /// the program is exhausted or an error has been recorded on the context.
    pub fn step(&mut self, world: &mut World, presenter: &mut dyn Presenter) -> bool {
        if self.cursor.is_exhausted() || self.ctx.get().is_errored() {
            return false;
        }
        loop {
            let parsed = parser::next_instruction(&self.program, &mut self.cursor);
            let ctx = self.ctx.get_mut();
            let ins = match parsed {
                Ok(Some(ins)) => ins,
                Ok(None) => {
                    if self.source.is_some() {
                        if let Some(name) = ctx.defining() {
                            log_warn!("function `{}` is missing `end`", name);
                        }
                    }
                    return false;
                }
                Err(err) => {
                    ctx.raise(err);
                    return false;
                }
            };

            if ctx.is_defining() && ins.op != Op::End {
                if ins.op == Op::Fn {
                    ctx.raise(LangError::NestedFunction);
                    return false;
                }
                log_debug!("recording `{}`", ins);
                ctx.record(ins);
                continue;
            }

            match evaluator::evaluate(world, ctx, presenter, &ins) {
                Ok(_) if ctx.is_errored() => return false,
                Ok(_) if ins.op.is_structural() => continue,
                Ok(effect) => {
                    self.ticks += 1;
                    self.last_effect = Some(effect);
                    return true;
                }
                Err(err) => {
                    ctx.raise(err);
                    return false;
                }
            }
        }
    }

    /// Steps until the program stops and returns the number of ticks taken.
    pub fn run_to_end(&mut self, world: &mut World, presenter: &mut dyn Presenter) -> usize {
        while self.step(world, presenter) {}
        self.ticks
    }

    /// Rewinds to the start of the program.
    ///
    /// A root stepper re-reads its source and starts over with a fresh
    /// context; a child stepper only rewinds its cursor.
    pub fn reload(&mut self) -> io::Result<()> {
        if let Some(source) = &self.source {
            let program = source.load()?;
            let ctx = self.ctx.get();
            let fresh = LangContext::with_rules(ctx.robot(), ctx.rules().clone());
            self.program = program;
            self.ctx = ContextSlot::Owned(Box::new(fresh));
        }
        self.cursor = Cursor::start();
        self.ticks = 0;
        self.last_effect = None;
        Ok(())
    }

    pub fn context(&self) -> &LangContext {
        self.ctx.get()
    }

    pub fn context_mut(&mut self) -> &mut LangContext {
        self.ctx.get_mut()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether no statements are left to run.
    pub fn is_exhausted(&self) -> bool {
        parser::is_finished(&self.program, self.cursor)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Number of successful steps since the start or the last reload.
    pub fn steps(&self) -> usize {
        self.ticks
    }

    pub fn last_effect(&self) -> Option<&Effect> {
        self.last_effect.as_ref()
    }
}

/// Runs `program` for `robot` to completion and returns the final context.
pub fn evaluate(
    world: &mut World,
    presenter: &mut dyn Presenter,
    robot: usize,
    program: &str,
    rules: InterpreterConfig,
) -> LangContext {
    let mut ctx = LangContext::with_rules(robot, rules);
    Stepper::child(&mut ctx, program.to_string()).run_to_end(world, presenter);
    ctx
}
