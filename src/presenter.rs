//! Presentation side effects requested by the interpreter.
//!
//! Rendering and audio live outside this crate. The interpreter only fires
//! notifications at a [`Presenter`] and never waits on them; the one query,
//! [`Presenter::is_animating`], lets it skip a "blocked" cue while a robot is
//! still moving on screen.

use serde::Serialize;

use crate::world::Direction;

/// Sound effects the interpreter can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sfx {
    Advancing,
    Reverse,
    Rotating,
    Refuel,
    Disassembled,
}

pub trait Presenter {
    /// A robot reached a new tile.
    fn move_robot(&mut self, _robot: usize, _x: i32, _y: i32) {}

    fn rotate_robot(&mut self, _robot: usize, _dir: Direction) {}

    /// A robot bumped forward, either ramming or failing to move.
    fn ram(&mut self, _robot: usize, _dir: Direction) {}

    fn disassemble(&mut self, _robot: usize) {}

    fn is_animating(&self, _robot: usize) -> bool {
        false
    }

    /// Reveal the tile at `(x, y)`.
    fn clear_fog(&mut self, _x: i32, _y: i32) {}

    fn play_sfx(&mut self, _sfx: Sfx) {}

    /// Display a transient error notification.
    fn show_error(&mut self, _message: &str) {}
}

/// Ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}

/// One notification received by a [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Cue {
    Move { robot: usize, x: i32, y: i32 },
    Rotate { robot: usize, dir: Direction },
    Ram { robot: usize, dir: Direction },
    Disassemble { robot: usize },
    ClearFog { x: i32, y: i32 },
    Sound(Sfx),
    Error(String),
}

/// Keeps every notification in order, for traces and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    pub cues: Vec<Cue>,
    /// Robots reported as mid-animation by `is_animating`.
    pub animating: Vec<usize>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub fn sounds(&self) -> Vec<Sfx> {
        self.cues
            .iter()
            .filter_map(|c| match c {
                Cue::Sound(sfx) => Some(*sfx),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn move_robot(&mut self, robot: usize, x: i32, y: i32) {
        self.cues.push(Cue::Move { robot, x, y });
    }

    fn rotate_robot(&mut self, robot: usize, dir: Direction) {
        self.cues.push(Cue::Rotate { robot, dir });
    }

    fn ram(&mut self, robot: usize, dir: Direction) {
        self.cues.push(Cue::Ram { robot, dir });
    }

    fn disassemble(&mut self, robot: usize) {
        self.cues.push(Cue::Disassemble { robot });
    }

    fn is_animating(&self, robot: usize) -> bool {
        self.animating.contains(&robot)
    }

    fn clear_fog(&mut self, x: i32, y: i32) {
        self.cues.push(Cue::ClearFog { x, y });
    }

    fn play_sfx(&mut self, sfx: Sfx) {
        self.cues.push(Cue::Sound(sfx));
    }

    fn show_error(&mut self, message: &str) {
        self.cues.push(Cue::Error(message.to_string()));
    }
}
