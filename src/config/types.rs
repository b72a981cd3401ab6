use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::log_message::Severity;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,

    #[serde(default)]
    pub interpreter: InterpreterConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GameConfig {
    /// Program loaded by the player's robot.
    #[serde(default = "default_program_path")]
    pub program_path: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_path: Option<PathBuf>,

    /// Frames rendered between two executed statements.
    #[serde(default = "default_frames_per_step")]
    pub frames_per_step: u32,
}

/// Rules applied while a program runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InterpreterConfig {
    #[serde(default = "default_refuel_amount")]
    pub refuel_amount: i32,

    /// Upper bound on fuel after refueling; unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_cap: Option<i32>,

    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: usize,

    #[serde(default = "default_max_functions")]
    pub max_functions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: Severity,

    #[serde(default)]
    pub to_file: bool,

    /// Log directory; the platform data directory when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

pub(super) fn default_program_path() -> PathBuf {
    PathBuf::from("program.rbt")
}

pub(super) fn default_frames_per_step() -> u32 {
    30
}

pub(super) fn default_refuel_amount() -> i32 {
    100
}

pub(super) fn default_max_call_depth() -> usize {
    64
}

pub(super) fn default_max_functions() -> usize {
    256
}

pub(super) fn default_log_level() -> Severity {
    Severity::Info
}
