//! Configuration file handling.

mod defaults;
mod loader;
mod types;
mod validation;

pub use loader::ConfigLoader;
pub use types::{Config, GameConfig, InterpreterConfig, LogConfig};
pub use validation::Validate;
