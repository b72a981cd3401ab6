pub mod config;
pub mod error;
pub mod lang;
pub mod log_message;
pub mod logger;
pub mod presenter;
pub mod runner;
pub mod world;

pub use error::LangError;
pub use log_message::{LogMessage, Severity};
pub use world::World;
