use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Represents the severity level of a log message.
///
/// Used to categorize log messages for filtering and display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A failure the game cannot recover from.
    Fatal,
    /// A script or I/O failure that stops the current program.
    Error,
    /// A recoverable oddity, such as extra arguments being discarded.
    Warn,
    /// Informational messages, including `print` output.
    Info,
    /// Detailed tracing of parsing and evaluation.
    Debug,
}

impl Severity {
    /// Lower is more severe.
    fn rank(self) -> u8 {
        match self {
            Severity::Fatal => 0,
            Severity::Error => 1,
            Severity::Warn => 2,
            Severity::Info => 3,
            Severity::Debug => 4,
        }
    }

    /// Returns `true` if a message of this severity passes a `threshold` filter.
    pub fn passes(self, threshold: Severity) -> bool {
        self.rank() <= threshold.rank()
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Fatal => write!(f, "[FATAL]"),
            Severity::Error => write!(f, "[ERROR]"),
            Severity::Warn => write!(f, "[WARN]"),
            Severity::Info => write!(f, "[INFO]"),
            Severity::Debug => write!(f, "[DEBUG]"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fatal" => Ok(Severity::Fatal),
            "error" => Ok(Severity::Error),
            "warn" | "warning" => Ok(Severity::Warn),
            "info" => Ok(Severity::Info),
            "debug" => Ok(Severity::Debug),
            other => Err(format!("unknown log level `{}`", other)),
        }
    }
}

/// Represents a structured log message.
///
/// Contains a severity level, the id of the robot whose program produced it
/// (if any), and the log message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    pub level: Severity,
    pub robot: Option<usize>,
    pub msg: String,
}

impl Hash for LogMessage {
    /// The associated robot is not included in the hash calculation.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.level.hash(state);
        self.msg.hash(state);
    }
}

impl Display for LogMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.robot {
            Some(robot) => write!(f, "{} (robot {}) {}", self.level, robot, self.msg),
            None => write!(f, "{} {}", self.level, self.msg),
        }
    }
}

impl LogMessage {
    pub fn new(level: Severity, msg: String) -> Self {
        LogMessage {
            level,
            robot: None,
            msg,
        }
    }

    pub fn error(msg: String) -> Self {
        Self::new(Severity::Error, msg)
    }

    pub fn warn(msg: String) -> Self {
        Self::new(Severity::Warn, msg)
    }

    pub fn info(msg: String) -> Self {
        Self::new(Severity::Info, msg)
    }

    pub fn debug(msg: String) -> Self {
        Self::new(Severity::Debug, msg)
    }

    /// Tags the message with the robot whose program emitted it.
    pub fn for_robot(mut self, robot: usize) -> Self {
        self.robot = Some(robot);
        self
    }
}
