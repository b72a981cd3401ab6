//! Process-wide logging for the interpreter and its front ends.
//!
//! Messages go to the terminal by default. A game UI can take them over a
//! channel instead ([`init_embedded`]), and the CLI can redirect them to a
//! size-rotated file.

use crate::log_message::{LogMessage, Severity};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// A log file is rotated once it would grow past this many bytes.
const LOG_FILE_MAX_SIZE: u64 = 1024 * 1024;
/// Rotated files kept next to the live one (`robots.log.1` is the newest).
const LOG_FILE_KEEP: usize = 4;
const LOG_FILE_NAME: &str = "robots.log";

/// Appends log lines to `robots.log`, rotating it by size.
#[derive(Debug)]
pub struct LogFileWriter {
    log_dir: PathBuf,
    file: Option<File>,
    written: u64,
}

impl LogFileWriter {
    /// Writer under the platform data directory (`<data>/robots/logs`).
    pub fn new() -> io::Result<Self> {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::in_directory(base.join("robots").join("logs"))
    }

    pub fn in_directory(log_dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&log_dir)?;
        Ok(LogFileWriter {
            log_dir,
            file: None,
            written: 0,
        })
    }

    pub fn log_file_path(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }

    fn archive_path(&self, generation: usize) -> PathBuf {
        self.log_dir.join(format!("{}.{}", LOG_FILE_NAME, generation))
    }

    /// Shifts `robots.log.N` to `N + 1`, dropping the oldest, then archives
    /// the live file as generation 1.
    fn rotate(&mut self) -> io::Result<()> {
        self.file = None;
        let oldest = self.archive_path(LOG_FILE_KEEP);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for generation in (1..LOG_FILE_KEEP).rev() {
            let from = self.archive_path(generation);
            if from.exists() {
                fs::rename(&from, self.archive_path(generation + 1))?;
            }
        }
        let live = self.log_file_path();
        if live.exists() {
            fs::rename(&live, self.archive_path(1))?;
        }
        self.written = 0;
        Ok(())
    }

    fn open(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            let path = self.log_file_path();
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            self.written = file.metadata().map(|m| m.len()).unwrap_or(0);
            self.file = Some(file);
        }
        match self.file.as_mut() {
            Some(file) => Ok(file),
            None => Err(io::Error::new(io::ErrorKind::Other, "log file unavailable")),
        }
    }

    pub fn write_log(&mut self, log_msg: &LogMessage) -> io::Result<()> {
        let line = format!("{}\n", log_msg);
        let len = line.len() as u64;
        self.open()?;
        if self.written > 0 && self.written + len > LOG_FILE_MAX_SIZE {
            self.rotate()?;
        }
        let file = self.open()?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        self.written += len;
        Ok(())
    }
}

/// Logger operating mode
#[derive(Debug, Clone)]
pub enum LoggerMode {
    /// Logs directly to the terminal.
    Standalone,
    /// Forwards every message through a channel, for a game UI to drain.
    Embedded(Sender<LogMessage>),
    /// Logs to the rotating log file only.
    File,
}

/// Process-wide logger used by the interpreter and the front ends.
pub struct Logger {
    mode: Mutex<LoggerMode>,
    threshold: Mutex<Severity>,
    file_writer: Mutex<Option<LogFileWriter>>,
}

impl Logger {
    pub fn new_standalone() -> Self {
        Logger {
            mode: Mutex::new(LoggerMode::Standalone),
            threshold: Mutex::new(Severity::Info),
            file_writer: Mutex::new(None),
        }
    }

    pub fn set_embedded_mode(&self, sender: Sender<LogMessage>) {
        if let Ok(mut mode) = self.mode.lock() {
            *mode = LoggerMode::Embedded(sender);
        }
    }

    pub fn set_standalone_mode(&self) {
        if let Ok(mut mode) = self.mode.lock() {
            *mode = LoggerMode::Standalone;
        }
    }

    /// Switch to file mode, writing under `dir` or the default data directory.
    pub fn set_file_mode(&self, dir: Option<PathBuf>) {
        if let Ok(mut file_writer) = self.file_writer.lock() {
            if file_writer.is_none() {
                let writer = match dir {
                    Some(dir) => LogFileWriter::in_directory(dir),
                    None => LogFileWriter::new(),
                };
                *file_writer = match writer {
                    Ok(writer) => Some(writer),
                    Err(e) => {
                        eprintln!("Failed to create log file writer: {}", e);
                        return;
                    }
                };
            }
        }
        if let Ok(mut mode) = self.mode.lock() {
            *mode = LoggerMode::File;
        }
    }

    pub fn set_threshold(&self, level: Severity) {
        if let Ok(mut threshold) = self.threshold.lock() {
            *threshold = level;
        }
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.file_writer
            .lock()
            .ok()
            .and_then(|w| w.as_ref().map(|w| w.log_file_path()))
    }

    pub fn log(&self, log_msg: LogMessage) {
        let threshold = self.threshold.lock().map(|t| *t).unwrap_or(Severity::Info);
        if !log_msg.level.passes(threshold) {
            return;
        }

        let Ok(mode) = self.mode.lock() else {
            return;
        };
        match &*mode {
            LoggerMode::Standalone => match log_msg.level {
                Severity::Fatal | Severity::Error => {
                    eprintln!("{}", log_msg);
                    let _ = std::io::stderr().flush();
                }
                _ => {
                    println!("{}", log_msg);
                    let _ = std::io::stdout().flush();
                }
            },
            LoggerMode::Embedded(sender) => {
                if sender.try_send(log_msg.clone()).is_err() {
                    // Fallback to terminal if channel is full/closed
                    eprintln!("Logger channel error: {}", log_msg);
                }
            }
            LoggerMode::File => {
                if let Ok(mut file_writer) = self.file_writer.lock() {
                    if let Some(writer) = file_writer.as_mut() {
                        if let Err(e) = writer.write_log(&log_msg) {
                            eprintln!("Failed to write to log file: {}", e);
                        }
                    }
                }
            }
        }
    }

    pub fn debug(&self, msg: String) {
        self.log(LogMessage::debug(msg));
    }

    pub fn info(&self, msg: String) {
        self.log(LogMessage::info(msg));
    }

    pub fn warn(&self, msg: String) {
        self.log(LogMessage::warn(msg));
    }

    pub fn error(&self, msg: String) {
        self.log(LogMessage::error(msg));
    }
}

/// Create a logging channel pair
pub fn create_log_channel() -> (Sender<LogMessage>, Receiver<LogMessage>) {
    unbounded()
}

/// Get the global logger instance
pub fn get_logger() -> &'static Logger {
    GLOBAL_LOGGER.get_or_init(Logger::new_standalone)
}

/// Route every log message through the returned receiver.
pub fn init_embedded() -> Receiver<LogMessage> {
    let (sender, receiver) = create_log_channel();
    get_logger().set_embedded_mode(sender);
    receiver
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logger::get_logger().debug(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::get_logger().info(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::get_logger().warn(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logger::get_logger().error(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_writer_appends() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = LogFileWriter::in_directory(dir.path().to_path_buf()).unwrap();
        writer.write_log(&LogMessage::info("first".to_string())).unwrap();
        writer.write_log(&LogMessage::warn("second".to_string())).unwrap();

        let content = std::fs::read_to_string(writer.log_file_path()).unwrap();
        assert_eq!(content, "[INFO] first\n[WARN] second\n");
    }

    #[test]
    fn test_file_writer_rotates() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = LogFileWriter::in_directory(dir.path().to_path_buf()).unwrap();
        let big = LogMessage::debug("x".repeat(LOG_FILE_MAX_SIZE as usize / 2));
        for _ in 0..2 {
            writer.write_log(&big).unwrap();
        }
        assert!(writer.archive_path(1).exists());
        assert!(!writer.archive_path(2).exists());
        let live = std::fs::metadata(writer.log_file_path()).unwrap().len();
        assert!(live <= LOG_FILE_MAX_SIZE);
    }

    #[test]
    fn test_embedded_logger_forwards_and_filters() {
        let logger = Logger::new_standalone();
        let (sender, receiver) = create_log_channel();
        logger.set_embedded_mode(sender);
        logger.set_threshold(Severity::Warn);

        logger.info("hidden".to_string());
        logger.error("shown".to_string());

        let received: Vec<LogMessage> = receiver.try_iter().collect();
        assert_eq!(received, vec![LogMessage::error("shown".to_string())]);
    }
}
