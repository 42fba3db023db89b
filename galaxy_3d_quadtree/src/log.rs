//! Logging system for the Galaxy3D quad tree
//!
//! This module provides a flexible logging system with:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - A process-wide minimum severity filter (Info by default)
//! - Colored console output by default
//! - Thread-safe logging with RwLock
//! - File and line information for detailed ERROR logs

use colored::*;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// Implement this trait to create custom loggers (file logging, network logging, etc.)
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_quadtree::galaxy3d::log::{Logger, LogEntry};
///
/// struct FileLogger {
///     file: std::fs::File,
/// }
///
/// impl Logger for FileLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Write to file...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level (Trace, Debug, Info, Warn, Error)
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "galaxy3d::QuadTree")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogSeverity {
    /// Very verbose information (per-insertion events)
    Trace = 0,

    /// Development/debugging information
    Debug = 1,

    /// Important informational messages
    Info = 2,

    /// Warning messages (potential issues)
    Warn = 3,

    /// Error messages (with file:line details)
    Error = 4,
}

impl LogSeverity {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogSeverity::Trace,
            1 => LogSeverity::Debug,
            2 => LogSeverity::Info,
            3 => LogSeverity::Warn,
            _ => LogSeverity::Error,
        }
    }
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp,
                severity_str,
                source,
                entry.message,
                file,
                line
            );
        } else {
            println!(
                "[{}] [{}] [{}] {}",
                timestamp,
                severity_str,
                source,
                entry.message
            );
        }
    }
}

// ===== GLOBAL LOGGER =====

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Entries below this severity are dropped before reaching the logger
static MIN_SEVERITY: AtomicU8 = AtomicU8::new(LogSeverity::Info as u8);

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Replace the global logger with a custom implementation
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_quadtree::galaxy3d::log::{self, Logger, LogEntry};
///
/// struct FileLogger;
/// impl Logger for FileLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Write to file...
///     }
/// }
///
/// log::set_logger(FileLogger);
/// ```
pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
    if let Ok(mut lock) = logger().write() {
        *lock = Box::new(logger_impl);
    }
}

/// Reset the global logger to DefaultLogger
pub fn reset_logger() {
    if let Ok(mut lock) = logger().write() {
        *lock = Box::new(DefaultLogger);
    }
}

/// Set the minimum severity forwarded to the logger
pub fn set_min_severity(severity: LogSeverity) {
    MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
}

/// Current minimum severity forwarded to the logger
pub fn min_severity() -> LogSeverity {
    LogSeverity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
}

/// Returns true if an entry of this severity would reach the logger
pub fn enabled(severity: LogSeverity) -> bool {
    severity >= min_severity()
}

/// Logging entry point for simple logs without file:line
///
/// Used by macros like quadtree_info!, quadtree_warn!, etc.
pub fn log(severity: LogSeverity, source: &str, message: String) {
    if !enabled(severity) {
        return;
    }
    if let Ok(lock) = logger().read() {
        lock.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }
}

/// Logging entry point with file:line information (for ERROR logs)
///
/// Used by the quadtree_error! macro to include source location.
pub fn log_detailed(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: &'static str,
    line: u32,
) {
    if !enabled(severity) {
        return;
    }
    if let Ok(lock) = logger().read() {
        lock.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }
}

// ===== LOGGING MACROS =====
//
// The severity check happens before `format!` so that per-insertion trace
// logs cost nothing when filtered out.

/// Log a TRACE message (very verbose, filtered out by default)
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_quadtree::quadtree_trace;
/// quadtree_trace!("galaxy3d::QuadTree", "Descending into quadrant {}", 2);
/// ```
#[macro_export]
macro_rules! quadtree_trace {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogSeverity::Trace) {
            $crate::log::log(
                $crate::log::LogSeverity::Trace,
                $source,
                format!($($arg)*)
            )
        }
    };
}

/// Log a DEBUG message (development information)
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_quadtree::quadtree_debug;
/// quadtree_debug!("galaxy3d::QuadTree", "Grew root to side {}", 400.0);
/// ```
#[macro_export]
macro_rules! quadtree_debug {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogSeverity::Debug) {
            $crate::log::log(
                $crate::log::LogSeverity::Debug,
                $source,
                format!($($arg)*)
            )
        }
    };
}

/// Log an INFO message (important events)
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_quadtree::quadtree_info;
/// quadtree_info!("galaxy3d::QuadTree", "Built {} visibility lists", 12);
/// ```
#[macro_export]
macro_rules! quadtree_info {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogSeverity::Info) {
            $crate::log::log(
                $crate::log::LogSeverity::Info,
                $source,
                format!($($arg)*)
            )
        }
    };
}

/// Log a WARN message (potential issues)
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_quadtree::quadtree_warn;
/// quadtree_warn!("galaxy3d::QuadTree", "Tree depth {} is unusually large", 40);
/// ```
#[macro_export]
macro_rules! quadtree_warn {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogSeverity::Warn) {
            $crate::log::log(
                $crate::log::LogSeverity::Warn,
                $source,
                format!($($arg)*)
            )
        }
    };
}

/// Log an ERROR message with file:line information
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_quadtree::quadtree_error;
/// quadtree_error!("galaxy3d::QuadTree", "Invalid viewing distance: {}", -1.0);
/// ```
#[macro_export]
macro_rules! quadtree_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
