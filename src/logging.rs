//! ModPlan Logging System
//!
//! Provides leveled logging with a system information header. Until
//! `init_logger` is called, messages only go to stderr.

use chrono::Local;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

static LOGGER: OnceLock<Mutex<PlanLogger>> = OnceLock::new();

// ============================================================================
// System Information Detection
// ============================================================================

#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub app_version: String,
    pub distro: String,
    pub kernel: String,
}

impl SystemInfo {
    pub fn detect() -> Self {
        Self {
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            distro: detect_distro(),
            kernel: detect_kernel(),
        }
    }

    pub fn to_log_header(&self) -> String {
        format!(
r#"================================================================================
ModPlan Log - {}
================================================================================
Application:   ModPlan v{}
System Info:
  Distro:      {}
  Kernel:      {}
================================================================================
"#,
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            self.app_version,
            self.distro,
            self.kernel,
        )
    }
}

fn detect_distro() -> String {
    if let Ok(file) = File::open("/etc/os-release") {
        let reader = BufReader::new(file);
        for line in reader.lines().map_while(Result::ok) {
            if line.starts_with("PRETTY_NAME=") {
                return line
                    .trim_start_matches("PRETTY_NAME=")
                    .trim_matches('"')
                    .to_string();
            }
        }
    }
    std::env::consts::OS.to_string()
}

fn detect_kernel() -> String {
    if let Ok(output) = Command::new("uname").arg("-r").output() {
        if output.status.success() {
            return String::from_utf8_lossy(&output.stdout).trim().to_string();
        }
    }
    "Unknown".to_string()
}

// ============================================================================
// Log Levels
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Test, // Installer support checks
    Install,
    Setup,
    Warning,
    Error,
}

impl LogLevel {
    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Info => "[INFO]",
            LogLevel::Test => "[TEST]",
            LogLevel::Install => "[INSTALL]",
            LogLevel::Setup => "[SETUP]",
            LogLevel::Warning => "[WARNING]",
            LogLevel::Error => "[ERROR]",
        }
    }
}

/// Format a single log line with its timestamp and level prefix.
pub fn format_line(level: LogLevel, timestamp: &str, message: &str) -> String {
    format!("[{}] {} {}", timestamp, level.prefix(), message)
}

// ============================================================================
// ModPlan Logger
// ============================================================================

pub struct PlanLogger {
    log_file: Option<File>,
    log_path: Option<PathBuf>,
    console: bool,
}

impl Default for PlanLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanLogger {
    /// A logger that only echoes to stderr.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log_file: None,
            log_path: None,
            console: true,
        }
    }

    /// Open a timestamped log file in `log_dir` and write the system header to it.
    pub fn attach_file(&mut self, log_dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(log_dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("modplan_{}.log", timestamp));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        self.log_file = Some(file);
        self.log_path = Some(log_path.clone());

        let header = SystemInfo::detect().to_log_header();
        self.write_raw(&header);

        Ok(log_path)
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.log_file {
            let _ = writeln!(file, "{}", msg);
            let _ = file.flush();
        }

        // stdout belongs to plan output
        if self.console {
            eprintln!("{}", msg);
        }
    }

    pub fn log(&mut self, level: LogLevel, message: &str) {
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        let formatted = format_line(level, &timestamp, message);
        self.write_raw(&formatted);
    }
}

// ============================================================================
// Global Logger Access
// ============================================================================

fn logger() -> &'static Mutex<PlanLogger> {
    LOGGER.get_or_init(|| Mutex::new(PlanLogger::new()))
}

/// Start writing the global log to a file under `log_dir` (call once at startup).
pub fn init_logger(log_dir: &Path) -> io::Result<PathBuf> {
    logger().lock().attach_file(log_dir)
}

/// Path of the current log file, if file logging was initialized.
pub fn log_file_path() -> Option<PathBuf> {
    logger().lock().log_path.clone()
}

/// Enable or disable echoing log lines to stderr.
pub fn set_console_output(enabled: bool) {
    logger().lock().console = enabled;
}

// ============================================================================
// Convenience Logging Functions
// ============================================================================

pub fn log_info(message: &str) {
    logger().lock().log(LogLevel::Info, message);
}

pub fn log_test(message: &str) {
    logger().lock().log(LogLevel::Test, message);
}

pub fn log_install(message: &str) {
    logger().lock().log(LogLevel::Install, message);
}

pub fn log_setup(message: &str) {
    logger().lock().log(LogLevel::Setup, message);
}

pub fn log_warning(message: &str) {
    logger().lock().log(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    logger().lock().log(LogLevel::Error, message);
}
