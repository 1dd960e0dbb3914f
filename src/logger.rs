//! Structured logging for Mintpress
//!
//! Console + file logging with standard levels and per-module debug gating:
//! - Errors, warnings and info are always shown
//! - Debug logs require the matching `--debug-<module>` flag
//! - Verbose logs require `--verbose`
//!
//! ## Usage
//!
//! ```rust
//! use mintpress::logger::{self, LogTag};
//!
//! logger::info(LogTag::Token, "Mint created");
//! logger::debug(LogTag::Rpc, "Request payload: ...");   // only with --debug-rpc
//! ```
//!
//! Call `logger::init()` once at startup, after the log directory exists.

use crate::arguments;
use crate::paths;
use chrono::Local;
use colored::*;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::Mutex;

/// Log level, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,   // gated by --debug-<module>
    Verbose = 4, // gated by --verbose
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Verbose => "VERBOSE",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source module of a log line; also the key for `--debug-<module>` gating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    System,
    Config,
    Wallet,
    Rpc,
    Token,
    Metadata,
    Storage,
}

impl LogTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Wallet => "WALLET",
            LogTag::Rpc => "RPC",
            LogTag::Token => "TOKEN",
            LogTag::Metadata => "METADATA",
            LogTag::Storage => "STORAGE",
        }
    }

    /// Whether debug logs for this tag were requested on the command line
    fn debug_enabled(&self) -> bool {
        match self {
            LogTag::System | LogTag::Config => arguments::is_any_debug_enabled(),
            LogTag::Wallet => arguments::is_debug_wallet_enabled(),
            LogTag::Rpc => arguments::is_debug_rpc_enabled(),
            LogTag::Token => arguments::is_debug_token_enabled(),
            LogTag::Metadata => arguments::is_debug_metadata_enabled(),
            LogTag::Storage => arguments::is_debug_storage_enabled(),
        }
    }

    fn colored(&self) -> ColoredString {
        match self {
            LogTag::System => self.as_str().green().bold(),
            LogTag::Config => self.as_str().white().bold(),
            LogTag::Wallet => self.as_str().blue().bold(),
            LogTag::Rpc => self.as_str().bright_green().bold(),
            LogTag::Token => self.as_str().yellow().bold(),
            LogTag::Metadata => self.as_str().magenta().bold(),
            LogTag::Storage => self.as_str().cyan().bold(),
        }
    }
}

/// Open file handle for log persistence, None until init() runs
static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

/// Initialize the logger system
///
/// Opens the log file under the logs directory. Must run once at startup;
/// logging before init still works but only reaches the console.
pub fn init() {
    let path = paths::get_logs_dir().join(format!(
        "mintpress_{}.log",
        Local::now().format("%Y-%m-%d")
    ));

    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            if let Ok(mut guard) = LOG_FILE.lock() {
                *guard = Some(file);
            }
        }
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
        }
    }
}

/// Force flush pending log writes, used during shutdown
pub fn flush() {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(file) = guard.as_mut() {
            let _ = file.flush();
        }
    }
}

pub fn error(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Error, message);
}

pub fn warning(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Warning, message);
}

pub fn info(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Info, message);
}

/// Only shown with the matching --debug-<module> flag
pub fn debug(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Debug, message);
}

/// Only shown with --verbose
pub fn verbose(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Verbose, message);
}

fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    match level {
        LogLevel::Error | LogLevel::Warning | LogLevel::Info => true,
        LogLevel::Debug => tag.debug_enabled() || arguments::patterns::is_verbose_mode(),
        LogLevel::Verbose => arguments::patterns::is_verbose_mode(),
    }
}

fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    let time = Local::now().format("%H:%M:%S").to_string();

    let level_str = match level {
        LogLevel::Error => level.as_str().red().bold(),
        LogLevel::Warning => level.as_str().yellow().bold(),
        LogLevel::Info => level.as_str().normal(),
        LogLevel::Debug => level.as_str().purple(),
        LogLevel::Verbose => level.as_str().dimmed(),
    };

    println!(
        "{} [{}] [{}] {}",
        format!("[{}]", time).dimmed(),
        tag.colored(),
        level_str,
        highlight_message(message)
    );
    let _ = io::stdout().flush();

    write_to_file(&format!(
        "[{}] [{}] [{}] {}\n",
        time,
        tag.as_str(),
        level.as_str(),
        message
    ));
}

fn write_to_file(line: &str) {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(file) = guard.as_mut() {
            let _ = file.write_all(line.as_bytes());
        }
    }
}

static SIGNATURE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([1-9A-HJ-NP-Za-km-z]{80,90})").unwrap());
static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([1-9A-HJ-NP-Za-km-z]{32,44})").unwrap());

/// Shorten and colorize base58 addresses and transaction signatures so
/// console output stays scannable. The file log keeps the full values.
fn highlight_message(message: &str) -> String {
    let formatted = SIGNATURE_RE
        .replace_all(message, |caps: &regex::Captures| {
            let sig = &caps[1];
            format!(
                "{}...{}",
                sig[..12].bright_yellow().bold(),
                sig[sig.len() - 8..].bright_yellow().bold()
            )
        })
        .to_string();

    ADDRESS_RE
        .replace_all(&formatted, |caps: &regex::Captures| {
            let addr = &caps[1];
            format!(
                "{}...{}",
                addr[..8].bright_cyan().bold(),
                addr[addr.len() - 4..].bright_cyan().bold()
            )
        })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warning);
        assert!(LogLevel::Debug < LogLevel::Verbose);
    }

    #[test]
    fn test_highlight_shortens_addresses() {
        let msg = "Mint: So11111111111111111111111111111111111111112";
        let out = highlight_message(msg);
        assert!(out.contains("So111111"));
        assert!(out.contains("..."));
        // Full address must no longer appear verbatim
        assert!(!out.contains("So11111111111111111111111111111111111111112"));
    }

    #[test]
    fn test_errors_always_logged() {
        assert!(should_log(&LogTag::Rpc, LogLevel::Error));
        assert!(should_log(&LogTag::Rpc, LogLevel::Info));
    }
}
