//! Centralized path resolution for Mintpress
//!
//! All files the tool touches live under a single platform-standard data
//! directory, except the config file which stays next to the invocation
//! (current directory) so each project can carry its own token settings.
//!
//! - **macOS**: `~/Library/Application Support/Mintpress/`
//! - **Windows**: `%LOCALAPPDATA%\Mintpress\`
//! - **Linux**: `$XDG_DATA_HOME/Mintpress/` (fallback `~/.local/share/Mintpress/`)

use once_cell::sync::Lazy;
use std::path::PathBuf;

const APP_DIR: &str = "Mintpress";

/// Lazy-initialized base directory (thread-safe)
static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(resolve_base_directory);

fn resolve_base_directory() -> PathBuf {
    if let Some(dir) = dirs::data_local_dir() {
        return dir.join(APP_DIR);
    }

    if let Some(dir) = dirs::data_dir() {
        return dir.join(APP_DIR);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(APP_DIR);
    }

    PathBuf::from(APP_DIR)
}

/// Base directory for all Mintpress data
pub fn get_base_dir() -> PathBuf {
    BASE_DIRECTORY.clone()
}

/// Directory for log files
pub fn get_logs_dir() -> PathBuf {
    get_base_dir().join("logs")
}

/// Default config file path (current directory, per-project)
pub fn default_config_path() -> String {
    "configs.json".to_string()
}

/// Default keypair file path (current directory, next to the config)
pub fn default_keypair_path() -> String {
    "keypair.json".to_string()
}

/// Create every directory the tool needs before anything else runs.
///
/// The logger needs the logs directory to exist before it opens its file,
/// so this must be called first in main.
pub fn ensure_all_directories() -> Result<(), String> {
    let dirs = [get_base_dir(), get_logs_dir()];

    for dir in &dirs {
        std::fs::create_dir_all(dir).map_err(|e| {
            format!("Failed to create directory {}: {}", dir.display(), e)
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logs_dir_under_base() {
        assert!(get_logs_dir().starts_with(get_base_dir()));
    }
}
