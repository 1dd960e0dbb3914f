/// Centralized argument handling for Mintpress
///
/// The publishing flow itself is configured through configs.json; command
/// line flags only select modes and debug output. Parsing is a simple scan
/// over the raw argument vector - no positional arguments exist.
///
/// Features:
/// - Centralized CMD_ARGS storage with thread-safe access
/// - Debug flag checking functions for all modules
/// - Shared argument patterns for the tool binaries
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by binaries and tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
/// Returns None if the flag is not found or has no value
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

// =============================================================================
// MODE FLAGS
// =============================================================================

/// Update an existing metadata record instead of creating one.
/// Requires `token.existing_mint` to be set in the config.
pub fn is_update_metadata_enabled() -> bool {
    has_arg("--update-metadata")
}

/// Path override for the config file
pub fn get_config_path_override() -> Option<String> {
    get_arg_value("--config")
}

// =============================================================================
// DEBUG FLAG CHECKING FUNCTIONS
// =============================================================================

/// Wallet operations debug mode
pub fn is_debug_wallet_enabled() -> bool {
    has_arg("--debug-wallet")
}

/// RPC calls debug mode
pub fn is_debug_rpc_enabled() -> bool {
    has_arg("--debug-rpc")
}

/// Token operations debug mode
pub fn is_debug_token_enabled() -> bool {
    has_arg("--debug-token")
}

/// Metadata publishing debug mode
pub fn is_debug_metadata_enabled() -> bool {
    has_arg("--debug-metadata")
}

/// Storage uploads debug mode
pub fn is_debug_storage_enabled() -> bool {
    has_arg("--debug-storage")
}

/// Checks if any debug mode is enabled
pub fn is_any_debug_enabled() -> bool {
    is_debug_wallet_enabled() ||
        is_debug_rpc_enabled() ||
        is_debug_token_enabled() ||
        is_debug_metadata_enabled() ||
        is_debug_storage_enabled()
}

/// Gets a list of all enabled debug modes
pub fn get_enabled_debug_modes() -> Vec<&'static str> {
    let mut modes = Vec::new();

    if is_debug_wallet_enabled() {
        modes.push("wallet");
    }
    if is_debug_rpc_enabled() {
        modes.push("rpc");
    }
    if is_debug_token_enabled() {
        modes.push("token");
    }
    if is_debug_metadata_enabled() {
        modes.push("metadata");
    }
    if is_debug_storage_enabled() {
        modes.push("storage");
    }
    if is_update_metadata_enabled() {
        modes.push("update-metadata");
    }

    modes
}

/// Prints debug information about current arguments and enabled debug modes
pub fn print_debug_info() {
    let enabled_modes = get_enabled_debug_modes();
    if !enabled_modes.is_empty() {
        println!("Enabled debug modes: {:?}", enabled_modes);
    }
}

/// Prints usage for the main binary
pub fn print_help() {
    println!("Mintpress - publish a fungible token on Solana devnet");
    println!();
    println!("USAGE:");
    println!("    mintpress [OPTIONS]");
    println!();
    println!("The flow is driven by configs.json (created with defaults on first run):");
    println!("    create mint -> provision account -> publish metadata -> mint supply -> transfer");
    println!();
    println!("OPTIONS:");
    println!("    --config <path>      Use a config file other than ./configs.json");
    println!("    --update-metadata    Update the existing metadata record for");
    println!("                         token.existing_mint instead of creating one");
    println!("    --debug-<module>     Enable debug logs (wallet, rpc, token, metadata, storage)");
    println!("    --verbose, -v        Enable verbose logs for all modules");
    println!("    --help, -h           Show this help");
}

// =============================================================================
// COMMON ARGUMENT PATTERNS
// =============================================================================

/// Common argument parsing patterns used across binaries
pub mod patterns {
    use super::*;

    /// Checks for help flags
    pub fn is_help_requested() -> bool {
        has_arg("--help") || has_arg("-h")
    }

    /// Gets mint address argument (used by the tool binaries)
    pub fn get_mint_address() -> Option<String> {
        get_arg_value("--mint")
    }

    /// Gets SOL amount argument (used by tool_airdrop)
    pub fn get_sol_amount() -> Option<f64> {
        get_arg_value("--sol").and_then(|s| s.parse().ok())
    }

    /// Checks for verbose mode
    pub fn is_verbose_mode() -> bool {
        has_arg("--verbose") || has_arg("-v")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests mutate the global CMD_ARGS vector, so they serialize on
    // their own lock to stay independent of the harness thread count.
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_and_get_args() {
        let _guard = TEST_LOCK.lock().unwrap();
        let test_args = vec![
            "mintpress".to_string(),
            "--debug-token".to_string(),
            "--config".to_string(),
            "custom.json".to_string(),
        ];

        set_cmd_args(test_args.clone());
        assert_eq!(get_cmd_args(), test_args);
        assert!(has_arg("--debug-token"));
        assert!(!has_arg("--debug-wallet"));
        assert_eq!(get_arg_value("--config"), Some("custom.json".to_string()));
        assert_eq!(get_arg_value("--mint"), None);
    }

    #[test]
    fn test_debug_flags() {
        let _guard = TEST_LOCK.lock().unwrap();
        set_cmd_args(vec![
            "mintpress".to_string(),
            "--debug-metadata".to_string(),
            "--update-metadata".to_string(),
        ]);

        assert!(is_debug_metadata_enabled());
        assert!(is_update_metadata_enabled());
        assert!(is_any_debug_enabled());

        let modes = get_enabled_debug_modes();
        assert!(modes.contains(&"metadata"));
        assert!(modes.contains(&"update-metadata"));
        assert!(!modes.contains(&"storage"));
    }

    #[test]
    fn test_patterns() {
        let _guard = TEST_LOCK.lock().unwrap();
        set_cmd_args(vec![
            "tool_airdrop".to_string(),
            "--sol".to_string(),
            "1.5".to_string(),
            "-h".to_string(),
        ]);

        assert!(patterns::is_help_requested());
        assert_eq!(patterns::get_sol_amount(), Some(1.5));
        assert!(!patterns::is_verbose_mode());
    }
}
