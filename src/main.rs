use mintpress::{
    arguments::{patterns, print_debug_info, print_help},
    config::Config,
    global,
    logger::{self, LogTag},
    paths,
};

/// Main entry point for Mintpress
///
/// Loads the config (creating a default one on first run), then walks the
/// publishing flow top to bottom. Exit code 0 on success, 1 on any error.
#[tokio::main]
async fn main() {
    // Ensure all directories exist BEFORE logger initialization
    // (the logger needs the logs directory to create its file)
    if let Err(e) = paths::ensure_all_directories() {
        eprintln!("Failed to create required directories: {}", e);
        std::process::exit(1);
    }

    logger::init();

    if patterns::is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    logger::info(LogTag::System, "Mintpress starting up...");
    print_debug_info();

    let config_path = mintpress::arguments::get_config_path_override()
        .unwrap_or_else(paths::default_config_path);

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            logger::error(
                LogTag::Config,
                &format!("Failed to load {}: {:#}", config_path, e),
            );
            std::process::exit(1);
        }
    };

    logger::info(
        LogTag::Config,
        &format!("Loaded config from {}", config_path),
    );

    global::init_rpc(&config);
    global::set_configs(config);

    match mintpress::run::run_publisher().await {
        Ok(()) => {
            logger::info(LogTag::System, "Finished successfully");
            logger::flush();
        }
        Err(e) => {
            logger::error(LogTag::System, &format!("Publishing flow failed: {}", e));
            logger::flush();
            std::process::exit(1);
        }
    }
}
