//! Explicit devnet airdrop tool
//!
//! Requests SOL for the configured wallet regardless of its current
//! balance, unlike the main flow which only tops up below the threshold.
//!
//! Usage:
//!   tool_airdrop [--config <path>] [--sol <amount>]

use mintpress::{
    arguments::{self, patterns},
    config::Config,
    global,
    logger::{self, LogTag},
    paths, wallet,
};
use solana_sdk::native_token::{lamports_to_sol, sol_to_lamports};
use solana_sdk::signer::Signer;
use std::time::Duration;

const DEFAULT_SOL: f64 = 1.0;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = paths::ensure_all_directories() {
        eprintln!("Failed to create required directories: {}", e);
        std::process::exit(1);
    }
    logger::init();

    if patterns::is_help_requested() {
        println!("Usage: tool_airdrop [--config <path>] [--sol <amount>]");
        return Ok(());
    }

    let config_path =
        arguments::get_config_path_override().unwrap_or_else(paths::default_config_path);
    let config = Config::load(&config_path)?;

    let rpc = global::init_rpc(&config);

    let user = wallet::load_or_create_keypair(&config.keypair_path)?;
    let sol = patterns::get_sol_amount().unwrap_or(DEFAULT_SOL);

    logger::info(
        LogTag::Wallet,
        &format!("Requesting {} SOL for {}", sol, user.pubkey()),
    );

    let signature = rpc
        .request_airdrop(&user.pubkey(), sol_to_lamports(sol))
        .await?;

    // Poll until the airdrop lands; devnet can take a few slots
    for _ in 0..30 {
        if rpc.is_confirmed(&signature).await? {
            let balance = rpc.get_balance(&user.pubkey()).await?;
            logger::info(
                LogTag::Wallet,
                &format!("Airdrop confirmed, balance now {} SOL", lamports_to_sol(balance)),
            );
            return Ok(());
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    logger::error(LogTag::Wallet, "Airdrop did not confirm in time");
    std::process::exit(1);
}
