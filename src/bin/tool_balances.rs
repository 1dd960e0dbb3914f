//! Balance inspection tool
//!
//! Shows the configured wallet's SOL balance, and - when --mint is given -
//! the balance of its holding account for that mint.
//!
//! Usage:
//!   tool_balances [--config <path>] [--mint <address>]

use mintpress::{
    amount::format_units,
    arguments::{self, patterns},
    config::Config,
    global,
    logger::{self, LogTag},
    paths, token, wallet,
};
use solana_sdk::native_token::lamports_to_sol;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signer::Signer;
use std::str::FromStr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = paths::ensure_all_directories() {
        eprintln!("Failed to create required directories: {}", e);
        std::process::exit(1);
    }
    logger::init();

    if patterns::is_help_requested() {
        println!("Usage: tool_balances [--config <path>] [--mint <address>]");
        return Ok(());
    }

    let config_path =
        arguments::get_config_path_override().unwrap_or_else(paths::default_config_path);
    let config = Config::load(&config_path)?;

    let rpc = global::init_rpc(&config);

    let user = wallet::load_or_create_keypair(&config.keypair_path)?;
    logger::info(LogTag::Wallet, &format!("Wallet: {}", user.pubkey()));

    let balance = rpc.get_balance(&user.pubkey()).await?;
    logger::info(
        LogTag::Wallet,
        &format!("SOL balance: {} SOL", lamports_to_sol(balance)),
    );

    if let Some(mint_str) = patterns::get_mint_address() {
        let mint = Pubkey::from_str(&mint_str)?;
        let holding_account = token::holding_account_address(&mint, &user.pubkey());

        let decimals = token::fetch_mint_decimals(&rpc, &mint).await?;
        let base_units = token::fetch_holding_balance(&rpc, &holding_account).await?;

        logger::info(
            LogTag::Token,
            &format!("Holding account: {}", holding_account),
        );
        logger::info(
            LogTag::Token,
            &format!(
                "Token balance: {} ({} base units)",
                format_units(base_units, decimals),
                base_units
            ),
        );
    }

    Ok(())
}
