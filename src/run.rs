//! The publishing flow
//!
//! Strictly sequential: identity -> funding -> mint -> holding account ->
//! metadata -> supply -> transfer. Every step blocks until its remote call
//! confirms; the first failure aborts the run and leaves on-chain state
//! exactly as the last successful step left it.

use crate::arguments;
use crate::errors::PublishError;
use crate::global;
use crate::logger::{self, LogTag};
use crate::metadata;
use crate::storage::StorageClient;
use crate::token;
use crate::wallet;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use std::str::FromStr;

/// Run the full publishing flow from the loaded config.
pub async fn run_publisher() -> Result<(), PublishError> {
    let config = global::read_configs()?;
    let rpc = global::get_rpc()?;

    let storage = StorageClient::new(&config.storage.gateway_url, config.storage.timeout_secs)?;

    // 1. Identity
    let user = wallet::load_or_create_keypair(&config.keypair_path)?;
    logger::info(LogTag::System, &format!("PublicKey: {}", user.pubkey()));

    wallet::ensure_funded(&rpc, &user.pubkey(), &config.airdrop).await?;

    // 2. Mint
    let mint = match &config.token.existing_mint {
        Some(address) => {
            let mint = Pubkey::from_str(address)
                .map_err(|e| PublishError::invalid_address(address, e))?;
            logger::info(LogTag::Token, &format!("Using existing mint {}", mint));
            mint
        }
        None => {
            if arguments::is_update_metadata_enabled() {
                return Err(PublishError::Config(
                    "--update-metadata requires token.existing_mint in the config".to_string(),
                ));
            }
            token::create_mint(
                &rpc,
                &user,           // pays the fees
                &user.pubkey(),  // mint authority
                &user.pubkey(),  // freeze authority
                config.token.decimals,
            )
            .await?
        }
    };

    // 3. Holding account for the payer
    let holding_account =
        token::get_or_create_holding_account(&rpc, &user, &mint, &user.pubkey()).await?;

    // 4. Metadata
    if arguments::is_update_metadata_enabled() {
        metadata::update_token_metadata(
            &rpc,
            &storage,
            &mint,
            &user,
            &config.token.asset_path,
            &config.token.name,
            &config.token.symbol,
            &config.token.description,
        )
        .await?;
    } else {
        metadata::create_token_metadata(
            &rpc,
            &storage,
            &mint,
            &user,
            &config.token.asset_path,
            &config.token.name,
            &config.token.symbol,
            &config.token.description,
        )
        .await?;
    }

    // 5. Supply
    token::mint_supply(
        &rpc,
        &user,
        &mint,
        &holding_account,
        &user,
        config.flow.mint_amount,
    )
    .await?;

    // 6. Transfer
    let recipient = match &config.flow.recipient {
        Some(address) => Pubkey::from_str(address)
            .map_err(|e| PublishError::invalid_address(address, e))?,
        None => {
            let throwaway = Keypair::new().pubkey();
            logger::info(
                LogTag::Token,
                &format!("No recipient configured, generated throwaway {}", throwaway),
            );
            throwaway
        }
    };

    let recipient_account =
        token::get_or_create_holding_account(&rpc, &user, &mint, &recipient).await?;

    token::transfer_tokens(
        &rpc,
        &user,
        &holding_account,
        &recipient_account,
        &user,
        config.flow.transfer_amount,
        &mint,
    )
    .await?;

    logger::info(LogTag::System, "Publishing flow finished successfully");

    Ok(())
}
