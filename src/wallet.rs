//! Identity loading and funding for the publishing flow
//!
//! The signing keypair lives in an on-disk file. Two secret formats are
//! accepted: the standard JSON byte-array layout written by solana-keygen,
//! and a bare base58-encoded secret string. A missing file is not an
//! error - a fresh keypair is generated and persisted so repeat runs keep
//! the same identity.

use crate::config::AirdropConfig;
use crate::errors::PublishError;
use crate::logger::{self, LogTag};
use crate::rpc::RpcHandle;
use solana_sdk::native_token::{lamports_to_sol, sol_to_lamports};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use std::path::Path;
use std::time::Duration;

const KEYPAIR_BYTES: usize = 64;

/// How long to wait for an airdrop to confirm before giving up
const AIRDROP_CONFIRM_ATTEMPTS: u32 = 30;
const AIRDROP_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Parse a keypair secret in either accepted format
pub fn parse_keypair_secret(secret: &str) -> Result<Keypair, PublishError> {
    let trimmed = secret.trim();

    let bytes: Vec<u8> = if trimmed.starts_with('[') && trimmed.ends_with(']') {
        // JSON byte-array layout, as written by solana-keygen
        serde_json::from_str(trimmed)
            .map_err(|e| PublishError::Wallet(format!("Invalid keypair file: {}", e)))?
    } else {
        // Bare base58 secret string
        bs58::decode(trimmed)
            .into_vec()
            .map_err(|e| PublishError::Wallet(format!("Invalid base58 secret: {}", e)))?
    };

    if bytes.len() != KEYPAIR_BYTES {
        return Err(PublishError::Wallet(format!(
            "Invalid secret length: expected {} bytes, got {}",
            KEYPAIR_BYTES,
            bytes.len()
        )));
    }

    Keypair::try_from(&bytes[..])
        .map_err(|e| PublishError::Wallet(format!("Failed to create keypair: {}", e)))
}

/// Serialize a keypair in the JSON byte-array layout
fn keypair_to_file_contents(keypair: &Keypair) -> Result<String, PublishError> {
    let bytes: Vec<u8> = keypair.to_bytes().to_vec();
    Ok(serde_json::to_string(&bytes)?)
}

/// Load the signing keypair from `path`, generating and persisting a fresh
/// one when the file does not exist.
pub fn load_or_create_keypair(path: &str) -> Result<Keypair, PublishError> {
    if Path::new(path).exists() {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PublishError::Wallet(format!("Failed to read keypair file {}: {}", path, e))
        })?;

        let keypair = parse_keypair_secret(&contents)?;
        logger::info(
            LogTag::Wallet,
            &format!("Loaded keypair {} from {}", keypair.pubkey(), path),
        );
        return Ok(keypair);
    }

    let keypair = Keypair::new();
    std::fs::write(path, keypair_to_file_contents(&keypair)?).map_err(|e| {
        PublishError::Wallet(format!("Failed to write keypair file {}: {}", path, e))
    })?;

    logger::info(
        LogTag::Wallet,
        &format!("Generated new keypair {} and saved to {}", keypair.pubkey(), path),
    );

    Ok(keypair)
}

/// Top the account up through a devnet airdrop when its balance is below
/// the configured working minimum. No-op when airdrops are disabled.
pub async fn ensure_funded(
    rpc: &RpcHandle,
    pubkey: &Pubkey,
    airdrop: &AirdropConfig,
) -> Result<(), PublishError> {
    let balance = rpc.get_balance(pubkey).await?;
    logger::info(
        LogTag::Wallet,
        &format!("Balance: {} SOL", lamports_to_sol(balance)),
    );

    if !airdrop.enabled {
        return Ok(());
    }

    if balance >= sol_to_lamports(airdrop.min_balance_sol) {
        return Ok(());
    }

    let lamports = sol_to_lamports(airdrop.request_sol);
    logger::info(
        LogTag::Wallet,
        &format!(
            "Balance below {} SOL, requesting {} SOL airdrop...",
            airdrop.min_balance_sol, airdrop.request_sol
        ),
    );

    let signature = rpc.request_airdrop(pubkey, lamports).await?;

    for _ in 0..AIRDROP_CONFIRM_ATTEMPTS {
        if rpc.is_confirmed(&signature).await? {
            let new_balance = rpc.get_balance(pubkey).await?;
            logger::info(
                LogTag::Wallet,
                &format!(
                    "Airdrop confirmed, balance now {} SOL",
                    lamports_to_sol(new_balance)
                ),
            );
            return Ok(());
        }
        tokio::time::sleep(AIRDROP_POLL_INTERVAL).await;
    }

    Err(PublishError::Wallet(format!(
        "Airdrop {} did not confirm in time",
        signature
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_keypair_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keypair.json");
        let path_str = path.to_str().unwrap();

        let created = load_or_create_keypair(path_str).unwrap();
        assert!(path.exists());

        // Second load must yield the same identity, not a new keypair
        let reloaded = load_or_create_keypair(path_str).unwrap();
        assert_eq!(created.pubkey(), reloaded.pubkey());
    }

    #[test]
    fn test_parse_base58_secret() {
        let keypair = Keypair::new();
        let encoded = bs58::encode(keypair.to_bytes()).into_string();

        let parsed = parse_keypair_secret(&encoded).unwrap();
        assert_eq!(parsed.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_parse_array_secret_with_whitespace() {
        let keypair = Keypair::new();
        let contents = keypair_to_file_contents(&keypair).unwrap();

        let parsed = parse_keypair_secret(&format!("  {}\n", contents)).unwrap();
        assert_eq!(parsed.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(parse_keypair_secret("[1,2,3]").is_err());
        assert!(parse_keypair_secret("not-base58-!!").is_err());
    }
}
