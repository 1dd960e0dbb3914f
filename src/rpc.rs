//! Centralized RPC access for Mintpress
//!
//! Wraps the blocking Solana RPC client behind async methods. Every SDK
//! call runs inside `tokio::task::spawn_blocking` so the runtime stays
//! responsive while a confirmation round-trip is in flight. The handle is
//! created once from config and shared through `global::get_rpc()`.

use crate::errors::PublishError;
use crate::logger::{self, LogTag};
use solana_client::rpc_client::RpcClient as SolanaRpcClient;
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use std::sync::Arc;

pub struct RpcHandle {
    client: Arc<SolanaRpcClient>,
    rpc_url: String,
}

impl RpcHandle {
    pub fn new(rpc_url: &str) -> Self {
        logger::info(
            LogTag::Rpc,
            &format!("Initializing RPC client: {}", rpc_url),
        );

        let client = SolanaRpcClient::new_with_commitment(
            rpc_url.to_string(),
            CommitmentConfig::confirmed(),
        );

        Self {
            client: Arc::new(client),
            rpc_url: rpc_url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.rpc_url
    }

    /// Fetch an account, erroring when it does not exist
    pub async fn get_account(&self, pubkey: &Pubkey) -> Result<Account, PublishError> {
        logger::debug(LogTag::Rpc, &format!("getAccount {}", pubkey));

        tokio::task::spawn_blocking({
            let client = self.client.clone();
            let pubkey = *pubkey;
            move || {
                client
                    .get_account(&pubkey)
                    .map_err(|e| PublishError::Rpc(format!("Failed to get account {}: {}", pubkey, e)))
            }
        })
        .await
        .map_err(|e| PublishError::Rpc(format!("Task error: {}", e)))?
    }

    /// Whether an account exists at this address (at confirmed commitment)
    pub async fn account_exists(&self, pubkey: &Pubkey) -> Result<bool, PublishError> {
        logger::debug(LogTag::Rpc, &format!("getAccountInfo {}", pubkey));

        tokio::task::spawn_blocking({
            let client = self.client.clone();
            let pubkey = *pubkey;
            move || {
                client
                    .get_account_with_commitment(&pubkey, CommitmentConfig::confirmed())
                    .map(|response| response.value.is_some())
                    .map_err(|e| {
                        PublishError::Rpc(format!("Failed to check account {}: {}", pubkey, e))
                    })
            }
        })
        .await
        .map_err(|e| PublishError::Rpc(format!("Task error: {}", e)))?
    }

    /// SOL balance in lamports
    pub async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, PublishError> {
        logger::debug(LogTag::Rpc, &format!("getBalance {}", pubkey));

        tokio::task::spawn_blocking({
            let client = self.client.clone();
            let pubkey = *pubkey;
            move || {
                client
                    .get_balance(&pubkey)
                    .map_err(|e| PublishError::Rpc(format!("Failed to get balance {}: {}", pubkey, e)))
            }
        })
        .await
        .map_err(|e| PublishError::Rpc(format!("Task error: {}", e)))?
    }

    pub async fn minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, PublishError> {
        tokio::task::spawn_blocking({
            let client = self.client.clone();
            move || {
                client
                    .get_minimum_balance_for_rent_exemption(data_len)
                    .map_err(|e| PublishError::Rpc(format!("Failed to get rent exemption: {}", e)))
            }
        })
        .await
        .map_err(|e| PublishError::Rpc(format!("Task error: {}", e)))?
    }

    pub async fn get_latest_blockhash(&self) -> Result<Hash, PublishError> {
        tokio::task::spawn_blocking({
            let client = self.client.clone();
            move || {
                client
                    .get_latest_blockhash()
                    .map_err(|e| PublishError::Rpc(format!("Failed to get latest blockhash: {}", e)))
            }
        })
        .await
        .map_err(|e| PublishError::Rpc(format!("Task error: {}", e)))?
    }

    /// Submit a signed transaction and block until it is confirmed
    pub async fn send_and_confirm(
        &self,
        transaction: Transaction,
    ) -> Result<Signature, PublishError> {
        logger::debug(LogTag::Rpc, "sendTransaction (waiting for confirmation)");

        tokio::task::spawn_blocking({
            let client = self.client.clone();
            move || {
                client
                    .send_and_confirm_transaction(&transaction)
                    .map_err(|e| PublishError::Transaction(e.to_string()))
            }
        })
        .await
        .map_err(|e| PublishError::Rpc(format!("Task error: {}", e)))?
    }

    pub async fn request_airdrop(
        &self,
        pubkey: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, PublishError> {
        logger::debug(
            LogTag::Rpc,
            &format!("requestAirdrop {} lamports to {}", lamports, pubkey),
        );

        tokio::task::spawn_blocking({
            let client = self.client.clone();
            let pubkey = *pubkey;
            move || {
                client
                    .request_airdrop(&pubkey, lamports)
                    .map_err(|e| PublishError::Rpc(format!("Airdrop request failed: {}", e)))
            }
        })
        .await
        .map_err(|e| PublishError::Rpc(format!("Task error: {}", e)))?
    }

    /// Whether a signature has reached confirmed commitment
    pub async fn is_confirmed(&self, signature: &Signature) -> Result<bool, PublishError> {
        tokio::task::spawn_blocking({
            let client = self.client.clone();
            let signature = *signature;
            move || {
                client
                    .confirm_transaction(&signature)
                    .map_err(|e| PublishError::Rpc(format!("Failed to confirm {}: {}", signature, e)))
            }
        })
        .await
        .map_err(|e| PublishError::Rpc(format!("Task error: {}", e)))?
    }
}

// =============================================================================
// EXPLORER LINKS
// =============================================================================

fn cluster_query(rpc_url: &str) -> &'static str {
    if rpc_url.contains("devnet") {
        "?cluster=devnet"
    } else if rpc_url.contains("testnet") {
        "?cluster=testnet"
    } else {
        ""
    }
}

/// Solana Explorer link for an address, matching the configured cluster
pub fn explorer_address_url(address: &str, rpc_url: &str) -> String {
    format!(
        "https://explorer.solana.com/address/{}{}",
        address,
        cluster_query(rpc_url)
    )
}

/// Solana Explorer link for a transaction signature
pub fn explorer_tx_url(signature: &str, rpc_url: &str) -> String {
    format!(
        "https://explorer.solana.com/tx/{}{}",
        signature,
        cluster_query(rpc_url)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_query() {
        assert_eq!(cluster_query("https://api.devnet.solana.com"), "?cluster=devnet");
        assert_eq!(cluster_query("https://api.testnet.solana.com"), "?cluster=testnet");
        assert_eq!(cluster_query("https://api.mainnet-beta.solana.com"), "");
    }

    #[test]
    fn test_explorer_urls() {
        let url = explorer_address_url(
            "8s3T8AkbTuiTFPLSFwYU1kcBscxozQnpQS7FDK2tAGiM",
            "https://api.devnet.solana.com",
        );
        assert_eq!(
            url,
            "https://explorer.solana.com/address/8s3T8AkbTuiTFPLSFwYU1kcBscxozQnpQS7FDK2tAGiM?cluster=devnet"
        );

        let url = explorer_tx_url("abc", "https://api.mainnet-beta.solana.com");
        assert_eq!(url, "https://explorer.solana.com/tx/abc");
    }
}
