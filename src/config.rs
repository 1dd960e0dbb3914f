use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::amount::MAX_DECIMALS;
use crate::paths;

/// Runtime configuration for the publishing flow, loaded from configs.json.
///
/// Everything the flow needs lives here: asset path, token identity,
/// decimals, amounts, endpoints. A default file is written on first run
/// so the operator only has to fill in what differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the signing keypair file; created if absent
    pub keypair_path: String,
    pub rpc_url: String,
    pub storage: StorageConfig,
    pub token: TokenConfig,
    pub flow: FlowConfig,
    #[serde(default)]
    pub airdrop: AirdropConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base URL of the upload gateway
    pub gateway_url: String,
    /// Upload timeout; a slow gateway aborts the whole run
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub description: String,
    /// Local image file uploaded as the token's picture
    pub asset_path: String,
    pub decimals: u8,
    /// When set, the flow reuses this mint instead of creating a new one
    #[serde(default)]
    pub existing_mint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Whole tokens minted to the payer's holding account
    pub mint_amount: u64,
    /// Whole tokens transferred out afterwards
    pub transfer_amount: u64,
    /// Transfer recipient; a throwaway account is generated when unset
    #[serde(default)]
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirdropConfig {
    pub enabled: bool,
    /// Request an airdrop when the payer balance drops below this
    pub min_balance_sol: f64,
    pub request_sol: f64,
}

impl Default for AirdropConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_balance_sol: 0.5,
            request_sol: 1.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keypair_path: paths::default_keypair_path(),
            rpc_url: "https://api.devnet.solana.com".to_string(),
            storage: StorageConfig {
                gateway_url: "https://devnet.bundlr.network".to_string(),
                timeout_secs: 60,
            },
            token: TokenConfig {
                name: "mintfu".to_string(),
                symbol: "MTF".to_string(),
                description: "Grab the ninja mintfus to gain access to my ninja house party"
                    .to_string(),
                asset_path: "assets/mintfu.png".to_string(),
                decimals: 2,
                existing_mint: None,
            },
            flow: FlowConfig {
                mint_amount: 100,
                transfer_amount: 50,
                recipient: None,
            },
            airdrop: AirdropConfig::default(),
        }
    }
}

// On-chain limits of the token-metadata program
const MAX_NAME_LENGTH: usize = 32;
const MAX_SYMBOL_LENGTH: usize = 10;

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            let default_config = Self::default();
            default_config.save(path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.name.is_empty() || self.token.name.len() > MAX_NAME_LENGTH {
            anyhow::bail!(
                "token.name must be 1-{} characters, got {}",
                MAX_NAME_LENGTH,
                self.token.name.len()
            );
        }

        if self.token.symbol.is_empty() || self.token.symbol.len() > MAX_SYMBOL_LENGTH {
            anyhow::bail!(
                "token.symbol must be 1-{} characters, got {}",
                MAX_SYMBOL_LENGTH,
                self.token.symbol.len()
            );
        }

        if self.token.decimals > MAX_DECIMALS {
            anyhow::bail!(
                "token.decimals must be at most {}, got {}",
                MAX_DECIMALS,
                self.token.decimals
            );
        }

        if self.flow.mint_amount == 0 {
            anyhow::bail!("flow.mint_amount must be greater than zero");
        }

        if self.flow.transfer_amount == 0 {
            anyhow::bail!("flow.transfer_amount must be greater than zero");
        }

        if self.storage.timeout_secs == 0 {
            anyhow::bail!("storage.timeout_secs must be greater than zero");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("configs.json");
        let path_str = path.to_str().unwrap();

        let config = Config::load(path_str).unwrap();
        assert!(path.exists());
        assert_eq!(config.token.decimals, 2);
        assert_eq!(config.flow.mint_amount, 100);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("configs.json");
        let path_str = path.to_str().unwrap();

        let mut config = Config::default();
        config.token.symbol = "ABC".to_string();
        config.token.existing_mint =
            Some("8s3T8AkbTuiTFPLSFwYU1kcBscxozQnpQS7FDK2tAGiM".to_string());
        config.save(path_str).unwrap();

        let loaded = Config::load(path_str).unwrap();
        assert_eq!(loaded.token.symbol, "ABC");
        assert_eq!(
            loaded.token.existing_mint.as_deref(),
            Some("8s3T8AkbTuiTFPLSFwYU1kcBscxozQnpQS7FDK2tAGiM")
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.token.decimals = 12;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.token.symbol = "TOOLONGSYMBOL".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.flow.mint_amount = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.storage.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
