//! Metadata publishing for a token mint
//!
//! Two-stage pipeline matching the token-metadata program's model:
//! the image and a JSON document go to remote storage first, then one
//! on-chain instruction binds the document URI to the mint's metadata
//! account (a PDA derived from the mint).
//!
//! The "create" variant fails on a mint that already has a record; the
//! "update" variant fails unless the signer matches the stored update
//! authority. Both checks are enforced by the program itself. When the
//! on-chain step fails after the uploads succeeded, the uploaded
//! documents stay behind as orphaned storage - logged, not repaired.

use crate::errors::PublishError;
use crate::logger::{self, LogTag};
use crate::rpc::{self, RpcHandle};
use crate::storage::{content_type_for, StorageClient};
use mpl_token_metadata::accounts::Metadata;
use mpl_token_metadata::instructions::{
    CreateMetadataAccountV3Builder, UpdateMetadataAccountV2Builder,
};
use mpl_token_metadata::types::DataV2;
use serde::{Deserialize, Serialize};
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;

/// The off-chain document referenced by the on-chain record's URI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffChainMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    /// URI of the uploaded token image
    pub image: String,
}

/// Deterministic metadata account address for a mint
pub fn find_metadata_address(mint: &Pubkey) -> Pubkey {
    Metadata::find_pda(mint).0
}

/// On-chain metadata payload. Royalties and the creator/collection/uses
/// fields are intentionally empty for this flow.
fn onchain_data(name: &str, symbol: &str, uri: &str) -> DataV2 {
    DataV2 {
        name: name.to_string(),
        symbol: symbol.to_string(),
        uri: uri.to_string(),
        seller_fee_basis_points: 0,
        creators: None,
        collection: None,
        uses: None,
    }
}

fn build_create_instruction(
    mint: &Pubkey,
    metadata_address: &Pubkey,
    authority: &Pubkey,
    data: DataV2,
) -> Instruction {
    CreateMetadataAccountV3Builder::new()
        .metadata(*metadata_address)
        .mint(*mint)
        .mint_authority(*authority)
        .payer(*authority)
        .update_authority(*authority, true)
        .data(data)
        .is_mutable(true)
        .instruction()
}

fn build_update_instruction(
    metadata_address: &Pubkey,
    update_authority: &Pubkey,
    data: DataV2,
) -> Instruction {
    UpdateMetadataAccountV2Builder::new()
        .metadata(*metadata_address)
        .update_authority(*update_authority)
        .data(data)
        .primary_sale_happened(true)
        .is_mutable(true)
        .instruction()
}

/// Upload the image and the JSON document, returning the document URI
/// that goes into the on-chain record.
async fn upload_assets(
    storage: &StorageClient,
    asset_path: &str,
    name: &str,
    symbol: &str,
    description: &str,
) -> Result<String, PublishError> {
    let bytes =
        std::fs::read(asset_path).map_err(|e| PublishError::asset(asset_path, e))?;

    let image_uri = storage
        .upload_bytes(bytes, content_type_for(asset_path))
        .await?;
    logger::info(LogTag::Storage, &format!("Image uri: {}", image_uri));

    let document = OffChainMetadata {
        name: name.to_string(),
        symbol: symbol.to_string(),
        description: description.to_string(),
        image: image_uri,
    };

    let metadata_uri = storage.upload_json(&document).await?;
    logger::info(LogTag::Storage, &format!("Metadata uri: {}", metadata_uri));

    Ok(metadata_uri)
}

/// Create the metadata record for a mint that does not have one yet.
///
/// The signer pays fees, must be the mint authority, and becomes the
/// record's update authority.
pub async fn create_token_metadata(
    rpc: &RpcHandle,
    storage: &StorageClient,
    mint: &Pubkey,
    user: &Keypair,
    asset_path: &str,
    name: &str,
    symbol: &str,
    description: &str,
) -> Result<Signature, PublishError> {
    let uri = upload_assets(storage, asset_path, name, symbol, description).await?;

    let metadata_address = find_metadata_address(mint);
    logger::debug(
        LogTag::Metadata,
        &format!("Metadata account: {}", metadata_address),
    );

    let instruction = build_create_instruction(
        mint,
        &metadata_address,
        &user.pubkey(),
        onchain_data(name, symbol, &uri),
    );

    submit_metadata_instruction(rpc, user, instruction, "Create").await
}

/// Update an existing metadata record. Fails on chain when the signer
/// does not match the stored update authority; the record is untouched
/// in that case.
pub async fn update_token_metadata(
    rpc: &RpcHandle,
    storage: &StorageClient,
    mint: &Pubkey,
    user: &Keypair,
    asset_path: &str,
    name: &str,
    symbol: &str,
    description: &str,
) -> Result<Signature, PublishError> {
    let uri = upload_assets(storage, asset_path, name, symbol, description).await?;

    let metadata_address = find_metadata_address(mint);

    let instruction = build_update_instruction(
        &metadata_address,
        &user.pubkey(),
        onchain_data(name, symbol, &uri),
    );

    submit_metadata_instruction(rpc, user, instruction, "Update").await
}

async fn submit_metadata_instruction(
    rpc: &RpcHandle,
    user: &Keypair,
    instruction: Instruction,
    action: &str,
) -> Result<Signature, PublishError> {
    let blockhash = rpc.get_latest_blockhash().await?;

    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&user.pubkey()),
        &[user],
        blockhash,
    );

    let signature = rpc.send_and_confirm(transaction).await.map_err(|e| {
        // Uploads already happened; the documents stay behind unused.
        logger::warning(
            LogTag::Metadata,
            "On-chain metadata step failed; uploaded documents are orphaned",
        );
        e
    })?;

    logger::info(
        LogTag::Metadata,
        &format!(
            "{} metadata account: {}",
            action,
            rpc::explorer_tx_url(&signature.to_string(), rpc.url())
        ),
    );

    Ok(signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpl_token_metadata::ID as METADATA_PROGRAM_ID;

    #[test]
    fn test_metadata_address_is_deterministic() {
        let mint = Pubkey::new_unique();

        let first = find_metadata_address(&mint);
        let second = find_metadata_address(&mint);
        assert_eq!(first, second);

        // Matches the documented PDA seeds of the token-metadata program
        let (expected, _bump) = Pubkey::find_program_address(
            &[
                b"metadata",
                METADATA_PROGRAM_ID.as_ref(),
                mint.as_ref(),
            ],
            &METADATA_PROGRAM_ID,
        );
        assert_eq!(first, expected);
    }

    #[test]
    fn test_different_mints_get_different_addresses() {
        let a = find_metadata_address(&Pubkey::new_unique());
        let b = find_metadata_address(&Pubkey::new_unique());
        assert_ne!(a, b);
    }

    #[test]
    fn test_onchain_data_has_no_royalties() {
        let data = onchain_data("mintfu", "MTF", "https://arweave.net/abc");
        assert_eq!(data.seller_fee_basis_points, 0);
        assert!(data.creators.is_none());
        assert!(data.collection.is_none());
        assert!(data.uses.is_none());
    }

    #[test]
    fn test_create_instruction_shape() {
        let mint = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let metadata_address = find_metadata_address(&mint);

        let ix = build_create_instruction(
            &mint,
            &metadata_address,
            &authority,
            onchain_data("mintfu", "MTF", "uri"),
        );

        assert_eq!(ix.program_id, METADATA_PROGRAM_ID);
        assert_eq!(ix.accounts[0].pubkey, metadata_address);
        // The payer / mint authority / update authority must sign
        assert!(ix
            .accounts
            .iter()
            .any(|meta| meta.pubkey == authority && meta.is_signer));
    }

    #[test]
    fn test_update_instruction_marks_authority_as_signer() {
        let mint = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let metadata_address = find_metadata_address(&mint);

        let ix = build_update_instruction(
            &metadata_address,
            &authority,
            onchain_data("mintfu", "MTF", "uri"),
        );

        assert_eq!(ix.program_id, METADATA_PROGRAM_ID);
        assert!(ix
            .accounts
            .iter()
            .any(|meta| meta.pubkey == authority && meta.is_signer));
    }

    #[test]
    fn test_offchain_document_shape() {
        let document = OffChainMetadata {
            name: "mintfu".to_string(),
            symbol: "MTF".to_string(),
            description: "ninja house party".to_string(),
            image: "https://arweave.net/abc".to_string(),
        };

        let value = serde_json::to_value(&document).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["description", "image", "name", "symbol"]);
    }
}
