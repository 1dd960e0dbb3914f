//! Token-program operations: mint creation, holding-account provisioning,
//! supply minting and transfers.
//!
//! Amounts cross this module boundary as whole tokens; each operation
//! reads the mint's decimal precision from chain and scales exactly
//! before building its instruction.

use crate::amount::{format_units, to_base_units};
use crate::errors::PublishError;
use crate::logger::{self, LogTag};
use crate::rpc::{self, RpcHandle};
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::system_instruction;
use solana_sdk::transaction::Transaction;
use spl_associated_token_account::get_associated_token_address;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use spl_token::state::Mint;

/// Create a new fungible-asset mint.
///
/// Allocates the rent-exempt mint account and initializes it in a single
/// transaction signed by the payer and the fresh mint keypair.
pub async fn create_mint(
    rpc: &RpcHandle,
    payer: &Keypair,
    mint_authority: &Pubkey,
    freeze_authority: &Pubkey,
    decimals: u8,
) -> Result<Pubkey, PublishError> {
    let mint_keypair = Keypair::new();
    let mint_pubkey = mint_keypair.pubkey();

    let rent = rpc.minimum_balance_for_rent_exemption(Mint::LEN).await?;

    let create_account_ix = system_instruction::create_account(
        &payer.pubkey(),
        &mint_pubkey,
        rent,
        Mint::LEN as u64,
        &spl_token::id(),
    );

    let initialize_mint_ix = spl_token::instruction::initialize_mint(
        &spl_token::id(),
        &mint_pubkey,
        mint_authority,
        Some(freeze_authority),
        decimals,
    )
    .map_err(|e| PublishError::Token(format!("Failed to build initialize_mint: {}", e)))?;

    let blockhash = rpc.get_latest_blockhash().await?;
    let transaction = Transaction::new_signed_with_payer(
        &[create_account_ix, initialize_mint_ix],
        Some(&payer.pubkey()),
        &[payer, &mint_keypair],
        blockhash,
    );

    rpc.send_and_confirm(transaction).await?;

    logger::info(
        LogTag::Token,
        &format!("The token mint account address is {}", mint_pubkey),
    );
    logger::info(
        LogTag::Token,
        &format!(
            "Token Mint: {}",
            rpc::explorer_address_url(&mint_pubkey.to_string(), rpc.url())
        ),
    );

    Ok(mint_pubkey)
}

/// Canonical holding-account address for a (mint, owner) pair
pub fn holding_account_address(mint: &Pubkey, owner: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

/// Look up or create the associated holding account for `owner`.
///
/// Idempotent: when the account already exists its address is returned
/// without touching the chain; creation itself uses the idempotent
/// instruction variant, so a confirmation race is also harmless.
pub async fn get_or_create_holding_account(
    rpc: &RpcHandle,
    payer: &Keypair,
    mint: &Pubkey,
    owner: &Pubkey,
) -> Result<Pubkey, PublishError> {
    let address = holding_account_address(mint, owner);

    if rpc.account_exists(&address).await? {
        logger::debug(
            LogTag::Token,
            &format!("Holding account {} already provisioned", address),
        );
        return Ok(address);
    }

    let instruction = create_associated_token_account_idempotent(
        &payer.pubkey(),
        owner,
        mint,
        &spl_token::id(),
    );

    let blockhash = rpc.get_latest_blockhash().await?;
    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&payer.pubkey()),
        &[payer],
        blockhash,
    );

    rpc.send_and_confirm(transaction).await?;

    logger::info(
        LogTag::Token,
        &format!(
            "Token Account: {}",
            rpc::explorer_address_url(&address.to_string(), rpc.url())
        ),
    );

    Ok(address)
}

/// Read a mint's decimal precision from chain
pub async fn fetch_mint_decimals(rpc: &RpcHandle, mint: &Pubkey) -> Result<u8, PublishError> {
    let account = rpc.get_account(mint).await?;

    let mint_state = Mint::unpack(&account.data)
        .map_err(|e| PublishError::Token(format!("Failed to decode mint {}: {}", mint, e)))?;

    Ok(mint_state.decimals)
}

/// Mint `amount` whole tokens to a holding account.
///
/// `authority` must be the mint authority; the program rejects anyone
/// else. Payer and authority are usually the same keypair here.
pub async fn mint_supply(
    rpc: &RpcHandle,
    payer: &Keypair,
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Keypair,
    amount: u64,
) -> Result<Signature, PublishError> {
    let decimals = fetch_mint_decimals(rpc, mint).await?;
    let base_units = to_base_units(amount, decimals)?;

    let instruction = spl_token::instruction::mint_to(
        &spl_token::id(),
        mint,
        destination,
        &authority.pubkey(),
        &[],
        base_units,
    )
    .map_err(|e| PublishError::Token(format!("Failed to build mint_to: {}", e)))?;

    let blockhash = rpc.get_latest_blockhash().await?;
    let signers = dedup_signers(payer, authority);
    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&payer.pubkey()),
        &signers,
        blockhash,
    );

    let signature = rpc.send_and_confirm(transaction).await?;

    logger::info(
        LogTag::Token,
        &format!(
            "Minted {} tokens ({} base units) to {}",
            amount, base_units, destination
        ),
    );
    logger::info(
        LogTag::Token,
        &format!(
            "Mint Token Transaction: {}",
            rpc::explorer_tx_url(&signature.to_string(), rpc.url())
        ),
    );

    Ok(signature)
}

/// Transfer `amount` whole tokens between two holding accounts of `mint`.
pub async fn transfer_tokens(
    rpc: &RpcHandle,
    payer: &Keypair,
    source: &Pubkey,
    destination: &Pubkey,
    owner: &Keypair,
    amount: u64,
    mint: &Pubkey,
) -> Result<Signature, PublishError> {
    let decimals = fetch_mint_decimals(rpc, mint).await?;
    let base_units = to_base_units(amount, decimals)?;

    let instruction = spl_token::instruction::transfer_checked(
        &spl_token::id(),
        source,
        mint,
        destination,
        &owner.pubkey(),
        &[],
        base_units,
        decimals,
    )
    .map_err(|e| PublishError::Token(format!("Failed to build transfer: {}", e)))?;

    let blockhash = rpc.get_latest_blockhash().await?;
    let signers = dedup_signers(payer, owner);
    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&payer.pubkey()),
        &signers,
        blockhash,
    );

    let signature = rpc.send_and_confirm(transaction).await?;

    logger::info(
        LogTag::Token,
        &format!(
            "Transferred {} ({} base units) from {} to {}",
            format_units(base_units, decimals),
            base_units,
            source,
            destination
        ),
    );
    logger::info(
        LogTag::Token,
        &format!(
            "Transfer Transaction: {}",
            rpc::explorer_tx_url(&signature.to_string(), rpc.url())
        ),
    );

    Ok(signature)
}

/// Read a holding account's balance in base units
pub async fn fetch_holding_balance(
    rpc: &RpcHandle,
    holding_account: &Pubkey,
) -> Result<u64, PublishError> {
    let account = rpc.get_account(holding_account).await?;

    let token_account = spl_token::state::Account::unpack(&account.data).map_err(|e| {
        PublishError::Token(format!(
            "Failed to decode token account {}: {}",
            holding_account, e
        ))
    })?;

    Ok(token_account.amount)
}

/// The payer often is the second signer; signing twice with the same
/// keypair makes the SDK reject the transaction.
fn dedup_signers<'a>(payer: &'a Keypair, other: &'a Keypair) -> Vec<&'a Keypair> {
    if payer.pubkey() == other.pubkey() {
        vec![payer]
    } else {
        vec![payer, other]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spl_token::instruction::TokenInstruction;

    #[test]
    fn test_holding_account_address_is_idempotent() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let first = holding_account_address(&mint, &owner);
        let second = holding_account_address(&mint, &owner);
        assert_eq!(first, second);
    }

    #[test]
    fn test_holding_account_address_varies_by_owner_and_mint() {
        let mint = Pubkey::new_unique();
        let owner_a = Pubkey::new_unique();
        let owner_b = Pubkey::new_unique();

        assert_ne!(
            holding_account_address(&mint, &owner_a),
            holding_account_address(&mint, &owner_b)
        );
        assert_ne!(
            holding_account_address(&mint, &owner_a),
            holding_account_address(&Pubkey::new_unique(), &owner_a)
        );
    }

    #[test]
    fn test_mint_to_instruction_carries_exact_base_units() {
        let mint = Pubkey::new_unique();
        let destination = Pubkey::new_unique();
        let authority = Pubkey::new_unique();

        let base_units = to_base_units(100, 2).unwrap();
        let ix = spl_token::instruction::mint_to(
            &spl_token::id(),
            &mint,
            &destination,
            &authority,
            &[],
            base_units,
        )
        .unwrap();

        assert_eq!(ix.program_id, spl_token::id());
        assert!(ix
            .accounts
            .iter()
            .any(|meta| meta.pubkey == authority && meta.is_signer));

        match TokenInstruction::unpack(&ix.data).unwrap() {
            TokenInstruction::MintTo { amount } => assert_eq!(amount, 10_000),
            other => panic!("unexpected instruction: {:?}", other),
        }
    }

    #[test]
    fn test_transfer_instruction_carries_exact_base_units() {
        let mint = Pubkey::new_unique();
        let source = Pubkey::new_unique();
        let destination = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let base_units = to_base_units(50, 2).unwrap();
        let ix = spl_token::instruction::transfer_checked(
            &spl_token::id(),
            &source,
            &mint,
            &destination,
            &owner,
            &[],
            base_units,
            2,
        )
        .unwrap();

        match TokenInstruction::unpack(&ix.data).unwrap() {
            TokenInstruction::TransferChecked { amount, decimals } => {
                assert_eq!(amount, 5_000);
                assert_eq!(decimals, 2);
            }
            other => panic!("unexpected instruction: {:?}", other),
        }
    }

    #[test]
    fn test_dedup_signers() {
        let payer = Keypair::new();
        let other = Keypair::new();

        assert_eq!(dedup_signers(&payer, &payer).len(), 1);
        assert_eq!(dedup_signers(&payer, &other).len(), 2);
    }
}
