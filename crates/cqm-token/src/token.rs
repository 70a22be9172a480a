use alloy::eips::BlockNumberOrTag;
use alloy::network::Ethereum;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{PendingTransactionBuilder, Provider};
use alloy::rpc::types::TransactionReceipt;

use crate::relay::MetaTransferArgs;
use crate::{CqmError, CQMToken};

/// Receipt wait bound.
pub const RECEIPT_TIMEOUT_SECS: u64 = 60;

/// Query the token balance of `account`.
pub async fn balance_of<P: Provider>(
    provider: &P,
    token: Address,
    account: Address,
) -> Result<U256, CqmError> {
    let contract = CQMToken::new(token, provider);
    let balance = contract
        .balanceOf(account)
        .call()
        .await
        .map_err(|e| CqmError::ChainError(format!("balanceOf failed: {e}")))?;
    Ok(balance)
}

/// Query the token's total supply.
pub async fn total_supply<P: Provider>(provider: &P, token: Address) -> Result<U256, CqmError> {
    let contract = CQMToken::new(token, provider);
    let supply = contract
        .totalSupply()
        .call()
        .await
        .map_err(|e| CqmError::ChainError(format!("totalSupply failed: {e}")))?;
    Ok(supply)
}

/// Query the meta-transfer nonce the contract expects from `owner` next.
pub async fn nonces<P: Provider>(
    provider: &P,
    token: Address,
    owner: Address,
) -> Result<U256, CqmError> {
    let contract = CQMToken::new(token, provider);
    let nonce = contract
        .nonces(owner)
        .call()
        .await
        .map_err(|e| CqmError::ChainError(format!("nonces failed: {e}")))?;
    Ok(nonce)
}

/// Query the contract owner, the recipient of every pay-back.
pub async fn owner<P: Provider>(provider: &P, token: Address) -> Result<Address, CqmError> {
    let contract = CQMToken::new(token, provider);
    let owner = contract
        .owner()
        .call()
        .await
        .map_err(|e| CqmError::ChainError(format!("owner failed: {e}")))?;
    Ok(owner)
}

/// Timestamp of the latest block.
pub async fn latest_block_timestamp<P: Provider>(provider: &P) -> Result<u64, CqmError> {
    let block = provider
        .get_block_by_number(BlockNumberOrTag::Latest)
        .await
        .map_err(|e| CqmError::ChainError(format!("failed to fetch latest block: {e}")))?
        .ok_or_else(|| CqmError::ChainError("failed to fetch the latest block".to_string()))?;
    Ok(block.header.timestamp)
}

/// Submit `metaTransfer(from, to, amount, deadline, v, r, s)` with an explicit
/// sender nonce. Returns as soon as the node accepts the transaction; the
/// caller decides whether to wait for the receipt.
pub async fn meta_transfer<P: Provider>(
    provider: &P,
    token: Address,
    to: Address,
    args: &MetaTransferArgs,
    tx_nonce: u64,
) -> Result<PendingTransactionBuilder<Ethereum>, CqmError> {
    let contract = CQMToken::new(token, provider);
    contract
        .metaTransfer(
            args.from,
            to,
            args.amount,
            args.deadline,
            args.v,
            args.r,
            args.s,
        )
        .nonce(tx_nonce)
        .send()
        .await
        .map_err(|e| CqmError::ChainError(format!("metaTransfer send failed: {e}")))
}

/// Execute `mint(to, amount)` from `sender` and wait for the receipt.
/// Returns the transaction hash.
pub async fn mint<P: Provider>(
    provider: &P,
    token: Address,
    sender: Address,
    to: Address,
    amount: U256,
) -> Result<TxHash, CqmError> {
    let contract = CQMToken::new(token, provider);
    let pending = contract
        .mint(to, amount)
        .from(sender)
        .send()
        .await
        .map_err(|e| CqmError::ChainError(format!("mint send failed: {e}")))?;

    confirm(pending, "mint").await
}

/// Execute `burn(amount)` from `sender` and wait for the receipt.
/// Returns the transaction hash.
pub async fn burn<P: Provider>(
    provider: &P,
    token: Address,
    sender: Address,
    amount: U256,
) -> Result<TxHash, CqmError> {
    let contract = CQMToken::new(token, provider);
    let pending = contract
        .burn(amount)
        .from(sender)
        .send()
        .await
        .map_err(|e| CqmError::ChainError(format!("burn send failed: {e}")))?;

    confirm(pending, "burn").await
}

/// Wait up to [`RECEIPT_TIMEOUT_SECS`] for a receipt. A reverted
/// transaction still returns its receipt.
pub async fn wait_for_receipt(
    pending: PendingTransactionBuilder<Ethereum>,
    label: &str,
) -> Result<TransactionReceipt, CqmError> {
    tokio::time::timeout(
        std::time::Duration::from_secs(RECEIPT_TIMEOUT_SECS),
        pending.get_receipt(),
    )
    .await
    .map_err(|_| {
        CqmError::ChainError(format!(
            "{label} receipt timed out after {RECEIPT_TIMEOUT_SECS}s"
        ))
    })?
    .map_err(|e| CqmError::ChainError(format!("{label} receipt failed: {e}")))
}

/// Wait for a receipt and fail if the transaction reverted.
pub async fn confirm(
    pending: PendingTransactionBuilder<Ethereum>,
    label: &str,
) -> Result<TxHash, CqmError> {
    let receipt = wait_for_receipt(pending, label).await?;

    if !receipt.status() {
        return Err(CqmError::ChainError(format!("{label} reverted")));
    }

    Ok(receipt.transaction_hash)
}
