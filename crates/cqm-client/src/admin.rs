use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::Provider;

use cqm::{token, ChainConfig, CqmError};

/// Admin operations, sent as whichever wallet `provider` is connected to.
/// Ownership is the contract's call; nothing is checked locally.
pub struct AdminClient<P> {
    provider: P,
    operator: Address,
    config: ChainConfig,
}

impl<P: Provider> AdminClient<P> {
    pub fn new(provider: P, operator: Address, config: ChainConfig) -> Self {
        Self {
            provider,
            operator,
            config,
        }
    }

    pub fn operator(&self) -> Address {
        self.operator
    }

    pub async fn total_supply(&self) -> Result<U256, CqmError> {
        token::total_supply(&self.provider, self.config.contract).await
    }

    /// Mint `amount` base units to `to` and wait for the receipt.
    pub async fn mint(&self, to: Address, amount: U256) -> Result<TxHash, CqmError> {
        tracing::info!(operator = %self.operator, %to, %amount, "minting");
        token::mint(&self.provider, self.config.contract, self.operator, to, amount).await
    }

    /// Burn `amount` base units from the operator and wait for the receipt.
    pub async fn burn(&self, amount: U256) -> Result<TxHash, CqmError> {
        tracing::info!(operator = %self.operator, %amount, "burning");
        token::burn(&self.provider, self.config.contract, self.operator, amount).await
    }
}
