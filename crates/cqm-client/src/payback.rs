use alloy::primitives::{Address, U256};
use alloy::providers::Provider;

use cqm::eip712::{deadline_after, transfer_typed_data};
use cqm::signature::split_signature;
use cqm::{token, ChainConfig, CqmError, RelayPayload, RelayResponse, Transfer, TypedDataSigner};

use crate::relay_client::RelayClient;

/// Wallet-facing client: reads the holder's balance and pays tokens back to
/// the contract owner through the relayer.
///
/// Chain reads go through `provider` (read-only). Signing goes through
/// `signer`, which keeps custody of the key.
pub struct PayBackClient<S, P> {
    signer: S,
    provider: P,
    relay: RelayClient,
    config: ChainConfig,
}

impl<S, P> PayBackClient<S, P>
where
    S: TypedDataSigner,
    P: Provider,
{
    pub fn new(signer: S, provider: P, relay: RelayClient, config: ChainConfig) -> Self {
        Self {
            signer,
            provider,
            relay,
            config,
        }
    }

    /// Token balance of the connected account, in base units.
    pub async fn balance(&self) -> Result<U256, CqmError> {
        let account = self.signer.get_address().await?;
        token::balance_of(&self.provider, self.config.contract, account).await
    }

    /// Build and sign a pay-back authorization for `amount` base units.
    pub async fn authorize(&self, amount: U256) -> Result<RelayPayload, CqmError> {
        let from = self.signer.get_address().await?;
        let owner = token::owner(&self.provider, self.config.contract).await?;
        let nonce = token::nonces(&self.provider, self.config.contract, from).await?;
        let block_timestamp = token::latest_block_timestamp(&self.provider).await?;

        let auth = build_authorization(from, owner, amount, nonce, block_timestamp);
        tracing::debug!(
            %from,
            %owner,
            %nonce,
            deadline = %auth.deadline,
            "requesting transfer signature"
        );

        let typed_data = transfer_typed_data(&auth, &self.config);
        let signature = self.signer.sign_typed_data(&typed_data).await?;
        let split = split_signature(&signature)?;

        Ok(RelayPayload::new(from, auth.amount, auth.deadline, split))
    }

    /// Authorize and hand the payload to the relayer.
    pub async fn pay_back(&self, amount: U256) -> Result<RelayResponse, CqmError> {
        let payload = self.authorize(amount).await?;
        tracing::info!(from = %payload.from, amount = %payload.amount, relay = %self.relay.url(), "posting to relayer");
        self.relay.submit(&payload).await
    }
}

/// Authorization paying `amount` from `from` to `owner`, valid for one day
/// after `block_timestamp`.
pub fn build_authorization(
    from: Address,
    owner: Address,
    amount: U256,
    nonce: U256,
    block_timestamp: u64,
) -> Transfer {
    Transfer {
        from,
        to: owner,
        amount,
        nonce,
        deadline: U256::from(deadline_after(block_timestamp)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::providers::ProviderBuilder;
    use alloy::signers::local::PrivateKeySigner;
    use cqm::LocalTypedDataSigner;

    #[test]
    fn authorization_expires_one_day_after_block() {
        let auth = build_authorization(
            Address::with_last_byte(1),
            Address::with_last_byte(2),
            U256::from(10u64),
            U256::from(4u64),
            1_700_000_000,
        );
        assert_eq!(auth.to, Address::with_last_byte(2));
        assert_eq!(auth.nonce, U256::from(4u64));
        assert_eq!(auth.deadline, U256::from(1_700_086_400u64));
    }

    #[tokio::test]
    async fn authorize_surfaces_chain_errors() {
        let provider = ProviderBuilder::new().connect_http("http://localhost:1".parse().unwrap());
        let client = PayBackClient::new(
            LocalTypedDataSigner::new(PrivateKeySigner::random()),
            provider,
            RelayClient::new("http://localhost:1/backend.php".parse().unwrap()),
            ChainConfig::default(),
        );

        let err = client.authorize(U256::from(1u64)).await.unwrap_err();
        assert!(matches!(err, CqmError::ChainError(_)));
    }
}
