use std::sync::Arc;

use alloy::network::Ethereum;
use alloy::primitives::{Address, TxHash};
use alloy::providers::{PendingTransactionBuilder, Provider};

use cqm::{token, ChainConfig, CqmError, MetaTransferArgs, RelayFields};

use crate::metrics;

/// Server-side half of the pay-back flow: turns relay fields into a signed
/// `metaTransfer` transaction paid for by the relayer's key.
pub struct MetaTransferRelayer<P> {
    provider: P,
    relayer_address: Address,
    config: ChainConfig,
    watch_receipts: bool,
}

impl<P> MetaTransferRelayer<P> {
    /// `provider` must sign with the key behind `relayer_address`.
    pub fn new(provider: P, relayer_address: Address, config: ChainConfig) -> Self {
        Self {
            provider,
            relayer_address,
            config,
            watch_receipts: true,
        }
    }

    /// Whether to follow each submission to its receipt after responding.
    pub fn with_receipt_watch(mut self, watch: bool) -> Self {
        self.watch_receipts = watch;
        self
    }

    pub fn relayer_address(&self) -> Address {
        self.relayer_address
    }

    pub fn chain_config(&self) -> &ChainConfig {
        &self.config
    }
}

impl<P> MetaTransferRelayer<P>
where
    P: Provider + Send + Sync,
{
    /// Check RPC connectivity by fetching the latest block number.
    pub async fn health_check(&self) -> Result<u64, CqmError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| CqmError::ChainError(format!("health check failed: {e}")))
    }

    /// Look up the owner, fetch the relayer's pending nonce and send
    /// `metaTransfer(from, owner, amount, deadline, v, r, s)`.
    pub async fn submit(
        &self,
        args: &MetaTransferArgs,
    ) -> Result<PendingTransactionBuilder<Ethereum>, CqmError> {
        let owner = token::owner(&self.provider, self.config.contract).await?;

        let tx_nonce = self
            .provider
            .get_transaction_count(self.relayer_address)
            .pending()
            .await
            .map_err(|e| CqmError::ChainError(format!("relayer nonce lookup failed: {e}")))?;

        tracing::info!(
            from = %args.from,
            %owner,
            amount = %args.amount,
            deadline = %args.deadline,
            tx_nonce,
            "submitting metaTransfer"
        );

        token::meta_transfer(&self.provider, self.config.contract, owner, args, tx_nonce).await
    }

    /// Type the fields, submit, and optionally wait for the receipt.
    pub async fn relay(&self, fields: &RelayFields) -> Result<TxHash, CqmError> {
        let args = MetaTransferArgs::try_from(fields).inspect_err(|_| {
            metrics::SUBMISSIONS.with_label_values(&["unusable"]).inc();
        })?;

        let start = std::time::Instant::now();
        let pending = match self.submit(&args).await {
            Ok(pending) => pending,
            Err(e) => {
                metrics::SUBMIT_LATENCY
                    .with_label_values(&["failed"])
                    .observe(start.elapsed().as_secs_f64());
                metrics::SUBMISSIONS.with_label_values(&["failed"]).inc();
                return Err(e);
            }
        };
        metrics::SUBMIT_LATENCY
            .with_label_values(&["submitted"])
            .observe(start.elapsed().as_secs_f64());
        metrics::SUBMISSIONS.with_label_values(&["submitted"]).inc();

        let tx_hash = *pending.tx_hash();
        tracing::info!(from = %args.from, tx = %tx_hash, "metaTransfer submitted");

        if self.watch_receipts {
            match token::wait_for_receipt(pending, "metaTransfer").await {
                Ok(receipt) if receipt.status() => {
                    metrics::SUBMISSIONS.with_label_values(&["mined"]).inc();
                    tracing::info!(tx = %tx_hash, "metaTransfer mined");
                }
                Ok(_) => {
                    metrics::SUBMISSIONS.with_label_values(&["reverted"]).inc();
                    return Err(CqmError::ChainError(format!(
                        "metaTransfer {tx_hash} reverted"
                    )));
                }
                Err(e) => {
                    // Timed out or the node stopped answering; outcome unknown.
                    metrics::SUBMISSIONS.with_label_values(&["unconfirmed"]).inc();
                    return Err(e);
                }
            }
        }

        Ok(tx_hash)
    }
}

/// Relay in the background. The HTTP response does not wait for this; the
/// outcome only reaches logs and metrics.
pub fn spawn_relay<P>(relayer: Arc<MetaTransferRelayer<P>>, fields: RelayFields)
where
    P: Provider + Send + Sync + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = relayer.relay(&fields).await {
            tracing::error!(error = %e, from = %fields.from, "relay failed");
        }
    });
}
