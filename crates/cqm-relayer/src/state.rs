use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::providers::{
    fillers::{
        BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller,
    },
    Identity, ProviderBuilder, RootProvider,
};

use crate::config::{ConfigError, RelayerConfig};
use crate::relayer::MetaTransferRelayer;

/// Concrete provider type from `ProviderBuilder::new().wallet(...).connect_http(...)`.
pub type WalletProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider,
>;

/// Shared application state for the relay server.
pub struct AppState {
    pub relayer: Arc<MetaTransferRelayer<WalletProvider>>,
    /// Bearer token for /metrics.
    pub metrics_token: Option<Vec<u8>>,
    /// Serve /metrics without a token when none is configured.
    pub public_metrics: bool,
}

impl AppState {
    /// Connect the relayer's wallet provider. No RPC request is made here.
    pub fn from_config(config: &RelayerConfig) -> Result<Self, ConfigError> {
        let rpc_url = config
            .chain
            .rpc_url
            .parse()
            .map_err(|_| ConfigError::InvalidUrl(config.chain.rpc_url.clone()))?;

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(config.signer.clone()))
            .connect_http(rpc_url);

        let relayer =
            MetaTransferRelayer::new(provider, config.relayer_address, config.chain.clone())
                .with_receipt_watch(config.watch_receipts);

        Ok(Self {
            relayer: Arc::new(relayer),
            metrics_token: config.metrics_token.clone().map(String::into_bytes),
            public_metrics: config.public_metrics,
        })
    }
}
