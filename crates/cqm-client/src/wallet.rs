use alloy::dyn_abi::TypedData;
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use url::Url;

use cqm::{CqmError, LocalTypedDataSigner, TypedDataSigner, WalletRpcSigner};

/// The wallet a CLI session acts through: either a key held locally or an
/// external wallet reached over JSON-RPC.
pub enum ConnectedWallet {
    Key(LocalTypedDataSigner),
    Extension(WalletRpcSigner),
}

impl ConnectedWallet {
    /// Prefer the external wallet when both are given.
    ///
    /// Fails with [`CqmError::WalletUnavailable`] when neither is configured
    /// or the external wallet cannot be reached.
    pub async fn connect(
        private_key: Option<&str>,
        wallet_rpc: Option<Url>,
    ) -> Result<Self, CqmError> {
        match (wallet_rpc, private_key) {
            (Some(url), _) => Ok(Self::Extension(WalletRpcSigner::connect(url).await?)),
            (None, Some(key)) => Ok(Self::Key(LocalTypedDataSigner::from_private_key(key)?)),
            (None, None) => Err(CqmError::WalletUnavailable(
                "no wallet configured: set WALLET_RPC_URL or PRIVATE_KEY".to_string(),
            )),
        }
    }

    /// Provider that sends transactions as this wallet. Key-backed wallets
    /// sign locally and talk to `rpc_url`; external wallets receive
    /// `eth_sendTransaction` and sign themselves.
    pub fn transacting_provider(&self, rpc_url: Url) -> DynProvider {
        match self {
            Self::Key(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer.inner().clone()))
                .connect_http(rpc_url)
                .erased(),
            Self::Extension(wallet) => ProviderBuilder::new()
                .connect_http(wallet.url().clone())
                .erased(),
        }
    }
}

impl TypedDataSigner for ConnectedWallet {
    async fn get_address(&self) -> Result<Address, CqmError> {
        match self {
            Self::Key(signer) => signer.get_address().await,
            Self::Extension(wallet) => wallet.get_address().await,
        }
    }

    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<String, CqmError> {
        match self {
            Self::Key(signer) => signer.sign_typed_data(typed_data).await,
            Self::Extension(wallet) => wallet.sign_typed_data(typed_data).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_wallet_is_unavailable() {
        let err = ConnectedWallet::connect(None, None).await.err().unwrap();
        assert!(matches!(err, CqmError::WalletUnavailable(_)));
    }

    #[tokio::test]
    async fn key_wallet_reports_its_address() {
        let key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let wallet = ConnectedWallet::connect(Some(key), None).await.unwrap();
        assert_eq!(
            wallet.get_address().await.unwrap(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()
        );
    }
}
