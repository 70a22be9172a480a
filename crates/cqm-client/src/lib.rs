//! Clients for the CQM token.
//!
//! - [`PayBackClient`] — holder side: balance, sign a pay-back authorization,
//!   hand it to the relayer
//! - [`AdminClient`] — operator side: total supply, mint, burn
//! - [`ConnectedWallet`] — key-backed or external wallet behind both
//!
//! # Quick Example
//!
//! ```no_run
//! use alloy::providers::ProviderBuilder;
//! use cqm::units::to_base_units;
//! use cqm_client::{ChainConfig, ConnectedWallet, PayBackClient, RelayClient};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = ChainConfig::default();
//! let wallet = ConnectedWallet::connect(Some("0xYOUR_KEY"), None).await.unwrap();
//! let provider = ProviderBuilder::new().connect_http(config.rpc_url.parse().unwrap());
//! let relay = RelayClient::new(cqm::BACKEND_URL.parse().unwrap());
//!
//! let client = PayBackClient::new(wallet, provider, relay, config);
//! let ack = client
//!     .pay_back(to_base_units(alloy::primitives::U256::from(10u64)).unwrap())
//!     .await
//!     .unwrap();
//! assert!(ack.is_ok());
//! # }
//! ```

mod admin;
mod payback;
mod relay_client;
mod wallet;

pub use admin::AdminClient;
pub use payback::{build_authorization, PayBackClient};
pub use relay_client::RelayClient;
pub use wallet::ConnectedWallet;

// Re-export commonly needed types from core
pub use cqm::{
    ChainConfig, CqmError, RelayPayload, RelayResponse, TypedDataSigner, BACKEND_URL,
    CONTRACT_ADDRESS, RPC_URL,
};
