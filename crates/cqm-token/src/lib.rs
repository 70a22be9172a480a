//! Gas-less CQM token pay-back using EIP-712 signed transfer authorizations.
//!
//! A token holder signs a [`Transfer`] authorization off-chain. A relayer
//! submits it through the token's `metaTransfer` entry point and pays the gas.
//!
//! # Parties
//!
//! - **Holder** — signs the authorization through a [`TypedDataSigner`]
//! - **Relayer** — validates the relay payload and calls `metaTransfer`
//! - **Admin** — mints and burns directly through a connected wallet
//!
//! # Quick example (signing)
//!
//! ```no_run
//! use alloy::primitives::{Address, U256};
//! use alloy::signers::local::PrivateKeySigner;
//! use cqm::{eip712, signature, ChainConfig, LocalTypedDataSigner, Transfer, TypedDataSigner};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let signer = LocalTypedDataSigner::new(PrivateKeySigner::random());
//! let config = ChainConfig::default();
//! let auth = Transfer {
//!     from: signer.get_address().await.unwrap(),
//!     to: Address::ZERO,
//!     amount: U256::from(1_000u64),
//!     nonce: U256::ZERO,
//!     deadline: U256::from(eip712::deadline_after(1_700_000_000)),
//! };
//! let typed = eip712::transfer_typed_data(&auth, &config);
//! let sig_hex = signer.sign_typed_data(&typed).await.unwrap();
//! let split = signature::split_signature(&sig_hex).unwrap();
//! # }
//! ```

pub mod constants;
pub mod eip712;
pub mod error;
pub mod relay;
pub mod signature;
pub mod signer;
pub mod token;
pub mod units;

use alloy::sol;

// EIP-712 struct for transfer authorizations.
// The sol! macro derives SolStruct which provides eip712_signing_hash().
sol! {
    #[derive(Debug, serde::Serialize, serde::Deserialize)]
    struct Transfer {
        address from;
        address to;
        uint256 amount;
        uint256 nonce;
        uint256 deadline;
    }
}

// CQM token contract surface consumed by the clients and the relayer.
sol! {
    #[sol(rpc)]
    interface CQMToken {
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function nonces(address owner) external view returns (uint256);
        function owner() external view returns (address);
        function mint(address to, uint256 amount) external;
        function burn(uint256 value) external;
        function metaTransfer(
            address from,
            address to,
            uint256 amount,
            uint256 deadline,
            uint8 v,
            bytes32 r,
            bytes32 s
        ) external;
    }
}

// Re-exports
pub use constants::*;
pub use error::CqmError;
pub use relay::{MetaTransferArgs, RelayFields, RelayPayload, RelayResponse};
pub use signature::SplitSignature;
pub use signer::{LocalTypedDataSigner, TypedDataSigner, WalletRpcSigner};
