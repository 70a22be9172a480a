use alloy::primitives::{address, Address};

/// Chiado (Gnosis testnet) chain ID.
pub const CHIADO_CHAIN_ID: u64 = 10200;

/// Deployed CQM token contract on Chiado.
pub const CONTRACT_ADDRESS: Address = address!("F988A1b6d4C00832ed3570a4e50DdA4357a22F7D");

/// Default RPC endpoint for Chiado.
pub const RPC_URL: &str = "https://rpc.chiadochain.net";

/// Default relayer endpoint the wallet-facing client posts to.
pub const BACKEND_URL: &str = "http://localhost:8000/backend.php";

/// EIP-712 domain name the token contract was deployed with.
pub const EIP712_DOMAIN_NAME: &str = "CQMToken";

/// EIP-712 domain version.
pub const EIP712_DOMAIN_VERSION: &str = "1";

/// CQM has 18 decimal places.
pub const TOKEN_DECIMALS: u32 = 18;

/// Validity window of a transfer authorization, counted from the latest block.
pub const AUTHORIZATION_TTL_SECS: u64 = 86_400;

/// Runtime chain configuration shared by the clients and the relayer so both
/// sides agree on the contract, the RPC endpoint and the signing domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub contract: Address,
    pub rpc_url: String,
    pub token_decimals: u32,
    pub eip712_domain_name: String,
    pub eip712_domain_version: String,
}

impl Default for ChainConfig {
    /// Defaults to the Chiado deployment.
    fn default() -> Self {
        Self {
            chain_id: CHIADO_CHAIN_ID,
            contract: CONTRACT_ADDRESS,
            rpc_url: RPC_URL.to_string(),
            token_decimals: TOKEN_DECIMALS,
            eip712_domain_name: EIP712_DOMAIN_NAME.to_string(),
            eip712_domain_version: EIP712_DOMAIN_VERSION.to_string(),
        }
    }
}
