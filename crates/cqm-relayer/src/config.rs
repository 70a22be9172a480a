use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use cqm::ChainConfig;
use std::env;
use url::Url;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_RATE_LIMIT_RPM: u64 = 60;

/// Relayer configuration, loaded once at startup and read-only afterwards.
#[derive(Clone)]
pub struct RelayerConfig {
    /// Key that signs and pays for `metaTransfer` transactions
    pub signer: PrivateKeySigner,
    /// Address of `signer`
    pub relayer_address: Address,
    /// Contract, RPC endpoint and signing domain
    pub chain: ChainConfig,
    /// Interface to bind
    pub bind_addr: String,
    /// Server port
    pub port: u16,
    /// Rate limit requests per minute per IP
    pub rate_limit_rpm: u64,
    /// Bearer token required for /metrics (None = see `public_metrics`)
    pub metrics_token: Option<String>,
    /// Serve /metrics without a token
    pub public_metrics: bool,
    /// Follow each submitted transaction to its receipt and log the outcome
    pub watch_receipts: bool,
}

impl std::fmt::Debug for RelayerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayerConfig")
            .field("signer", &"[REDACTED]")
            .field("relayer_address", &self.relayer_address)
            .field("chain", &self.chain)
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .field("rate_limit_rpm", &self.rate_limit_rpm)
            .field(
                "metrics_token",
                &self.metrics_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("public_metrics", &self.public_metrics)
            .field("watch_receipts", &self.watch_receipts)
            .finish()
    }
}

impl RelayerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        // Required: relayer key
        let key = var("SIGNER_PRIVATE_KEY").ok_or(ConfigError::MissingRequired("SIGNER_PRIVATE_KEY"))?;
        let signer: PrivateKeySigner = key
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidKey("SIGNER_PRIVATE_KEY"))?;
        let relayer_address = signer.address();

        // Optional: declared address, must agree with the key
        if let Some(declared) = var("SIGNER_ADDRESS") {
            let declared: Address = declared
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidAddress(declared.clone()))?;
            if declared != relayer_address {
                return Err(ConfigError::AddressMismatch {
                    declared,
                    derived: relayer_address,
                });
            }
        }

        let mut chain = ChainConfig::default();

        if let Some(rpc_url) = var("RPC_URL") {
            Url::parse(&rpc_url).map_err(|_| ConfigError::InvalidUrl(rpc_url.clone()))?;
            chain.rpc_url = rpc_url;
        }

        if let Some(chain_id) = var("CHAIN_ID") {
            chain.chain_id = parse_number("CHAIN_ID", &chain_id)?;
        }

        if let Some(contract) = var("CONTRACT_ADDRESS") {
            chain.contract = contract
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidAddress(contract.clone()))?;
        }

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let port = match var("PORT") {
            Some(p) => parse_number("PORT", &p)?,
            None => DEFAULT_PORT,
        };

        let rate_limit_rpm = match var("RATE_LIMIT_RPM") {
            Some(r) => parse_number("RATE_LIMIT_RPM", &r)?,
            None => DEFAULT_RATE_LIMIT_RPM,
        };

        let metrics_token = var("METRICS_TOKEN");
        let public_metrics = var("CQM_PUBLIC_METRICS").is_some_and(|v| is_truthy(&v));
        let watch_receipts = var("RELAY_WATCH_RECEIPTS").map_or(true, |v| is_truthy(&v));

        if metrics_token.is_none() && public_metrics {
            tracing::warn!("METRICS_TOKEN not set and CQM_PUBLIC_METRICS=true; /metrics is public");
        }

        Ok(Self {
            signer,
            relayer_address,
            chain,
            bind_addr,
            port,
            rate_limit_rpm,
            metrics_token,
            public_metrics,
            watch_receipts,
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("{0} is not a valid private key")]
    InvalidKey(&'static str),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("SIGNER_ADDRESS {declared} does not match the key's address {derived}")]
    AddressMismatch { declared: Address, derived: Address },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid value for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // Hardhat account #0, publicly known.
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn load(vars: &[(&str, &str)]) -> Result<RelayerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RelayerConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn key_is_required() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired("SIGNER_PRIVATE_KEY")));

        let err = load(&[("SIGNER_PRIVATE_KEY", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(_)));
    }

    #[test]
    fn defaults_follow_chiado() {
        let config = load(&[("SIGNER_PRIVATE_KEY", TEST_KEY)]).unwrap();
        assert_eq!(config.relayer_address, TEST_ADDRESS.parse::<Address>().unwrap());
        assert_eq!(config.chain, ChainConfig::default());
        assert_eq!(config.port, 8000);
        assert_eq!(config.rate_limit_rpm, 60);
        assert!(config.watch_receipts);
        assert!(!config.public_metrics);
    }

    #[test]
    fn matching_signer_address_is_accepted() {
        let config = load(&[
            ("SIGNER_PRIVATE_KEY", TEST_KEY),
            ("SIGNER_ADDRESS", "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"),
        ])
        .unwrap();
        assert_eq!(config.relayer_address, TEST_ADDRESS.parse::<Address>().unwrap());
    }

    #[test]
    fn mismatched_signer_address_is_rejected() {
        let err = load(&[
            ("SIGNER_PRIVATE_KEY", TEST_KEY),
            ("SIGNER_ADDRESS", "0x0000000000000000000000000000000000000001"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::AddressMismatch { .. }));
    }

    #[test]
    fn overrides_are_validated() {
        let config = load(&[
            ("SIGNER_PRIVATE_KEY", TEST_KEY),
            ("RPC_URL", "http://localhost:8545"),
            ("CHAIN_ID", "31337"),
            ("PORT", "9000"),
            ("RELAY_WATCH_RECEIPTS", "false"),
        ])
        .unwrap();
        assert_eq!(config.chain.rpc_url, "http://localhost:8545");
        assert_eq!(config.chain.chain_id, 31337);
        assert_eq!(config.port, 9000);
        assert!(!config.watch_receipts);

        assert!(matches!(
            load(&[("SIGNER_PRIVATE_KEY", TEST_KEY), ("RPC_URL", "not a url")]).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
        assert!(matches!(
            load(&[("SIGNER_PRIVATE_KEY", TEST_KEY), ("PORT", "eighty")]).unwrap_err(),
            ConfigError::InvalidNumber { name: "PORT", .. }
        ));
        assert!(matches!(
            load(&[("SIGNER_PRIVATE_KEY", "0x1234")]).unwrap_err(),
            ConfigError::InvalidKey(_)
        ));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = load(&[
            ("SIGNER_PRIVATE_KEY", TEST_KEY),
            ("METRICS_TOKEN", "sekrit"),
        ])
        .unwrap();
        let shown = format!("{config:?}");
        assert!(!shown.contains("ac0974bec39a17e3"));
        assert!(!shown.contains("sekrit"));
    }
}
