//! EIP-712 typed data for CQM transfer authorizations.
//!
//! Provides functions for:
//! - Building the token's signing domain ([`token_domain`])
//! - Building the full typed-data payload a wallet signs ([`transfer_typed_data`])
//! - Computing signing hashes ([`signing_hash`])
//! - Recovering the signer of a split signature ([`recover_signer`])
//! - Computing authorization deadlines ([`deadline_after`])

use std::borrow::Cow;

use alloy::dyn_abi::TypedData;
use alloy::primitives::{Address, Signature, B256, U256};
use alloy::sol_types::{Eip712Domain, SolStruct};

use crate::constants::AUTHORIZATION_TTL_SECS;
use crate::signature::SplitSignature;
use crate::{ChainConfig, CqmError, Transfer};

/// Build the EIP-712 domain the token contract verifies against.
pub fn token_domain(config: &ChainConfig) -> Eip712Domain {
    Eip712Domain {
        name: Some(Cow::Owned(config.eip712_domain_name.clone())),
        version: Some(Cow::Owned(config.eip712_domain_version.clone())),
        chain_id: Some(U256::from(config.chain_id)),
        verifying_contract: Some(config.contract),
        salt: None,
    }
}

/// Deadline for an authorization built at `block_timestamp`.
pub fn deadline_after(block_timestamp: u64) -> u64 {
    block_timestamp.saturating_add(AUTHORIZATION_TTL_SECS)
}

/// Full typed-data payload for a transfer authorization: `EIP712Domain` and
/// `Transfer` types, `primaryType`, domain and message. This is the object
/// handed to `eth_signTypedData_v4`.
pub fn transfer_typed_data(auth: &Transfer, config: &ChainConfig) -> TypedData {
    TypedData::from_struct(auth, Some(token_domain(config)))
}

/// Compute the EIP-712 signing hash of a transfer authorization.
pub fn signing_hash(auth: &Transfer, config: &ChainConfig) -> B256 {
    auth.eip712_signing_hash(&token_domain(config))
}

/// Recover the address that signed `auth`.
pub fn recover_signer(
    auth: &Transfer,
    signature: &SplitSignature,
    config: &ChainConfig,
) -> Result<Address, CqmError> {
    let sig = signature.to_signature()?;
    let hash = signing_hash(auth, config);
    sig.recover_address_from_prehash(&hash)
        .map_err(|e| CqmError::SignatureError(format!("recovery failed: {e}")))
}

/// Encode a Signature to a hex string with 0x prefix (65 bytes -> 0x + 130 hex).
/// Uses Electrum notation: v = 27 or 28 in the last byte.
pub fn encode_signature_hex(sig: &Signature) -> String {
    format!("0x{}", alloy::hex::encode(sig.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::signers::local::PrivateKeySigner;
    use alloy::signers::SignerSync;

    use crate::signature::split_signature;

    fn sample_auth(from: Address) -> Transfer {
        Transfer {
            from,
            to: Address::repeat_byte(0x42),
            amount: U256::from(5u64) * U256::from(10u64).pow(U256::from(18u64)),
            nonce: U256::from(3u64),
            deadline: U256::from(deadline_after(1_700_000_000)),
        }
    }

    #[test]
    fn deadline_is_one_day_after_block() {
        assert_eq!(deadline_after(1_700_000_000), 1_700_086_400);
        assert_eq!(deadline_after(0), 86_400);
    }

    #[test]
    fn deadline_saturates_on_huge_timestamp() {
        assert_eq!(deadline_after(u64::MAX - 10), u64::MAX);
    }

    #[test]
    fn domain_uses_chain_config() {
        let config = ChainConfig::default();
        let domain = token_domain(&config);
        assert_eq!(domain.name.as_deref(), Some("CQMToken"));
        assert_eq!(domain.version.as_deref(), Some("1"));
        assert_eq!(domain.chain_id, Some(U256::from(10200u64)));
        assert_eq!(domain.verifying_contract, Some(crate::CONTRACT_ADDRESS));
    }

    #[test]
    fn transfer_type_string_has_ordered_fields() {
        assert_eq!(
            Transfer::eip712_encode_type(),
            "Transfer(address from,address to,uint256 amount,uint256 nonce,uint256 deadline)"
        );
    }

    #[test]
    fn typed_data_hash_matches_static_hash() {
        let config = ChainConfig::default();
        let auth = sample_auth(Address::repeat_byte(0x01));
        let typed = transfer_typed_data(&auth, &config);
        assert_eq!(typed.primary_type, "Transfer");
        assert_eq!(
            typed.eip712_signing_hash().unwrap(),
            signing_hash(&auth, &config)
        );
    }

    #[test]
    fn sign_split_and_recover() {
        let signer = PrivateKeySigner::random();
        let config = ChainConfig::default();
        let auth = sample_auth(signer.address());

        let sig = signer
            .sign_hash_sync(&signing_hash(&auth, &config))
            .unwrap();
        let split = split_signature(&encode_signature_hex(&sig)).unwrap();

        assert_eq!(recover_signer(&auth, &split, &config).unwrap(), signer.address());
    }

    #[test]
    fn recovery_depends_on_domain() {
        let signer = PrivateKeySigner::random();
        let config = ChainConfig::default();
        let auth = sample_auth(signer.address());
        let sig = signer
            .sign_hash_sync(&signing_hash(&auth, &config))
            .unwrap();
        let split = split_signature(&encode_signature_hex(&sig)).unwrap();

        let other_chain = ChainConfig {
            chain_id: 100,
            ..ChainConfig::default()
        };
        let recovered = recover_signer(&auth, &split, &other_chain).unwrap();
        assert_ne!(recovered, signer.address());
    }
}
