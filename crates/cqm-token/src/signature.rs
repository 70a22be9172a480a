//! Splitting 65-byte ECDSA signatures into the `(v, r, s)` triple that
//! `metaTransfer` takes as separate arguments.

use alloy::primitives::{Signature, B256, U256};
use serde::{Deserialize, Serialize};

use crate::CqmError;

/// Hex length of a 65-byte signature without the `0x` prefix.
pub const SIGNATURE_HEX_LEN: usize = 130;

/// A signature decomposed into its components, with `v` in Electrum
/// notation (27 or 28).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSignature {
    pub r: B256,
    pub s: B256,
    pub v: u8,
}

/// Split a hex signature (`0x` prefix optional) into `r`, `s` and `v`.
///
/// Wallets that emit a raw recovery id of 0/1 get it normalized to 27/28.
pub fn split_signature(signature: &str) -> Result<SplitSignature, CqmError> {
    let hex = signature.strip_prefix("0x").unwrap_or(signature);
    if hex.len() != SIGNATURE_HEX_LEN {
        return Err(CqmError::SignatureError(format!(
            "invalid signature length: expected {SIGNATURE_HEX_LEN} hex characters, got {}",
            hex.len()
        )));
    }

    let bytes = alloy::hex::decode(hex)
        .map_err(|e| CqmError::SignatureError(format!("invalid signature hex: {e}")))?;

    let r = B256::from_slice(&bytes[0..32]);
    let s = B256::from_slice(&bytes[32..64]);
    let mut v = bytes[64];
    if v < 27 {
        v += 27;
    }

    Ok(SplitSignature { r, s, v })
}

impl SplitSignature {
    /// Concatenate back into `r || s || v`.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out[64] = self.v;
        out
    }

    /// `0x`-prefixed hex of [`to_bytes`](Self::to_bytes).
    pub fn to_hex(&self) -> String {
        format!("0x{}", alloy::hex::encode(self.to_bytes()))
    }

    /// Convert into an alloy [`Signature`] for address recovery.
    pub fn to_signature(&self) -> Result<Signature, CqmError> {
        let parity = match self.v {
            27 => false,
            28 => true,
            other => {
                return Err(CqmError::SignatureError(format!(
                    "unsupported recovery id {other} (expected 27 or 28)"
                )))
            }
        };
        Ok(Signature::new(
            U256::from_be_bytes(self.r.0),
            U256::from_be_bytes(self.s.0),
            parity,
        ))
    }
}
