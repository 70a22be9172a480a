//! Signers that produce EIP-712 signatures over a [`TypedData`] payload.
//!
//! - [`LocalTypedDataSigner`] holds a private key in-process.
//! - [`WalletRpcSigner`] delegates to an external wallet over JSON-RPC
//!   (`eth_requestAccounts` / `eth_signTypedData_v4`); the key never leaves
//!   the wallet.

use alloy::dyn_abi::TypedData;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::eip712::encode_signature_hex;
use crate::CqmError;

/// Anything that can sign EIP-712 typed data on behalf of one account.
pub trait TypedDataSigner: Send + Sync {
    /// Address of the signing account.
    fn get_address(&self) -> impl std::future::Future<Output = Result<Address, CqmError>> + Send;

    /// Sign the payload and return the 65-byte signature as `0x`-prefixed hex.
    fn sign_typed_data(
        &self,
        typed_data: &TypedData,
    ) -> impl std::future::Future<Output = Result<String, CqmError>> + Send;
}

/// Key-backed signer.
pub struct LocalTypedDataSigner {
    inner: PrivateKeySigner,
}

impl LocalTypedDataSigner {
    pub fn new(inner: PrivateKeySigner) -> Self {
        Self { inner }
    }

    /// Parse a hex private key.
    pub fn from_private_key(key: &str) -> Result<Self, CqmError> {
        let inner: PrivateKeySigner = key
            .parse()
            .map_err(|e| CqmError::ConfigError(format!("invalid private key: {e}")))?;
        Ok(Self { inner })
    }

    pub fn address(&self) -> Address {
        self.inner.address()
    }

    pub fn inner(&self) -> &PrivateKeySigner {
        &self.inner
    }
}

impl TypedDataSigner for LocalTypedDataSigner {
    async fn get_address(&self) -> Result<Address, CqmError> {
        Ok(self.inner.address())
    }

    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<String, CqmError> {
        let hash = typed_data
            .eip712_signing_hash()
            .map_err(|e| CqmError::SignatureError(format!("invalid typed data: {e}")))?;
        let sig = self
            .inner
            .sign_hash_sync(&hash)
            .map_err(|e| CqmError::SignatureError(format!("signing failed: {e}")))?;
        Ok(encode_signature_hex(&sig))
    }
}

#[derive(Serialize)]
struct JsonRpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

impl<T> JsonRpcResponse<T> {
    fn into_result(self, method: &str) -> Result<T, CqmError> {
        if let Some(err) = self.error {
            return Err(CqmError::SignatureError(format!(
                "{method} rejected by wallet ({}): {}",
                err.code, err.message
            )));
        }
        self.result
            .ok_or_else(|| CqmError::HttpError(format!("{method}: empty wallet response")))
    }
}

/// Extension-backed signer talking to a wallet's JSON-RPC endpoint.
pub struct WalletRpcSigner {
    http: reqwest::Client,
    url: Url,
    account: Address,
}

impl WalletRpcSigner {
    /// Request the wallet's accounts and bind to the first one.
    ///
    /// Fails with [`CqmError::WalletUnavailable`] when the wallet cannot be
    /// reached or exposes no account.
    pub async fn connect(url: Url) -> Result<Self, CqmError> {
        let http = reqwest::Client::new();
        let accounts: Vec<Address> = rpc_call(&http, &url, "eth_requestAccounts", ())
            .await
            .map_err(|e| CqmError::WalletUnavailable(e.to_string()))?;

        let account = accounts.first().copied().ok_or_else(|| {
            CqmError::WalletUnavailable("wallet exposed no accounts".to_string())
        })?;

        tracing::debug!(%account, wallet = %url, "connected to wallet");
        Ok(Self { http, url, account })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl TypedDataSigner for WalletRpcSigner {
    async fn get_address(&self) -> Result<Address, CqmError> {
        Ok(self.account)
    }

    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<String, CqmError> {
        // eth_signTypedData_v4 takes the payload as a JSON string, not an object.
        let payload = serde_json::to_string(typed_data)?;
        rpc_call(
            &self.http,
            &self.url,
            "eth_signTypedData_v4",
            (self.account, payload),
        )
        .await
    }
}

async fn rpc_call<P, T>(
    http: &reqwest::Client,
    url: &Url,
    method: &str,
    params: P,
) -> Result<T, CqmError>
where
    P: Serialize,
    T: for<'de> Deserialize<'de>,
{
    let request = JsonRpcRequest {
        jsonrpc: "2.0",
        id: 1,
        method,
        params,
    };

    let resp = http
        .post(url.clone())
        .json(&request)
        .send()
        .await
        .map_err(|e| CqmError::HttpError(format!("{method} request failed: {e}")))?;

    let body: JsonRpcResponse<T> = resp
        .json()
        .await
        .map_err(|e| CqmError::HttpError(format!("{method}: invalid wallet response: {e}")))?;

    body.into_result(method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    use crate::eip712::{recover_signer, transfer_typed_data};
    use crate::signature::split_signature;
    use crate::{ChainConfig, Transfer};

    #[tokio::test]
    async fn local_signer_signature_recovers() {
        let signer = LocalTypedDataSigner::new(PrivateKeySigner::random());
        let config = ChainConfig::default();
        let auth = Transfer {
            from: signer.get_address().await.unwrap(),
            to: Address::ZERO,
            amount: U256::from(1000u64),
            nonce: U256::ZERO,
            deadline: U256::from(1_700_086_400u64),
        };

        let sig_hex = signer
            .sign_typed_data(&transfer_typed_data(&auth, &config))
            .await
            .unwrap();
        assert_eq!(sig_hex.len(), 132);

        let split = split_signature(&sig_hex).unwrap();
        assert_eq!(
            recover_signer(&auth, &split, &config).unwrap(),
            signer.address()
        );
    }

    #[test]
    fn rejects_bad_private_key() {
        let err = LocalTypedDataSigner::from_private_key("not-a-key").err().unwrap();
        assert!(matches!(err, CqmError::ConfigError(_)));
    }

    #[test]
    fn request_serializes_as_json_rpc() {
        let req = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "eth_signTypedData_v4",
            params: (Address::ZERO, "{}".to_string()),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "eth_signTypedData_v4");
        assert_eq!(value["params"][1], "{}");
    }

    #[test]
    fn wallet_error_surfaces_code_and_message() {
        let resp: JsonRpcResponse<String> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":4001,"message":"User rejected the request."}}"#,
        )
        .unwrap();
        let err = resp.into_result("eth_signTypedData_v4").unwrap_err();
        assert!(err.to_string().contains("4001"));
        assert!(err.to_string().contains("User rejected"));
    }

    #[test]
    fn wallet_result_is_returned() {
        let resp: JsonRpcResponse<Vec<Address>> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"result":["0x0000000000000000000000000000000000000001"]}"#,
        )
        .unwrap();
        let accounts = resp.into_result("eth_requestAccounts").unwrap();
        assert_eq!(accounts, vec![Address::with_last_byte(1)]);
    }

    #[tokio::test]
    async fn unreachable_wallet_is_unavailable() {
        let err = WalletRpcSigner::connect("http://localhost:1".parse().unwrap())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, CqmError::WalletUnavailable(_)));
    }
}
