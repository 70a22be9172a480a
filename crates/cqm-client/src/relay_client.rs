use url::Url;

use cqm::{CqmError, RelayPayload, RelayResponse};

/// Posts signed pay-back payloads to the relayer.
pub struct RelayClient {
    http: reqwest::Client,
    url: Url,
}

impl RelayClient {
    pub fn new(url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// POST the payload. A 2xx means the relayer accepted it, not that the
    /// transfer was mined.
    pub async fn submit(&self, payload: &RelayPayload) -> Result<RelayResponse, CqmError> {
        let resp = self
            .http
            .post(self.url.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| CqmError::HttpError(format!("error posting to relayer: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CqmError::HttpError(format!(
                "relayer rejected the transaction ({status}): {text}"
            )));
        }

        resp.json()
            .await
            .map_err(|e| CqmError::HttpError(format!("failed to parse relayer response: {e}")))
    }
}
