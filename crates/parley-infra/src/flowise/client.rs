//! FlowiseClient -- concrete [`ChatflowProvider`] implementation.
//!
//! Sends prediction requests to `POST /api/v1/prediction/{chatflow_id}` and
//! lists flows from `GET /api/v1/chatflows`, both with bearer-token auth
//! when a key is configured. One outbound call per inbound request: no
//! retries, no backoff.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use parley_core::chatflow::provider::ChatflowProvider;
use parley_types::chatflow::{ChatflowSummary, PredictionInput};
use parley_types::error::ChatflowError;

use super::types::{ChatflowListing, PredictionBody};

/// HTTP client for a Flowise-compatible chatflow engine.
pub struct FlowiseClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl FlowiseClient {
    /// Create a new client for the engine at `base_url`.
    ///
    /// Predictions can run long-lived flows; the request timeout matches
    /// the 60-second ceiling the engine itself enforces.
    pub fn new(base_url: impl Into<String>, api_key: Option<SecretString>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to create reqwest client");

        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token when one is configured.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key.expose_secret()),
            None => request,
        }
    }

    /// Map a non-2xx response into [`ChatflowError::Http`].
    async fn error_from_response(response: reqwest::Response) -> ChatflowError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        ChatflowError::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body,
        }
    }
}

// FlowiseClient intentionally does NOT derive Debug; the SecretString field
// keeps the key out of accidental output either way.

impl ChatflowProvider for FlowiseClient {
    fn name(&self) -> &str {
        "flowise"
    }

    async fn predict(
        &self,
        chatflow_id: &str,
        input: &PredictionInput,
    ) -> Result<serde_json::Value, ChatflowError> {
        let body = PredictionBody::from_input(input);
        for upload in &body.uploads {
            if !upload.payload_is_valid_base64() {
                warn!(name = %upload.name, "upload payload is not valid base64");
            }
        }

        let url = self.url(&format!("/api/v1/prediction/{chatflow_id}"));
        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatflowError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ChatflowError::Deserialization(format!("failed to parse reply: {e}")))
    }

    async fn list_chatflows(&self) -> Result<Vec<ChatflowSummary>, ChatflowError> {
        let url = self.url("/api/v1/chatflows");
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ChatflowError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let listings: Vec<ChatflowListing> = response
            .json()
            .await
            .map_err(|e| ChatflowError::Deserialization(format!("failed to parse listing: {e}")))?;

        Ok(listings.into_iter().map(ChatflowListing::into_summary).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_client() -> FlowiseClient {
        FlowiseClient::new(
            "http://localhost:3000",
            Some(SecretString::from("test-key-not-real")),
        )
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(make_client().name(), "flowise");
    }

    #[test]
    fn test_url_building_strips_trailing_slash() {
        let client = FlowiseClient::new("http://flows.internal/", None);
        assert_eq!(
            client.url("/api/v1/prediction/cf-1"),
            "http://flows.internal/api/v1/prediction/cf-1"
        );
    }

    #[test]
    fn test_prediction_body_carries_session() {
        let sid = Uuid::now_v7();
        let input = PredictionInput::new("hello", sid);
        let body = PredictionBody::from_input(&input);
        assert_eq!(body.override_config.session_id, sid.to_string());
        assert!(body.uploads.is_empty());
    }
}
