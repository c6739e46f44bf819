#![doc = "REST publisher: persists derived documents through the CMS's auto-generated collection endpoints."]
//
//! # REST client (CLI <-> CMS)
//!
//! Implements the core [`Publisher`] trait against `POST {base_url}/{collection}`
//! with bearer-token authentication. The request body is
//! `{"data": {...document fields, publishedAt}}`.
//!
//! - Non-2xx responses become [`PublishError::Api`] carrying the status and the
//!   response body (parsed JSON when possible, raw text otherwise).
//! - Connection and body-read failures become [`PublishError::Transport`].
//! - No retries and no timeout beyond reqwest's defaults.

use async_trait::async_trait;
use curiolife_seed_core::contract::{PublishedDocument, Publisher};
use curiolife_seed_core::document::{ContentKind, Document};
use curiolife_seed_core::error::PublishError;
use serde_json::{json, Value};

pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl RestClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        tracing::info!(
            base_url,
            token = %mask_token(token),
            "Initialized REST client"
        );
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub fn endpoint(&self, kind: ContentKind) -> String {
        format!("{}/{}", self.base_url, kind.collection())
    }
}

/// First few characters of a token followed by an ellipsis, for logs.
pub fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}...")
}

#[async_trait]
impl Publisher for RestClient {
    async fn publish(&self, document: &Document) -> Result<PublishedDocument, PublishError> {
        let endpoint = self.endpoint(document.kind);
        tracing::debug!(endpoint = %endpoint, label = %document.label, "POST document");

        let body = json!({ "data": document.fields });
        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, endpoint = %endpoint, "Request failed");
                PublishError::Transport {
                    endpoint: endpoint.clone(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| PublishError::Transport {
            endpoint: endpoint.clone(),
            message: e.to_string(),
        })?;
        let parsed: Value = serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text));

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), endpoint = %endpoint, body = %parsed, "API error");
            return Err(PublishError::Api {
                status: status.as_u16(),
                body: parsed,
            });
        }

        let published = parsed
            .get("data")
            .cloned()
            .and_then(|data| serde_json::from_value::<PublishedDocument>(data).ok())
            .unwrap_or_default();
        tracing::info!(
            endpoint = %endpoint,
            id = ?published.id,
            document_id = ?published.document_id,
            "Document created"
        );
        Ok(published)
    }
}
