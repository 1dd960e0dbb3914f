//! Remote storage client for off-chain assets
//!
//! Uploads the token image and the JSON metadata document to a
//! bundlr-style gateway. The gateway answers with a transaction id; the
//! permanent public URI is that id resolved through the Arweave gateway,
//! which is what ends up in the on-chain metadata record.
//!
//! Uploads share one fixed timeout from config; a slow gateway surfaces
//! as an error and aborts the whole run.

use crate::errors::PublishError;
use crate::logger::{self, LogTag};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

const ARWEAVE_GATEWAY: &str = "https://arweave.net";

pub struct StorageClient {
    client: Client,
    gateway_url: String,
    timeout_secs: u64,
}

impl StorageClient {
    pub fn new(gateway_url: &str, timeout_secs: u64) -> Result<Self, PublishError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PublishError::Storage(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    fn upload_url(&self) -> String {
        format!("{}/upload", self.gateway_url)
    }

    /// Public URI for an uploaded item
    fn uri_for_id(id: &str) -> String {
        format!("{}/{}", ARWEAVE_GATEWAY, id)
    }

    /// Upload raw bytes, returning the permanent URI
    pub async fn upload_bytes(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, PublishError> {
        logger::debug(
            LogTag::Storage,
            &format!("Uploading {} bytes ({})", bytes.len(), content_type),
        );

        let response = self
            .client
            .post(self.upload_url())
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Storage(format!(
                "Gateway returned HTTP {}: {}",
                status, body
            )));
        }

        let reply: Value = response
            .json()
            .await
            .map_err(|e| PublishError::Storage(format!("Malformed gateway response: {}", e)))?;

        let id = reply["id"]
            .as_str()
            .ok_or_else(|| PublishError::Storage("Gateway response missing id".to_string()))?;

        Ok(Self::uri_for_id(id))
    }

    /// Upload a JSON document, returning the permanent URI
    pub async fn upload_json<T: Serialize>(&self, document: &T) -> Result<String, PublishError> {
        let bytes = serde_json::to_vec(document)?;
        self.upload_bytes(bytes, "application/json").await
    }

    fn map_request_error(&self, err: reqwest::Error) -> PublishError {
        if err.is_timeout() {
            PublishError::StorageTimeout {
                seconds: self.timeout_secs,
            }
        } else {
            PublishError::Storage(format!("Upload request failed: {}", err))
        }
    }
}

/// Content type for an asset file, from its extension
pub fn content_type_for(path: &str) -> &'static str {
    match Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_url_strips_trailing_slash() {
        let client = StorageClient::new("https://devnet.bundlr.network/", 60).unwrap();
        assert_eq!(client.upload_url(), "https://devnet.bundlr.network/upload");
    }

    #[test]
    fn test_uri_for_id() {
        assert_eq!(
            StorageClient::uri_for_id("abc123"),
            "https://arweave.net/abc123"
        );
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("assets/mintfu.png"), "image/png");
        assert_eq!(content_type_for("photo.JPG"), "image/jpeg");
        assert_eq!(content_type_for("anim.gif"), "image/gif");
        assert_eq!(content_type_for("mystery"), "application/octet-stream");
    }
}
