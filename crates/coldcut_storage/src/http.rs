//! Token-authenticated blob API client.
//!
//! The API lists blobs by prefix (`GET {api}?prefix=..&limit=..`) and writes
//! them by pathname (`PUT {api}/{pathname}`), returning the public URL.

use crate::{BlobObject, BlobStore};
use coldcut_error::{ColdcutResult, StorageError, StorageErrorKind};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Default endpoint of the blob API.
pub const DEFAULT_BLOB_API_URL: &str = "https://blob.vercel-storage.com";

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    blobs: Vec<ListedBlob>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListedBlob {
    url: String,
    pathname: String,
    #[serde(default)]
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PutResponse {
    url: String,
    pathname: String,
    #[serde(default)]
    content_type: Option<String>,
}

/// Blob API client.
#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    client: Client,
    api_url: String,
    token: String,
}

impl HttpBlobStore {
    /// Creates a client for the default blob API endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_url(DEFAULT_BLOB_API_URL, token)
    }

    /// Creates a client for a specific endpoint.
    #[instrument(skip_all)]
    pub fn with_api_url(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    async fn check(response: reqwest::Response) -> ColdcutResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(StorageError::new(StorageErrorKind::Api { status, message }).into())
    }
}

#[async_trait::async_trait]
impl BlobStore for HttpBlobStore {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    #[instrument(skip(self))]
    async fn head(&self, pathname: &str) -> ColdcutResult<Option<BlobObject>> {
        debug!(api_url = %self.api_url, "Listing blobs by prefix");

        let response = self
            .client
            .get(&self.api_url)
            .bearer_auth(&self.token)
            .query(&[("prefix", pathname), ("limit", "10")])
            .send()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::Transport(e.to_string())))?;

        let listing: ListResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::Transport(format!(
                    "Failed to parse list response: {}",
                    e
                )))
            })?;

        // Prefix listing can return siblings such as "a.jpg.bak"; only an exact pathname counts
        Ok(listing
            .blobs
            .into_iter()
            .find(|blob| blob.pathname == pathname)
            .map(|blob| BlobObject {
                pathname: blob.pathname,
                url: blob.url,
                size_bytes: blob.size,
                content_type: None,
            }))
    }

    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn put(
        &self,
        pathname: &str,
        data: &[u8],
        content_type: &str,
    ) -> ColdcutResult<BlobObject> {
        let url = format!("{}/{}", self.api_url, pathname);
        debug!(url = %url, "Uploading blob");

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .header("x-content-type", content_type)
            .header("x-add-random-suffix", "0")
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::Transport(e.to_string())))?;

        let stored: PutResponse = Self::check(response).await?.json().await.map_err(|e| {
            StorageError::new(StorageErrorKind::Transport(format!(
                "Failed to parse upload response: {}",
                e
            )))
        })?;

        tracing::info!(pathname = %stored.pathname, url = %stored.url, "Uploaded blob");

        Ok(BlobObject {
            pathname: stored.pathname,
            url: stored.url,
            size_bytes: Some(data.len() as u64),
            content_type: stored.content_type.or_else(|| Some(content_type.to_string())),
        })
    }
}
