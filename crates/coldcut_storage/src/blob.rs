//! Blob store trait definition.

use coldcut_error::ColdcutResult;
use serde::{Deserialize, Serialize};

/// A stored blob and where the public can fetch it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobObject {
    /// Path of the blob inside the store
    pub pathname: String,
    /// Public URL of the blob
    pub url: String,
    /// Size in bytes, when the backend reports it
    #[serde(default)]
    pub size_bytes: Option<u64>,
    /// Content type, when the backend reports it
    #[serde(default)]
    pub content_type: Option<String>,
}

impl BlobObject {
    /// Path of the blob inside the store.
    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    /// Public URL of the blob.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Trait for pluggable blob storage backends.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Backend name for logs and reports (e.g., "filesystem", "http").
    fn backend_name(&self) -> &'static str;

    /// Look up a blob by pathname.
    ///
    /// # Returns
    ///
    /// `Some(blob)` with its public URL when it exists, `None` otherwise
    async fn head(&self, pathname: &str) -> ColdcutResult<Option<BlobObject>>;

    /// Write a blob at `pathname`, replacing nothing that already exists.
    ///
    /// # Arguments
    ///
    /// * `pathname` - Destination path inside the store
    /// * `data` - The binary data
    /// * `content_type` - MIME type recorded with the blob
    async fn put(
        &self,
        pathname: &str,
        data: &[u8],
        content_type: &str,
    ) -> ColdcutResult<BlobObject>;
}
