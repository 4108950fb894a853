//! Content store trait definition.

use coldcut_core::{ContentObject, MediaItem, Page, PageRequest};
use coldcut_error::ColdcutResult;

/// A downloaded binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// URL the bytes came from
    pub url: String,
    /// Response body
    pub data: Vec<u8>,
    /// Content type reported by the server
    pub content_type: Option<String>,
}

impl Download {
    /// Size of the body in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True for an empty body.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Read/write access to the content platform.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// One page of media records, newest first.
    async fn list_media(&self, page: PageRequest) -> ColdcutResult<Page<MediaItem>>;

    /// One page of objects of a given type.
    ///
    /// # Errors
    ///
    /// A type with no objects (or that does not exist) yields a
    /// `ContentErrorKind::NotFound` error.
    async fn list_objects(
        &self,
        object_type: &str,
        page: PageRequest,
    ) -> ColdcutResult<Page<ContentObject>>;

    /// Set a single metadata field on an object, leaving other fields alone.
    async fn update_metadata(&self, object_id: &str, field: &str, value: &str)
    -> ColdcutResult<()>;

    /// Remove a media record.
    async fn delete_media(&self, media_id: &str) -> ColdcutResult<()>;

    /// Fetch the binary behind a media URL.
    async fn download(&self, url: &str) -> ColdcutResult<Download>;
}
