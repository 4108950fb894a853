//! In-memory blob store.

use async_trait::async_trait;
use coldcut_core::MediaItem;
use coldcut_error::ColdcutResult;
use coldcut_migrate::MigrationProfile;
use coldcut_storage::{BlobObject, BlobStore};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Public host of the mock store.
pub const BLOB_HOST: &str = "abc123.public.blob.vercel-storage.com";

/// Blob store keeping objects in a map.
#[derive(Default)]
pub struct MockBlobStore {
    blobs: Mutex<BTreeMap<String, (Vec<u8>, String)>>,
    heads: Mutex<usize>,
    puts: Mutex<usize>,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the destination of every item under `profile`.
    pub fn with_migrated(self, profile: &MigrationProfile, items: &[MediaItem]) -> Self {
        {
            let mut blobs = self.blobs.lock().unwrap();
            for item in items {
                blobs.insert(
                    profile.destination_path(item),
                    (b"existing".to_vec(), "image/jpeg".to_string()),
                );
            }
        }
        self
    }

    pub fn url_for(pathname: &str) -> String {
        format!("https://{}/{}", BLOB_HOST, pathname)
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn heads(&self) -> usize {
        *self.heads.lock().unwrap()
    }

    pub fn puts(&self) -> usize {
        *self.puts.lock().unwrap()
    }

    pub fn content_type(&self, pathname: &str) -> Option<String> {
        self.blobs
            .lock()
            .unwrap()
            .get(pathname)
            .map(|(_, content_type)| content_type.clone())
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    fn backend_name(&self) -> &'static str {
        "mock"
    }

    async fn head(&self, pathname: &str) -> ColdcutResult<Option<BlobObject>> {
        *self.heads.lock().unwrap() += 1;
        Ok(self
            .blobs
            .lock()
            .unwrap()
            .get(pathname)
            .map(|(data, content_type)| BlobObject {
                pathname: pathname.to_string(),
                url: Self::url_for(pathname),
                size_bytes: Some(data.len() as u64),
                content_type: Some(content_type.clone()),
            }))
    }

    async fn put(
        &self,
        pathname: &str,
        data: &[u8],
        content_type: &str,
    ) -> ColdcutResult<BlobObject> {
        *self.puts.lock().unwrap() += 1;
        self.blobs.lock().unwrap().insert(
            pathname.to_string(),
            (data.to_vec(), content_type.to_string()),
        );
        Ok(BlobObject {
            pathname: pathname.to_string(),
            url: Self::url_for(pathname),
            size_bytes: Some(data.len() as u64),
            content_type: Some(content_type.to_string()),
        })
    }
}
