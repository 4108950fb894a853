//! Store client construction.

use coldcut_content::{ContentCredentials, ContentStore, HttpContentStore};
use coldcut_error::ColdcutResult;
use coldcut_migrate::{Credentials, Settings};
use coldcut_storage::{BlobStore, FileSystemBlobStore, HttpBlobStore};
use std::sync::Arc;
use tracing::{debug, info};

/// Clients handed to the pipeline.
pub struct Stores {
    /// Content platform client
    pub content: Arc<dyn ContentStore>,
    /// Blob backend; `None` in a dry run without a token
    pub blobs: Option<Arc<dyn BlobStore>>,
}

/// Build the content client and the blob backend.
///
/// A configured `blob_local_dir` takes precedence over the blob API.
///
/// # Errors
///
/// Fails when the local blob directory cannot be created.
pub fn build_stores(settings: &Settings, credentials: Credentials) -> ColdcutResult<Stores> {
    let content = HttpContentStore::with_api_url(
        settings.content_api_url.as_str(),
        ContentCredentials {
            bucket_slug: credentials.bucket_slug,
            read_key: credentials.read_key,
            write_key: credentials.write_key,
        },
    );

    let blobs: Option<Arc<dyn BlobStore>> = match (&settings.blob_local_dir, credentials.blob_token)
    {
        (Some(dir), _) => {
            info!(path = %dir.display(), "Using local blob directory");
            Some(Arc::new(FileSystemBlobStore::new(
                dir.clone(),
                settings.blob_local_url.as_str(),
            )?))
        }
        (None, Some(token)) => Some(Arc::new(HttpBlobStore::with_api_url(
            settings.blob_api_url.as_str(),
            token,
        ))),
        (None, None) => {
            debug!("No blob token; running without a blob store");
            None
        }
    };

    Ok(Stores {
        content: Arc::new(content),
        blobs,
    })
}
