//! Filesystem-based blob storage implementation.
//!
//! Blobs are written under a base directory using their pathname verbatim,
//! and exposed under a public base URL (for example a static file server or
//! a mounted bucket).

use crate::{BlobObject, BlobStore};
use coldcut_error::{ColdcutResult, StorageError, StorageErrorKind};
use std::path::{Component, Path, PathBuf};

/// Filesystem blob backend.
///
/// # Example Structure
///
/// ```text
/// /var/coldcut/blobs/
/// └── cold-storage/
///     └── media/
///         ├── 65a1f0/
///         │   └── night-shift.jpg
///         └── 65a1f1/
///             └── morning-show.png
/// ```
///
/// # Features
///
/// - **Atomic writes**: Uses temp file + rename for atomicity
/// - **Path confinement**: Pathnames that escape the base directory are rejected
#[derive(Debug, Clone)]
pub struct FileSystemBlobStore {
    base_path: PathBuf,
    public_base_url: String,
}

impl FileSystemBlobStore {
    /// Create a new filesystem blob backend.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Arguments
    ///
    /// * `base_path` - Root directory for blobs
    /// * `public_base_url` - URL prefix under which the root directory is served
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path, public_base_url))]
    pub fn new(
        base_path: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> ColdcutResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created filesystem blob store");
        Ok(Self {
            base_path,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a pathname to a file inside the base directory.
    fn resolve(&self, pathname: &str) -> ColdcutResult<PathBuf> {
        let relative = Path::new(pathname);
        let confined = !pathname.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));

        if !confined {
            return Err(
                StorageError::new(StorageErrorKind::InvalidPath(pathname.to_string())).into(),
            );
        }

        Ok(self.base_path.join(relative))
    }

    fn public_url(&self, pathname: &str) -> String {
        format!("{}/{}", self.public_base_url, pathname)
    }
}

#[async_trait::async_trait]
impl BlobStore for FileSystemBlobStore {
    fn backend_name(&self) -> &'static str {
        "filesystem"
    }

    #[tracing::instrument(skip(self))]
    async fn head(&self, pathname: &str) -> ColdcutResult<Option<BlobObject>> {
        let path = self.resolve(pathname)?;

        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(Some(BlobObject {
                pathname: pathname.to_string(),
                url: self.public_url(pathname),
                size_bytes: Some(metadata.len()),
                content_type: Some(crate::content_type_for(pathname).to_string()),
            })),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    async fn put(
        &self,
        pathname: &str,
        data: &[u8],
        content_type: &str,
    ) -> ColdcutResult<BlobObject> {
        let path = self.resolve(pathname)?;

        // Create parent directories
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("coldcut-tmp");
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(
            pathname,
            path = %path.display(),
            size = data.len(),
            content_type,
            "Stored blob"
        );

        Ok(BlobObject {
            pathname: pathname.to_string(),
            url: self.public_url(pathname),
            size_bytes: Some(data.len() as u64),
            content_type: Some(content_type.to_string()),
        })
    }
}
