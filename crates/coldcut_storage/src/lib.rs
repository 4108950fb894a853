//! Blob storage backends for Coldcut.
//!
//! Cold media is written to path-addressed blob storage. The [`BlobStore`]
//! trait covers the three operations the migration needs: an existence check
//! that also yields the public URL, a write, and the backend name for logs.
//!
//! # Backends
//!
//! - [`HttpBlobStore`]: token-authenticated blob API (list by prefix, PUT by pathname)
//! - [`FileSystemBlobStore`]: local directory served under a public base URL
//!
//! # Example
//!
//! ```rust
//! use coldcut_storage::{BlobStore, FileSystemBlobStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileSystemBlobStore::new("/tmp/coldcut-blobs", "http://localhost:8080/blobs")?;
//!
//! let blob = store.put("cold-storage/media/a1/cover.jpg", b"...", "image/jpeg").await?;
//! assert!(store.head(blob.pathname()).await?.is_some());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod blob;
mod content_type;
mod filesystem;
mod http;

pub use blob::{BlobObject, BlobStore};
pub use coldcut_error::{StorageError, StorageErrorKind};
pub use content_type::content_type_for;
pub use filesystem::FileSystemBlobStore;
pub use http::{DEFAULT_BLOB_API_URL, HttpBlobStore};
