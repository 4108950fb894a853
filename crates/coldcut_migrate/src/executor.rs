//! Per-item migration.
//!
//! Each cold item goes through the same steps: compute its destination,
//! reuse an existing blob or download and upload it, point every
//! referencing object at the blob URL, then optionally delete the
//! original. Failures before the blob exists fail the item; later
//! failures are counted and the item stays migrated.

use crate::MigrationProfile;
use coldcut_content::{ContentStore, Download};
use coldcut_core::{MediaItem, ObjectRef, filename_from_url};
use coldcut_error::{ColdcutResult, MigrationError, MigrationErrorKind};
use coldcut_storage::{BlobObject, BlobStore, content_type_for};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const OCTET_STREAM: &str = "application/octet-stream";

/// Fixed pauses after downloads and uploads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Throttle {
    download: Duration,
    upload: Duration,
}

impl Throttle {
    /// Pause `download` after each download and `upload` after each upload.
    pub fn new(download: Duration, upload: Duration) -> Self {
        Self { download, upload }
    }

    /// No pauses.
    pub fn none() -> Self {
        Self::default()
    }

    async fn after_download(&self) {
        if !self.download.is_zero() {
            tokio::time::sleep(self.download).await;
        }
    }

    async fn after_upload(&self) {
        if !self.upload.is_zero() {
            tokio::time::sleep(self.upload).await;
        }
    }
}

/// What happened to the original media record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    /// Deletion disabled for this run
    Skipped,
    /// Original removed from the content store
    Deleted,
    /// Original kept; needs manual cleanup
    Failed(String),
}

/// Result of migrating one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    /// Media id
    pub media_id: String,
    /// Blob path
    pub pathname: String,
    /// Public blob URL written into references
    pub url: String,
    /// The blob already existed
    pub reused: bool,
    /// Bytes uploaded for this item
    pub bytes_uploaded: u64,
    /// References pointed at the blob
    pub objects_updated: usize,
    /// References that could not be updated
    pub reference_failures: usize,
    /// Fate of the original
    pub deletion: Deletion,
}

/// Runs the per-item steps against both stores.
pub struct Executor<'a> {
    content: &'a dyn ContentStore,
    blobs: &'a dyn BlobStore,
    profile: &'a MigrationProfile,
    throttle: Throttle,
    delete_originals: bool,
}

impl<'a> Executor<'a> {
    /// Executor with no pauses and deletion disabled.
    pub fn new(
        content: &'a dyn ContentStore,
        blobs: &'a dyn BlobStore,
        profile: &'a MigrationProfile,
    ) -> Self {
        Self {
            content,
            blobs,
            profile,
            throttle: Throttle::none(),
            delete_originals: false,
        }
    }

    /// Set the pauses between network calls.
    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Delete originals after a successful migration.
    pub fn with_deletion(mut self, delete_originals: bool) -> Self {
        self.delete_originals = delete_originals;
        self
    }

    /// Migrate one media item and repoint its references.
    ///
    /// # Errors
    ///
    /// Fails when the blob neither exists nor can be downloaded and
    /// uploaded. Reference and deletion failures are reported in the
    /// outcome instead.
    #[instrument(skip_all, fields(media = %item.id(), references = references.len()))]
    pub async fn migrate(
        &self,
        item: &MediaItem,
        references: &[ObjectRef],
    ) -> ColdcutResult<ItemOutcome> {
        let pathname = self.profile.destination_path(item);

        let (blob, reused, bytes_uploaded) = match self.blobs.head(&pathname).await? {
            Some(existing) => {
                debug!(pathname = %pathname, "Blob exists, reusing");
                (existing, true, 0)
            }
            None => {
                let download = self.download(item).await?;
                let content_type = detect_content_type(item, &download);
                let bytes = download.len() as u64;
                let blob = self
                    .blobs
                    .put(&pathname, &download.data, &content_type)
                    .await?;
                self.throttle.after_upload().await;
                debug!(pathname = %pathname, bytes, content_type = %content_type, "Uploaded");
                (blob, false, bytes)
            }
        };

        let (objects_updated, reference_failures) =
            self.rewrite_references(references, blob.url()).await;

        let deletion = if !self.delete_originals {
            Deletion::Skipped
        } else if reference_failures > 0 {
            warn!(
                reference_failures,
                "Keeping original, some references still point at it"
            );
            Deletion::Failed(format!(
                "{} reference(s) were not rewritten",
                reference_failures
            ))
        } else {
            match self.content.delete_media(item.id()).await {
                Ok(()) => Deletion::Deleted,
                Err(e) => {
                    warn!(error = %e, "Failed to delete original, flagged for cleanup");
                    Deletion::Failed(e.to_string())
                }
            }
        };

        Ok(ItemOutcome {
            media_id: item.id().clone(),
            pathname,
            url: blob.url().to_string(),
            reused,
            bytes_uploaded,
            objects_updated,
            reference_failures,
            deletion,
        })
    }

    /// Delete an original whose blob copy is confirmed to exist.
    ///
    /// # Errors
    ///
    /// Returns `MigrationErrorKind::NotMigrated` when the blob is missing,
    /// or the store's error when the delete call fails.
    #[instrument(skip_all, fields(media = %item.id()))]
    pub async fn delete_verified(&self, item: &MediaItem) -> ColdcutResult<BlobObject> {
        let pathname = self.profile.destination_path(item);
        let Some(blob) = self.blobs.head(&pathname).await? else {
            return Err(MigrationError::new(MigrationErrorKind::NotMigrated {
                id: item.id().clone(),
                path: pathname,
            })
            .into());
        };

        self.content.delete_media(item.id()).await?;
        debug!(pathname = %pathname, "Deleted original");
        Ok(blob)
    }

    async fn download(&self, item: &MediaItem) -> ColdcutResult<Download> {
        let mut last_error = None;

        for url in item.source_urls() {
            match self.content.download(url).await {
                Ok(download) => {
                    self.throttle.after_download().await;
                    debug!(url, bytes = download.len(), "Downloaded");
                    return Ok(download);
                }
                Err(e) => {
                    debug!(url, error = %e, "Download failed, trying next source");
                    last_error = Some(e.to_string());
                }
            }
        }

        let kind = match last_error {
            Some(message) => MigrationErrorKind::Unreachable {
                id: item.id().clone(),
                message,
            },
            None => MigrationErrorKind::NoSourceUrl(item.id().clone()),
        };
        Err(MigrationError::new(kind).into())
    }

    async fn rewrite_references(&self, references: &[ObjectRef], url: &str) -> (usize, usize) {
        let mut updated = 0;
        let mut failed = 0;

        for object in references {
            let field = self.profile.external_url_field(&object.field);
            match self.content.update_metadata(&object.id, &field, url).await {
                Ok(()) => updated += 1,
                Err(e) => {
                    failed += 1;
                    warn!(
                        object = %object.id,
                        field = %field,
                        slug = %object.slug,
                        error = %e,
                        "Failed to update reference"
                    );
                }
            }
        }

        if updated > 0 {
            info!(updated, failed, "Repointed references");
        }
        (updated, failed)
    }
}

/// Whether every reference already points at one of the blob hosts.
///
/// Each reference is judged by the external-URL field paired with the
/// image field it was found in. Items without references are never
/// considered migrated by URL.
///
/// # Examples
///
/// ```
/// use coldcut_core::ObjectRef;
/// use coldcut_migrate::already_migrated_by_url;
///
/// let episode = ObjectRef {
///     id: "ep-1".into(),
///     slug: "late-night".into(),
///     title: "Late Night".into(),
///     object_type: "episodes".into(),
///     field: "image".into(),
///     external_url: Some("https://abc.public.blob.vercel-storage.com/episodes/a.jpg".into()),
/// };
/// let hosts = vec!["public.blob.vercel-storage.com".to_string()];
///
/// assert!(already_migrated_by_url(&[episode], &hosts));
/// assert!(!already_migrated_by_url(&[], &hosts));
/// ```
pub fn already_migrated_by_url(references: &[ObjectRef], hosts: &[String]) -> bool {
    !references.is_empty()
        && references.iter().all(|object| {
            object
                .external_url
                .as_deref()
                .and_then(url_host)
                .is_some_and(|host| hosts.iter().any(|known| host_matches(host, known)))
        })
}

fn url_host(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit('@').next()?;
    let host = host.split(':').next()?;
    (!host.is_empty()).then_some(host)
}

fn host_matches(host: &str, known: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let known = known.trim().trim_start_matches('.').to_ascii_lowercase();
    !known.is_empty() && (host == known || host.ends_with(&format!(".{}", known)))
}

/// Response header, then the store's MIME type, then the extension table.
fn detect_content_type(item: &MediaItem, download: &Download) -> String {
    let known = |value: &&str| !value.trim().is_empty() && *value != OCTET_STREAM;

    if let Some(declared) = download
        .content_type
        .as_deref()
        .filter(known)
        .or_else(|| item.mime_type().as_deref().filter(known))
    {
        return declared.to_string();
    }

    [
        Some(item.display_name().as_str()),
        filename_from_url(&download.url),
    ]
    .into_iter()
    .flatten()
    .map(content_type_for)
    .find(|guess| *guess != OCTET_STREAM)
    .unwrap_or(OCTET_STREAM)
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_host() {
        assert_eq!(
            url_host("https://user@cdn.example.com:8443/a.jpg?x=1"),
            Some("cdn.example.com")
        );
        assert_eq!(url_host("cdn.example.com/a.jpg"), None);
        assert_eq!(url_host("https:///a.jpg"), None);
    }

    #[test]
    fn test_host_matches_subdomains_only() {
        assert!(host_matches("abc.blob.example.com", "blob.example.com"));
        assert!(host_matches("BLOB.example.com", "blob.example.com"));
        assert!(!host_matches("evilblob.example.com", "blob.example.com"));
        assert!(!host_matches("blob.example.com", ""));
    }
}
