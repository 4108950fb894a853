//! Full media listing with retry.
//!
//! Fetching the media collection is the one read the pipeline cannot do
//! without, so each page is retried with exponential backoff before the run
//! gives up.

use crate::ContentStore;
use coldcut_core::{MediaItem, PageRequest};
use coldcut_error::{
    ColdcutError, ColdcutErrorKind, ColdcutResult, RetryableError, StorageErrorKind,
};
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{info, instrument, warn};

/// Backoff settings for retried reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RetryPolicy {
    /// Base delay of the exponential backoff
    pub initial_backoff_ms: u64,
    /// Upper bound for a single delay
    pub max_delay: Duration,
    /// Retries after the first attempt
    pub max_retries: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_backoff_ms: 1000,
            max_delay: Duration::from_secs(30),
            max_retries: 4,
        }
    }
}

impl RetryPolicy {
    fn strategy(self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(self.initial_backoff_ms)
            .factor(2)
            .max_delay(self.max_delay)
            .map(jitter)
            .take(self.max_retries)
    }
}

/// Whether an error is worth retrying.
pub fn is_transient(err: &ColdcutError) -> bool {
    match err.kind() {
        ColdcutErrorKind::Content(e) => e.is_retryable(),
        ColdcutErrorKind::Storage(e) => match &e.kind {
            StorageErrorKind::Transport(_) => true,
            StorageErrorKind::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        },
        _ => false,
    }
}

/// Fetch every media record, newest first, page by page.
///
/// # Errors
///
/// Returns the last error once a page has exhausted its retries, or
/// immediately for errors that are not transient.
#[instrument(skip(store, policy))]
pub async fn fetch_all_media(
    store: &dyn ContentStore,
    page_size: usize,
    policy: &RetryPolicy,
) -> ColdcutResult<Vec<MediaItem>> {
    let mut request = PageRequest::first(page_size.max(1));
    let mut items = Vec::new();

    loop {
        let page = Retry::spawn(policy.strategy(), || async move {
            match store.list_media(request).await {
                Ok(page) => Ok(page),
                Err(e) if is_transient(&e) => {
                    warn!(skip = request.skip, error = %e, "Media page failed, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => Err(RetryError::Permanent(e)),
            }
        })
        .await?;

        let has_more = page.has_more(&request);
        items.extend(page.items);
        info!(fetched = items.len(), total = ?page.total, "Fetched media");

        if !has_more {
            break;
        }
        request = request.next();
    }

    Ok(items)
}
