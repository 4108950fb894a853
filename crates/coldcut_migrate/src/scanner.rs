//! Reference scanning.
//!
//! Walks every object of the profile's content types and records which
//! candidate media each object points at. Read-only.

use crate::{MediaLookup, MigrationProfile};
use coldcut_content::ContentStore;
use coldcut_core::{ContentObject, MediaItem, PageRequest, ReferenceIndex};
use coldcut_error::{ColdcutError, ColdcutErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Counters collected while scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Objects read, per content type
    pub objects_scanned: BTreeMap<String, usize>,
    /// Content types the store does not know
    pub missing_types: Vec<String>,
    /// Page failures that stopped a content type, as `type: error`
    pub page_errors: Vec<String>,
    /// Media items with at least one reference
    pub referenced_media: usize,
    /// Total (media, object) reference pairs
    pub references: usize,
}

impl ScanStats {
    /// Objects read across all content types.
    pub fn total_objects(&self) -> usize {
        self.objects_scanned.values().sum()
    }
}

/// Result of a reference scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Media id to referencing objects
    pub index: ReferenceIndex,
    /// Scan counters
    pub stats: ScanStats,
}

/// Build the reference index for `candidates`.
///
/// A content type the store does not know counts as zero objects; a 404
/// past the first page just ends that type's listing. A page failure stops
/// that content type and the scan moves on to the next one.
#[instrument(skip_all, fields(profile = %profile.name(), candidates = candidates.len()))]
pub async fn scan_references(
    store: &dyn ContentStore,
    candidates: &[MediaItem],
    profile: &MigrationProfile,
    page_size: usize,
) -> ScanOutcome {
    let lookup = MediaLookup::new(candidates);
    let mut outcome = ScanOutcome::default();

    if lookup.is_empty() {
        debug!("No candidates; skipping scan");
        return outcome;
    }

    for object_type in profile.object_types() {
        let scanned =
            scan_type(store, object_type, &lookup, profile, page_size, &mut outcome).await;
        outcome
            .stats
            .objects_scanned
            .insert(object_type.clone(), scanned);
    }

    outcome.stats.referenced_media = outcome.index.referenced_media();
    outcome.stats.references = outcome.index.total_references();
    info!(
        objects = outcome.stats.total_objects(),
        referenced_media = outcome.stats.referenced_media,
        references = outcome.stats.references,
        "Reference scan complete"
    );
    outcome
}

async fn scan_type(
    store: &dyn ContentStore,
    object_type: &str,
    lookup: &MediaLookup<'_>,
    profile: &MigrationProfile,
    page_size: usize,
    outcome: &mut ScanOutcome,
) -> usize {
    let mut request = PageRequest::first(page_size.max(1));
    let mut scanned = 0;

    loop {
        let page = match store.list_objects(object_type, request).await {
            Ok(page) => page,
            Err(e) if is_not_found(&e) && request.skip == 0 => {
                warn!(object_type, "Content type not found, treating as empty");
                outcome.stats.missing_types.push(object_type.to_string());
                break;
            }
            Err(e) if is_not_found(&e) => {
                debug!(object_type, skip = request.skip, "Page not found, end of listing");
                break;
            }
            Err(e) => {
                warn!(
                    object_type,
                    skip = request.skip,
                    error = %e,
                    "Object page failed, skipping rest of type"
                );
                outcome
                    .stats
                    .page_errors
                    .push(format!("{}: {}", object_type, e));
                break;
            }
        };

        scanned += page.items.len();
        for object in &page.items {
            record_object(object, lookup, profile, &mut outcome.index);
        }

        if !page.has_more(&request) {
            break;
        }
        request = request.next();
    }

    debug!(object_type, scanned, "Scanned content type");
    scanned
}

fn record_object(
    object: &ContentObject,
    lookup: &MediaLookup<'_>,
    profile: &MigrationProfile,
    index: &mut ReferenceIndex,
) {
    for image_ref in object.image_refs(profile.image_fields()) {
        let Some((media, strategy)) = lookup.resolve(image_ref.candidates().as_slice()) else {
            continue;
        };

        let mut object_ref = object.to_ref(image_ref.field());
        object_ref.external_url = object
            .metadata_str(&profile.external_url_field(image_ref.field()))
            .map(str::to_string);

        if index.insert(media.id(), object_ref) {
            debug!(
                object = %object.id(),
                media = %media.id(),
                field = %image_ref.field(),
                strategy = strategy.as_ref(),
                "Resolved reference"
            );
        }
    }
}

fn is_not_found(err: &ColdcutError) -> bool {
    matches!(err.kind(), ColdcutErrorKind::Content(e) if e.is_not_found())
}

