//! Final run report.
//!
//! A live run and a dry run produce different outcome types, serialized
//! under a `mode` tag, so "would migrate" counts never share a field with
//! "migrated" counts.

use crate::{Deletion, ItemOutcome, ScanStats};
use chrono::{DateTime, Utc};
use coldcut_core::{MediaItem, TierAssignment};
use coldcut_error::{ColdcutError, ColdcutResult, MigrationError, MigrationErrorKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument, warn};

/// A failed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemError {
    /// Media id
    pub id: String,
    /// Media display name
    pub name: String,
    /// Error message
    pub error: String,
}

/// Counts of a live run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveResults {
    /// Items whose blob exists and whose references were processed
    pub migrated: usize,
    /// Migrated items whose blob already existed
    pub reused: usize,
    /// Items that could not be migrated or deleted
    pub failed: usize,
    /// Cold items left for a later run
    pub skipped: usize,
    /// Bytes written to blob storage
    pub bytes_uploaded: u64,
    /// References pointed at blob URLs
    pub objects_updated: usize,
    /// References that could not be updated
    pub reference_failures: usize,
    /// Originals deleted, when deletion is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<usize>,
    /// Originals that could not be deleted after migrating
    pub deletion_failures: usize,
    /// Failed items
    pub errors: Vec<ItemError>,
    /// Migrated items whose original is still in the content store
    pub pending_cleanup: Vec<String>,
}

impl LiveResults {
    /// Empty results; `deleting` enables the `deleted` counter.
    pub fn new(deleting: bool) -> Self {
        Self {
            deleted: deleting.then_some(0),
            ..Self::default()
        }
    }

    /// Account for a migrated item.
    pub fn record(&mut self, outcome: &ItemOutcome) {
        self.migrated += 1;
        if outcome.reused {
            self.reused += 1;
        }
        self.bytes_uploaded += outcome.bytes_uploaded;
        self.objects_updated += outcome.objects_updated;
        self.reference_failures += outcome.reference_failures;

        match &outcome.deletion {
            Deletion::Skipped => {}
            Deletion::Deleted => self.record_deleted(),
            Deletion::Failed(_) => {
                self.deletion_failures += 1;
                self.pending_cleanup.push(outcome.media_id.clone());
            }
        }
    }

    /// Account for a deleted original.
    pub fn record_deleted(&mut self) {
        *self.deleted.get_or_insert(0) += 1;
    }

    /// Account for a failed item.
    pub fn record_failure(&mut self, item: &MediaItem, error: &ColdcutError) {
        self.failed += 1;
        self.errors.push(ItemError {
            id: item.id().clone(),
            name: item.display_name().clone(),
            error: error.to_string(),
        });
    }
}

/// Counts of a dry run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResults {
    /// Items that would be downloaded and uploaded
    pub would_migrate: usize,
    /// Items whose references already point at blob storage
    pub already_migrated: usize,
    /// Sum of sizes of the items that would migrate
    pub would_upload_bytes: u64,
    /// References that would be pointed at blob URLs
    pub would_update_objects: usize,
    /// Originals that would be deleted, when deletion is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub would_delete: Option<usize>,
    /// Cold items left for a later run
    pub skipped: usize,
}

impl PreviewResults {
    /// Empty preview; `deleting` enables the `would_delete` counter.
    pub fn new(deleting: bool) -> Self {
        Self {
            would_delete: deleting.then_some(0),
            ..Self::default()
        }
    }
}

/// Run outcome, tagged by mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Outcome {
    /// Stores were mutated
    Live(LiveResults),
    /// Nothing was mutated
    Preview(PreviewResults),
}

/// Count and size of one tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSummary {
    /// Items in the tier
    pub count: usize,
    /// Bytes in the tier
    pub bytes: u64,
}

/// Structured summary written at the end of every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Profile name
    pub profile: String,
    /// Dry run flag
    pub dry_run: bool,
    /// Delete-after-migrate flag
    pub delete_media: bool,
    /// Delete-only flag
    pub delete_only: bool,
    /// Run start
    pub started_at: DateTime<Utc>,
    /// Run end
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    /// Media items considered
    pub total_items: usize,
    /// Kept tier
    pub hot: TierSummary,
    /// Migrated tier
    pub cold: TierSummary,
    /// Reference scan counters, absent in delete-only runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanStats>,
    /// Counts for this mode
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Fatal error that ended the run early
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

impl MigrationReport {
    /// Report for a run that has not split its media yet.
    pub fn new(
        profile: impl Into<String>,
        dry_run: bool,
        delete_media: bool,
        delete_only: bool,
    ) -> Self {
        let deleting = delete_media || delete_only;
        let outcome = if dry_run {
            Outcome::Preview(PreviewResults::new(deleting))
        } else {
            Outcome::Live(LiveResults::new(deleting))
        };
        Self {
            profile: profile.into(),
            dry_run,
            delete_media,
            delete_only,
            started_at: Utc::now(),
            finished_at: None,
            total_items: 0,
            hot: TierSummary::default(),
            cold: TierSummary::default(),
            scan: None,
            outcome,
            aborted: None,
        }
    }

    /// Record the tier split.
    pub fn set_tiers(&mut self, tiers: &TierAssignment) {
        self.total_items = tiers.total();
        self.hot = TierSummary {
            count: tiers.hot.len(),
            bytes: tiers.hot_bytes(),
        };
        self.cold = TierSummary {
            count: tiers.cold.len(),
            bytes: tiers.cold_bytes(),
        };
    }

    /// Live counters, when this is a live run.
    pub fn live(&self) -> Option<&LiveResults> {
        match &self.outcome {
            Outcome::Live(results) => Some(results),
            Outcome::Preview(_) => None,
        }
    }

    /// Preview counters, when this is a dry run.
    pub fn preview(&self) -> Option<&PreviewResults> {
        match &self.outcome {
            Outcome::Preview(results) => Some(results),
            Outcome::Live(_) => None,
        }
    }

    /// Write the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `MigrationErrorKind::ReportWrite` when the file cannot be
    /// written.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn write(&self, path: &Path) -> ColdcutResult<()> {
        let report_error =
            |message: String| MigrationError::new(MigrationErrorKind::ReportWrite(message));

        let json = serde_json::to_vec_pretty(self).map_err(|e| report_error(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| report_error(format!("{}: {}", parent.display(), e)))?;
        }
        tokio::fs::write(path, json)
            .await
            .map_err(|e| report_error(format!("{}: {}", path.display(), e)))?;

        info!("Report written");
        Ok(())
    }

    /// Emit the summary to the log.
    pub fn log_summary(&self) {
        info!("========================================");
        info!(
            profile = %self.profile,
            dry_run = self.dry_run,
            delete_only = self.delete_only,
            "Migration summary"
        );
        info!("  Total media:  {}", self.total_items);
        info!(
            "  Hot (kept):   {} items, {}",
            self.hot.count,
            human_bytes(self.hot.bytes)
        );
        info!(
            "  Cold:         {} items, {}",
            self.cold.count,
            human_bytes(self.cold.bytes)
        );
        if let Some(scan) = &self.scan {
            info!(
                "  Scanned:      {} objects, {} references to {} items",
                scan.total_objects(),
                scan.references,
                scan.referenced_media
            );
        }

        match &self.outcome {
            Outcome::Live(results) => {
                info!(
                    "  Migrated:     {} ({} already in blob storage)",
                    results.migrated, results.reused
                );
                info!("  Failed:       {}", results.failed);
                info!("  Skipped:      {}", results.skipped);
                info!("  Uploaded:     {}", human_bytes(results.bytes_uploaded));
                info!(
                    "  References:   {} updated, {} failed",
                    results.objects_updated, results.reference_failures
                );
                if let Some(deleted) = results.deleted {
                    info!(
                        "  Deleted:      {} ({} left for cleanup)",
                        deleted, results.deletion_failures
                    );
                }
                for error in &results.errors {
                    warn!(id = %error.id, name = %error.name, "  Failed: {}", error.error);
                }
            }
            Outcome::Preview(preview) => {
                info!("  DRY RUN, nothing was changed");
                info!("  Would migrate:        {}", preview.would_migrate);
                info!("  Already migrated:     {}", preview.already_migrated);
                info!(
                    "  Would upload:         {}",
                    human_bytes(preview.would_upload_bytes)
                );
                info!("  Would update objects: {}", preview.would_update_objects);
                if let Some(would_delete) = preview.would_delete {
                    info!("  Would delete:         {}", would_delete);
                }
                info!("  Skipped:              {}", preview.skipped);
            }
        }

        if let Some(message) = &self.aborted {
            warn!("  Aborted: {}", message);
        }
        info!("========================================");
    }
}

/// Format a byte count with a binary unit.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}
