//! Pipeline driver.
//!
//! Phases run in order: fetch media, split hot/cold, scan references,
//! then migrate (or preview) the cold tier. Delete-only runs skip the scan
//! and remove cold originals whose blob copy exists.

use crate::{
    Executor, LiveResults, MigrationProfile, MigrationReport, Outcome, PreviewResults, RunState,
    Settings, StateRecorder, Throttle, already_migrated_by_url, scan_references, split,
};
use chrono::Utc;
use coldcut_content::{ContentStore, fetch_all_media};
use coldcut_core::{MediaItem, ReferenceIndex, RunPhase};
use coldcut_error::{ColdcutResult, ConfigError, ConfigErrorKind};
use coldcut_storage::BlobStore;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

const PROGRESS_EVERY: usize = 100;

/// One configured migration run.
pub struct Pipeline {
    content: Arc<dyn ContentStore>,
    blobs: Option<Arc<dyn BlobStore>>,
    profile: MigrationProfile,
    settings: Settings,
}

#[derive(Debug, Default, Clone, Copy)]
struct Progress {
    processed: usize,
    total: usize,
}

impl Progress {
    fn is_milestone(&self) -> bool {
        self.processed % PROGRESS_EVERY == 0 || self.processed == self.total
    }
}

fn checkpoint(phase: RunPhase, report: &MigrationReport, progress: Progress) -> RunState {
    RunState::for_outcome(phase, &report.outcome, progress.processed, progress.total)
}

impl Pipeline {
    /// Create a pipeline. `blobs` may be `None` only for dry runs.
    pub fn new(
        content: Arc<dyn ContentStore>,
        blobs: Option<Arc<dyn BlobStore>>,
        profile: MigrationProfile,
        settings: Settings,
    ) -> Self {
        Self {
            content,
            blobs,
            profile,
            settings,
        }
    }

    /// Run every phase and write the report.
    ///
    /// # Errors
    ///
    /// Returns configuration errors, exhausted media listing retries and
    /// report write failures. On any of these the state file records the
    /// `error` phase and a report with `aborted` set is still attempted.
    #[instrument(skip_all, fields(
        profile = %self.profile.name(),
        dry_run = self.settings.dry_run,
        delete_only = self.settings.delete_only,
    ))]
    pub async fn run(&self) -> ColdcutResult<MigrationReport> {
        let recorder = StateRecorder::new(
            self.settings.state_file.clone(),
            self.settings.state_every,
        );
        let mut report = MigrationReport::new(
            self.profile.name().clone(),
            self.settings.dry_run,
            self.settings.delete_media,
            self.settings.delete_only,
        );
        let mut progress = Progress::default();

        info!(
            mode = if self.settings.dry_run { "dry run" } else { "live" },
            "Starting media migration"
        );

        let result = self.execute(&recorder, &mut report, &mut progress).await;
        report.finished_at = Some(Utc::now());

        match result {
            Ok(()) => {
                recorder
                    .record(&RunState::for_outcome(
                        RunPhase::Complete,
                        &report.outcome,
                        progress.processed,
                        progress.total,
                    ))
                    .await;
                report.log_summary();
                self.write_report(&report).await?;
                Ok(report)
            }
            Err(e) => {
                error!(error = %e, "Migration aborted");
                report.aborted = Some(e.to_string());
                recorder
                    .record(
                        &RunState::for_outcome(
                            RunPhase::Error,
                            &report.outcome,
                            progress.processed,
                            progress.total,
                        )
                        .with_message(e.to_string()),
                    )
                    .await;
                report.log_summary();
                if let Err(write_error) = self.write_report(&report).await {
                    warn!(error = %write_error, "Failed to write report for aborted run");
                }
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        recorder: &StateRecorder,
        report: &mut MigrationReport,
        progress: &mut Progress,
    ) -> ColdcutResult<()> {
        recorder
            .record(&checkpoint(RunPhase::Starting, report, *progress))
            .await;

        let blobs: Option<&dyn BlobStore> = match (&self.blobs, self.settings.dry_run) {
            (Some(blobs), _) => Some(blobs.as_ref()),
            (None, true) => None,
            (None, false) => {
                return Err(ConfigError::new(ConfigErrorKind::MissingVariables(vec![
                    "BLOB_READ_WRITE_TOKEN".to_string(),
                ]))
                .into());
            }
        };

        info!("Fetching media");
        let media = fetch_all_media(
            self.content.as_ref(),
            self.settings.batch_size,
            &self.settings.list_retry_policy(),
        )
        .await?;
        let fetched = media.len();
        let media: Vec<MediaItem> = media
            .into_iter()
            .filter(|item| self.profile.accepts(item))
            .collect();
        if media.len() < fetched {
            info!(
                kept = media.len(),
                fetched,
                folder = ?self.profile.media_folder(),
                "Filtered media by folder"
            );
        }
        recorder
            .record(&checkpoint(RunPhase::MediaFetched, report, *progress))
            .await;

        let hot_limit = self.settings.hot_limit(&self.profile);
        let tiers = split(media, hot_limit);
        report.set_tiers(&tiers);
        info!(
            total = tiers.total(),
            hot = tiers.hot.len(),
            cold = tiers.cold.len(),
            hot_limit,
            "Split media into hot and cold tiers"
        );
        recorder
            .record(&checkpoint(RunPhase::SplitIdentified, report, *progress))
            .await;

        let limit = self
            .settings
            .migration_limit
            .unwrap_or(tiers.cold.len())
            .min(tiers.cold.len());
        let (work, deferred) = tiers.cold.split_at(limit);
        progress.total = work.len();
        if !deferred.is_empty() {
            info!(
                processing = work.len(),
                deferred = deferred.len(),
                "Migration limit reached, deferring the rest"
            );
        }

        if work.is_empty() {
            info!("No cold media to process");
        }

        if self.settings.delete_only {
            report.outcome = self
                .delete_cold(blobs, work, deferred.len(), recorder, progress)
                .await;
            return Ok(());
        }

        info!(
            types = self.profile.object_types().len(),
            "Scanning content objects for references"
        );
        let scan = scan_references(
            self.content.as_ref(),
            &tiers.cold,
            &self.profile,
            self.settings.batch_size,
        )
        .await;
        report.scan = Some(scan.stats);
        recorder
            .record(&checkpoint(RunPhase::ReferencesMapped, report, *progress))
            .await;

        report.outcome = match blobs {
            Some(blobs) if !self.settings.dry_run => {
                let results = self
                    .migrate(blobs, work, &scan.index, recorder, progress)
                    .await;
                Outcome::Live(LiveResults {
                    skipped: results.skipped + deferred.len(),
                    ..results
                })
            }
            _ => {
                let preview = self.preview(work, &scan.index, recorder, progress).await;
                Outcome::Preview(PreviewResults {
                    skipped: preview.skipped + deferred.len(),
                    ..preview
                })
            }
        };
        Ok(())
    }

    async fn migrate(
        &self,
        blobs: &dyn BlobStore,
        work: &[MediaItem],
        index: &ReferenceIndex,
        recorder: &StateRecorder,
        progress: &mut Progress,
    ) -> LiveResults {
        let executor = Executor::new(self.content.as_ref(), blobs, &self.profile)
            .with_throttle(Throttle::new(
                self.settings.download_delay(),
                self.settings.upload_delay(),
            ))
            .with_deletion(self.settings.delete_media);
        let mut results = LiveResults::new(self.settings.delete_media);

        info!(items = work.len(), backend = blobs.backend_name(), "Migrating cold media");

        for item in work {
            let references = index.references(item.id());
            if already_migrated_by_url(references, &self.settings.blob_public_hosts) {
                debug!(media = %item.id(), "References already point at blob storage");
            }

            match executor.migrate(item, references).await {
                Ok(outcome) => results.record(&outcome),
                Err(e) => {
                    warn!(
                        media = %item.id(),
                        name = %item.display_name(),
                        error = %e,
                        "Failed to migrate"
                    );
                    results.record_failure(item, &e);
                }
            }

            progress.processed += 1;
            if recorder.is_due(progress.processed) {
                let state = RunState::live(
                    RunPhase::Migrating,
                    &results,
                    progress.processed,
                    progress.total,
                );
                recorder.record(&state).await;
            }
            if progress.is_milestone() {
                info!(
                    "Progress: {}/{} ({} migrated, {} failed)",
                    progress.processed, progress.total, results.migrated, results.failed
                );
            }
        }

        results
    }

    async fn preview(
        &self,
        work: &[MediaItem],
        index: &ReferenceIndex,
        recorder: &StateRecorder,
        progress: &mut Progress,
    ) -> PreviewResults {
        let mut preview = PreviewResults::new(self.settings.delete_media);

        info!(items = work.len(), "Previewing cold media (dry run)");

        for item in work {
            let references = index.references(item.id());
            if already_migrated_by_url(references, &self.settings.blob_public_hosts) {
                preview.already_migrated += 1;
            } else {
                preview.would_migrate += 1;
                preview.would_upload_bytes += *item.size_bytes();
            }
            preview.would_update_objects += references.len();
            if let Some(would_delete) = preview.would_delete.as_mut() {
                *would_delete += 1;
            }

            progress.processed += 1;
            if recorder.is_due(progress.processed) {
                let state = RunState::preview(
                    RunPhase::Migrating,
                    &preview,
                    progress.processed,
                    progress.total,
                );
                recorder.record(&state).await;
            }
            if progress.is_milestone() {
                info!(
                    "Progress: {}/{} ({} would migrate, {} already migrated)",
                    progress.processed,
                    progress.total,
                    preview.would_migrate,
                    preview.already_migrated
                );
            }
        }

        preview
    }

    async fn delete_cold(
        &self,
        blobs: Option<&dyn BlobStore>,
        work: &[MediaItem],
        deferred: usize,
        recorder: &StateRecorder,
        progress: &mut Progress,
    ) -> Outcome {
        let blobs = match blobs {
            Some(blobs) if !self.settings.dry_run => blobs,
            _ => {
                info!(
                    items = work.len(),
                    "Previewing deletion of cold originals (dry run)"
                );
                progress.processed = work.len();
                return Outcome::Preview(PreviewResults {
                    would_delete: Some(work.len()),
                    skipped: deferred,
                    ..PreviewResults::default()
                });
            }
        };

        let executor = Executor::new(self.content.as_ref(), blobs, &self.profile);
        let mut results = LiveResults::new(true);
        results.skipped = deferred;

        info!(items = work.len(), "Deleting cold originals");

        for item in work {
            match executor.delete_verified(item).await {
                Ok(_) => results.record_deleted(),
                Err(e) => {
                    warn!(
                        media = %item.id(),
                        name = %item.display_name(),
                        error = %e,
                        "Failed to delete original"
                    );
                    results.record_failure(item, &e);
                }
            }

            progress.processed += 1;
            if recorder.is_due(progress.processed) {
                let state = RunState::live(
                    RunPhase::Deleting,
                    &results,
                    progress.processed,
                    progress.total,
                );
                recorder.record(&state).await;
            }
            if progress.is_milestone() {
                info!(
                    "Progress: {}/{} ({} deleted, {} failed)",
                    progress.processed,
                    progress.total,
                    results.deleted.unwrap_or_default(),
                    results.failed
                );
            }
        }

        Outcome::Live(results)
    }

    async fn write_report(&self, report: &MigrationReport) -> ColdcutResult<()> {
        match &self.settings.report_file {
            Some(path) => report.write(path).await,
            None => Ok(()),
        }
    }
}
