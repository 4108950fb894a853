//! Run state file.
//!
//! The state file lets an operator see how far a run got. It is rewritten
//! after each phase and every few items, and is never read back: a new run
//! starts over and relies on blob existence checks to skip finished work.

use crate::{LiveResults, Outcome, PreviewResults};
use chrono::{DateTime, Utc};
use coldcut_core::RunPhase;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Whether a run mutates the stores.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunMode {
    /// Stores are mutated
    #[default]
    Live,
    /// Dry run; nothing is mutated
    Preview,
}

/// Snapshot of a run's progress.
///
/// The plain counters only ever hold work that was done. A dry run leaves
/// them at zero and carries its "would" counts under `preview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    /// Current phase
    pub phase: RunPhase,
    /// Live or preview
    #[serde(default)]
    pub mode: RunMode,
    /// Items migrated
    pub migrated: usize,
    /// Items failed
    pub failed: usize,
    /// Items skipped
    pub skipped: usize,
    /// Originals deleted
    pub deleted: usize,
    /// Bytes uploaded
    pub bytes_uploaded: u64,
    /// References updated
    pub objects_updated: usize,
    /// Dry-run counts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewResults>,
    /// Cold items processed so far
    pub processed: usize,
    /// Cold items to process
    pub total: usize,
    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,
    /// Free-form detail, e.g. the fatal error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RunState {
    fn empty(phase: RunPhase, processed: usize, total: usize) -> Self {
        Self {
            phase,
            mode: RunMode::Live,
            migrated: 0,
            failed: 0,
            skipped: 0,
            deleted: 0,
            bytes_uploaded: 0,
            objects_updated: 0,
            preview: None,
            processed,
            total,
            timestamp: Utc::now(),
            message: None,
        }
    }

    /// Snapshot of a live run.
    pub fn live(phase: RunPhase, results: &LiveResults, processed: usize, total: usize) -> Self {
        Self {
            migrated: results.migrated,
            failed: results.failed,
            skipped: results.skipped,
            deleted: results.deleted.unwrap_or_default(),
            bytes_uploaded: results.bytes_uploaded,
            objects_updated: results.objects_updated,
            ..Self::empty(phase, processed, total)
        }
    }

    /// Snapshot of a dry run.
    pub fn preview(
        phase: RunPhase,
        preview: &PreviewResults,
        processed: usize,
        total: usize,
    ) -> Self {
        Self {
            mode: RunMode::Preview,
            skipped: preview.skipped,
            preview: Some(preview.clone()),
            ..Self::empty(phase, processed, total)
        }
    }

    /// Snapshot of whichever outcome the run has.
    pub fn for_outcome(phase: RunPhase, outcome: &Outcome, processed: usize, total: usize) -> Self {
        match outcome {
            Outcome::Live(results) => Self::live(phase, results, processed, total),
            Outcome::Preview(preview) => Self::preview(phase, preview, processed, total),
        }
    }

    /// Attach a message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Best-effort writer for the state file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRecorder {
    path: Option<PathBuf>,
    every: usize,
}

impl StateRecorder {
    /// Recorder writing to `path` every `every` processed items.
    pub fn new(path: Option<PathBuf>, every: usize) -> Self {
        Self {
            path,
            every: every.max(1),
        }
    }

    /// Whether a snapshot is due after `processed` items.
    pub fn is_due(&self, processed: usize) -> bool {
        processed > 0 && processed % self.every == 0
    }

    /// Overwrite the state file. Failures are logged and dropped.
    pub async fn record(&self, state: &RunState) {
        let Some(path) = &self.path else {
            return;
        };

        match write_atomically(path, state).await {
            Ok(()) => trace!(phase = %state.phase, processed = state.processed, "State recorded"),
            Err(e) => debug!(path = %path.display(), error = %e, "Failed to record state"),
        }
    }
}

async fn write_atomically(path: &Path, state: &RunState) -> std::io::Result<()> {
    let json = serde_json::to_vec_pretty(state)?;
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    tokio::fs::write(&temp, json).await?;
    tokio::fs::rename(&temp, path).await
}
