//! Hot/cold media migration pipeline.
//!
//! The pipeline lists every media item in the content store, keeps the
//! most recent ones (hot) and moves the rest (cold) to blob storage:
//!
//! 1. [`split`] orders media by upload time and partitions it
//! 2. [`scan_references`] finds the content objects pointing at cold media
//! 3. [`Executor`] copies each cold item to blob storage, repoints its
//!    references and optionally deletes the original
//! 4. [`StateRecorder`] and [`MigrationReport`] record progress and results
//!
//! [`Pipeline`] drives the phases for dry runs, live runs and delete-only
//! runs. [`Settings`], [`Credentials`] and [`MigrationProfile`] parameterize it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod executor;
mod matcher;
mod pipeline;
mod profile;
mod report;
mod scanner;
mod settings;
mod state;
mod tiering;

pub use executor::{Deletion, Executor, ItemOutcome, Throttle, already_migrated_by_url};
pub use matcher::{MatchStrategy, MediaLookup};
pub use pipeline::Pipeline;
pub use profile::{
    MigrationProfile, MigrationProfileBuilder, MigrationProfileBuilderError, PathStrategy,
    sanitize_name,
};
pub use report::{
    ItemError, LiveResults, MigrationReport, Outcome, PreviewResults, TierSummary, human_bytes,
};
pub use scanner::{ScanOutcome, ScanStats, scan_references};
pub use settings::{Credentials, Settings};
pub use state::{RunMode, RunState, StateRecorder};
pub use tiering::split;
