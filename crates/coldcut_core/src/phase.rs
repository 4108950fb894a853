//! Pipeline phases recorded in the state file.

use serde::{Deserialize, Serialize};

/// Phase a migration run has reached.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunPhase {
    /// Run started, nothing fetched yet
    Starting,
    /// All media records fetched
    MediaFetched,
    /// Hot/cold split computed
    SplitIdentified,
    /// Reference index built
    ReferencesMapped,
    /// Migrating cold items
    Migrating,
    /// Deleting cold originals (delete-only mode)
    Deleting,
    /// Run finished
    Complete,
    /// Run aborted
    Error,
}

impl RunPhase {
    /// Whether the run ended in this phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }
}
