//! Migration pipeline error types.

/// Kinds of migration errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MigrationErrorKind {
    /// Media item carries neither a primary nor an alternate URL
    #[display("Media {} has no downloadable URL", _0)]
    NoSourceUrl(String),
    /// Every candidate URL of a media item failed to download
    #[display("Media {} could not be downloaded: {}", id, message)]
    Unreachable {
        /// Media id
        id: String,
        /// Last download error
        message: String,
    },
    /// Delete-only mode found no migrated copy for the item
    #[display("Media {} has no copy at {}; refusing to delete", id, path)]
    NotMigrated {
        /// Media id
        id: String,
        /// Expected destination path
        path: String,
    },
    /// The final report could not be written
    #[display("Failed to write report: {}", _0)]
    ReportWrite(String),
    /// Unknown migration profile name
    #[display("Unknown profile: {}", _0)]
    UnknownProfile(String),
}

/// Migration error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Migration Error: {} at line {} in {}", kind, line, file)]
pub struct MigrationError {
    /// The kind of error that occurred
    pub kind: MigrationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MigrationError {
    /// Create a new migration error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MigrationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MigrationErrorKind {
        &self.kind
    }
}
