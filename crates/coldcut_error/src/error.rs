//! Top-level error wrapper types.

use crate::{ConfigError, ContentError, MigrationError, StorageError};

/// Every error a Coldcut operation can produce.
///
/// # Examples
///
/// ```
/// use coldcut_error::{ColdcutError, StorageError, StorageErrorKind};
///
/// let storage_err = StorageError::new(StorageErrorKind::Transport("Connection failed".into()));
/// let err: ColdcutError = storage_err.into();
/// assert!(format!("{}", err).contains("Connection failed"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ColdcutErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Content store error
    #[from(ContentError)]
    Content(ContentError),
    /// Blob storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Migration pipeline error
    #[from(MigrationError)]
    Migration(MigrationError),
}

/// Coldcut error with kind discrimination.
///
/// # Examples
///
/// ```
/// use coldcut_error::{ColdcutResult, ConfigError, ConfigErrorKind};
///
/// fn might_fail() -> ColdcutResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::Load("no sources".into())))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Coldcut Error: {}", _0)]
pub struct ColdcutError(Box<ColdcutErrorKind>);

impl ColdcutError {
    /// Create a new error from a kind.
    pub fn new(kind: ColdcutErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ColdcutErrorKind {
        &self.0
    }

    /// True for configuration problems detected before any network call.
    pub fn is_config(&self) -> bool {
        matches!(self.kind(), ColdcutErrorKind::Config(_))
    }
}

// Generic From implementation for any type that converts to ColdcutErrorKind
impl<T> From<T> for ColdcutError
where
    T: Into<ColdcutErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Coldcut operations.
pub type ColdcutResult<T> = std::result::Result<T, ColdcutError>;
