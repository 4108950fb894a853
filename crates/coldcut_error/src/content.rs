//! Content store error types.

use crate::RetryableError;

/// Kinds of content store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ContentErrorKind {
    /// The request never produced a response
    #[display("Request failed: {}", _0)]
    Transport(String),
    /// The API answered with a non-success status
    #[display("API returned {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },
    /// The requested resource (object type, object or media) does not exist
    #[display("Not found: {}", _0)]
    NotFound(String),
    /// The response body could not be decoded
    #[display("Failed to decode response: {}", _0)]
    Decode(String),
    /// A binary download failed
    #[display("Download of {} failed: {}", url, message)]
    Download {
        /// URL that was fetched
        url: String,
        /// What went wrong
        message: String,
    },
}

impl ContentErrorKind {
    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::NotFound(_) | Self::Decode(_) | Self::Download { .. } => false,
        }
    }
}

/// Content store error with location tracking.
///
/// # Examples
///
/// ```
/// use coldcut_error::{ContentError, ContentErrorKind, RetryableError};
///
/// let err = ContentError::new(ContentErrorKind::Api {
///     status: 503,
///     message: "Service unavailable".to_string(),
/// });
/// assert!(err.is_retryable());
///
/// let missing = ContentError::new(ContentErrorKind::NotFound("objects of type 'shows'".into()));
/// assert!(!missing.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Content Store Error: {} at line {} in {}", kind, line, file)]
pub struct ContentError {
    /// The kind of error that occurred
    pub kind: ContentErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ContentError {
    /// Create a new content store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ContentErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ContentErrorKind {
        &self.kind
    }

    /// True when the store reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ContentErrorKind::NotFound(_))
    }
}

impl RetryableError for ContentError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
