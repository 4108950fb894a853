//! Configuration error types.

/// Kinds of configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// One or more required environment variables are absent
    #[display("Missing required environment variables: {}", _0.join(", "))]
    MissingVariables(Vec<String>),
    /// A configuration value is present but unusable
    #[display("Invalid value for '{}': {}", key, reason)]
    InvalidValue {
        /// The configuration key
        key: String,
        /// Why the value was rejected
        reason: String,
    },
    /// Configuration sources could not be read or merged
    #[display("Failed to load configuration: {}", _0)]
    Load(String),
}

/// Configuration error with source location.
///
/// # Examples
///
/// ```
/// use coldcut_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::MissingVariables(vec![
///     "CONTENT_READ_KEY".to_string(),
///     "CONTENT_WRITE_KEY".to_string(),
/// ]));
/// assert!(format!("{}", err).contains("CONTENT_READ_KEY, CONTENT_WRITE_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The kind of error that occurred
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given kind at the current location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ConfigErrorKind {
        &self.kind
    }
}
