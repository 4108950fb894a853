//! Retry classification shared by the store clients.

/// Trait for errors that can be classified as retryable.
///
/// Transient conditions like 429 (rate limit), 5xx responses or dropped
/// connections return true. Permanent errors like 401 or 404 return false.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}
