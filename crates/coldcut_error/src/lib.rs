//! Error types for the Coldcut workspace.
//!
//! This crate provides the foundation error types used by every Coldcut crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use coldcut_error::{ColdcutResult, ContentError, ContentErrorKind};
//!
//! fn fetch_page() -> ColdcutResult<String> {
//!     Err(ContentError::new(ContentErrorKind::Transport("Connection refused".into())))?
//! }
//!
//! match fetch_page() {
//!     Ok(page) => println!("Got: {}", page),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod content;
mod error;
mod migration;
mod retry;
mod storage;

pub use config::{ConfigError, ConfigErrorKind};
pub use content::{ContentError, ContentErrorKind};
pub use error::{ColdcutError, ColdcutErrorKind, ColdcutResult};
pub use migration::{MigrationError, MigrationErrorKind};
pub use retry::RetryableError;
pub use storage::{StorageError, StorageErrorKind};
