//! Headless CMS client for Coldcut.
//!
//! The [`ContentStore`] trait is the seam between the migration pipeline and
//! the content platform: paginated reads of media and typed objects, the
//! metadata write used to repoint references, media deletion and binary
//! download. [`HttpContentStore`] speaks the platform's bucket REST API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dto;
mod http;
mod listing;
mod store;

pub use http::{ContentCredentials, DEFAULT_CONTENT_API_URL, HttpContentStore};
pub use listing::{RetryPolicy, fetch_all_media, is_transient};
pub use store::{ContentStore, Download};
