//! Media items known to the content store.

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A binary asset record in the content store.
///
/// `id` is globally unique and stable; `display_name` is not guaranteed unique.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use coldcut_core::MediaItemBuilder;
///
/// let item = MediaItemBuilder::default()
///     .id("65a1")
///     .display_name("night-shift.jpg")
///     .primary_url("https://cdn.example.com/media/night-shift.jpg")
///     .size_bytes(2048u64)
///     .uploaded_at(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(item.filename(), Some("night-shift.jpg"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct MediaItem {
    /// Opaque stable identifier
    id: String,
    /// Human-readable name, often used as a reference key
    display_name: String,
    /// Original storage URL
    #[builder(default, setter(into, strip_option))]
    primary_url: Option<String>,
    /// CDN-transformed URL
    #[builder(default, setter(into, strip_option))]
    alternate_url: Option<String>,
    /// Size reported by the store
    #[builder(default)]
    size_bytes: u64,
    /// Upload timestamp, used for recency ordering
    uploaded_at: DateTime<Utc>,
    /// Media folder the item lives in
    #[builder(default, setter(into, strip_option))]
    folder: Option<String>,
    /// MIME type reported by the store
    #[builder(default, setter(into, strip_option))]
    mime_type: Option<String>,
}

impl MediaItem {
    /// Creates a new media item builder.
    pub fn builder() -> MediaItemBuilder {
        MediaItemBuilder::default()
    }

    /// URLs to try when downloading, primary first.
    pub fn source_urls(&self) -> impl Iterator<Item = &str> {
        self.primary_url
            .as_deref()
            .into_iter()
            .chain(self.alternate_url.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// Filename of the primary URL, falling back to the alternate URL.
    pub fn filename(&self) -> Option<&str> {
        self.primary_url
            .as_deref()
            .and_then(filename_from_url)
            .or_else(|| self.alternate_url.as_deref().and_then(filename_from_url))
    }
}

/// Extract the last path segment of a URL, ignoring query string and fragment.
///
/// # Examples
///
/// ```
/// use coldcut_core::filename_from_url;
///
/// assert_eq!(
///     filename_from_url("https://imgix.example.com/a/b/cover.png?w=400#top"),
///     Some("cover.png")
/// );
/// assert_eq!(filename_from_url("https://example.com/"), None);
/// ```
pub fn filename_from_url(url: &str) -> Option<&str> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);
    without_query
        .rsplit('/')
        .next()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}
