//! Test utilities for pipeline tests.
//!
//! In-memory stores with call logs, plus fixture builders.

#![allow(dead_code)]

pub mod mock_blob;
pub mod mock_content;

pub use mock_blob::MockBlobStore;
pub use mock_content::MockContentStore;

use chrono::{DateTime, Duration, TimeZone, Utc};
use coldcut_core::{ContentObject, MediaItem};
use coldcut_migrate::Settings;
use serde_json::{Value, json};
use std::path::Path;

/// Upload time of the newest fixture item.
pub fn newest() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Media item `m{index}`, one minute older per index.
pub fn media(index: usize) -> MediaItem {
    let id = format!("m{:04}", index);
    MediaItem::builder()
        .id(id.clone())
        .display_name(format!("{}.jpg", id))
        .primary_url(format!("https://cdn.example.com/radio/{}.jpg", id))
        .alternate_url(format!("https://imgix.example.com/{}.jpg", id))
        .size_bytes(1000u64)
        .uploaded_at(newest() - Duration::minutes(index as i64))
        .build()
        .expect("Valid media item")
}

/// `count` media items, newest first.
pub fn media_set(count: usize) -> Vec<MediaItem> {
    (0..count).map(media).collect()
}

/// Object of `object_type` whose `image` field holds `image`.
pub fn object(id: &str, object_type: &str, image: Value) -> ContentObject {
    object_with_metadata(id, object_type, json!({ "image": image }))
}

/// Object with arbitrary metadata.
pub fn object_with_metadata(id: &str, object_type: &str, metadata: Value) -> ContentObject {
    ContentObject::builder()
        .id(id)
        .object_type(object_type)
        .slug(format!("{}-slug", id))
        .title(format!("Title {}", id))
        .metadata(metadata.as_object().cloned().unwrap_or_default())
        .build()
        .expect("Valid content object")
}

/// Episode referencing media `index` by display name.
pub fn episode_for(index: usize) -> ContentObject {
    let media = media(index);
    object(
        &format!("ep-{}", index),
        "episodes",
        json!({ "name": media.display_name(), "url": media.primary_url() }),
    )
}

/// Live settings writing state and report under `dir`, without pauses.
pub fn live_settings(dir: &Path) -> Settings {
    Settings {
        dry_run: false,
        download_delay_ms: 0,
        upload_delay_ms: 0,
        list_retries: 0,
        list_backoff_ms: 1,
        state_file: Some(dir.join("state.json")),
        report_file: Some(dir.join("report.json")),
        ..Settings::default()
    }
}

/// Dry-run variant of [`live_settings`].
pub fn dry_run_settings(dir: &Path) -> Settings {
    Settings {
        dry_run: true,
        ..live_settings(dir)
    }
}

/// Read a JSON file written by the pipeline.
pub fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("File should exist");
    serde_json::from_str(&text).expect("File should hold JSON")
}
