mod test_utils;

use coldcut_core::MediaItem;
use coldcut_migrate::{MigrationProfile, scan_references};
use serde_json::json;
use test_utils::{MockContentStore, media, media_set, newest, object, object_with_metadata};

#[tokio::test]
async fn test_object_counted_once_per_media() {
    let profile = MigrationProfile::media();
    let item = media(3);
    // Same media through name, url and thumbnail
    let episode = object_with_metadata(
        "ep-1",
        "episodes",
        json!({
            "image": { "name": "m0003.jpg", "url": "https://cdn.example.com/radio/m0003.jpg" },
            "thumbnail": "https://imgix.example.com/m0003.jpg",
        }),
    );
    let store = MockContentStore::new(vec![]).with_objects("episodes", vec![episode]);

    let outcome = scan_references(&store, &[item], &profile, 100).await;

    let refs = outcome.index.references("m0003");
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].id, "ep-1");
    assert_eq!(outcome.stats.references, 1);
    assert_eq!(outcome.stats.referenced_media, 1);
}

fn uploaded(id: &str, display_name: &str, primary_url: &str) -> MediaItem {
    MediaItem::builder()
        .id(id)
        .display_name(display_name)
        .primary_url(primary_url)
        .uploaded_at(newest())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_display_name_wins_over_filename() {
    let profile = MigrationProfile::media();
    let renamed = uploaded("m-1", "cover.jpg", "https://cdn.example.com/radio/upload-77.jpg");
    let other = uploaded("m-2", "Cover art", "https://cdn.example.com/radio/cover.jpg");
    let post = object("post-1", "posts", json!("cover.jpg"));
    let store = MockContentStore::new(vec![]).with_objects("posts", vec![post]);

    let outcome = scan_references(&store, &[renamed, other], &profile, 100).await;

    assert_eq!(outcome.index.references("m-1").len(), 1);
    assert!(outcome.index.references("m-2").is_empty());
}

#[tokio::test]
async fn test_shared_filename_matches_nothing() {
    let profile = MigrationProfile::media();
    let first = uploaded("m-1", "Morning", "https://cdn.example.com/a/cover.jpg");
    let second = uploaded("m-2", "Evening", "https://cdn.example.com/b/cover.jpg");
    let post = object("post-1", "posts", json!("https://elsewhere.example.com/cover.jpg"));
    let store = MockContentStore::new(vec![]).with_objects("posts", vec![post]);

    let outcome = scan_references(&store, &[first, second], &profile, 100).await;

    assert!(outcome.index.is_empty());
    assert_eq!(outcome.stats.objects_scanned["posts"], 1);
}

#[tokio::test]
async fn test_filename_match_ignores_query_string() {
    let profile = MigrationProfile::media();
    let host = object(
        "host-1",
        "hosts",
        json!("https://imgix.example.com/m0002.jpg?w=300&fit=crop"),
    );
    let store = MockContentStore::new(vec![]).with_objects("hosts", vec![host]);

    let outcome = scan_references(&store, &media_set(4), &profile, 100).await;

    assert_eq!(outcome.index.references("m0002").len(), 1);
    assert_eq!(outcome.stats.objects_scanned["hosts"], 1);
}

#[tokio::test]
async fn test_missing_types_count_as_empty() {
    let profile = MigrationProfile::media();
    let store = MockContentStore::new(vec![])
        .with_objects("episodes", vec![object("ep-1", "episodes", json!("m0000.jpg"))]);

    let outcome = scan_references(&store, &media_set(1), &profile, 100).await;

    assert_eq!(
        outcome.stats.missing_types,
        ["hosts", "posts", "takeovers", "genres", "pages"]
    );
    assert!(outcome.stats.page_errors.is_empty());
    assert_eq!(outcome.index.references("m0000").len(), 1);
}

#[tokio::test]
async fn test_page_error_stops_only_that_type() {
    let profile = MigrationProfile::media();
    let episodes = (0..150)
        .map(|i| object(&format!("ep-{}", i), "episodes", json!("unrelated.png")))
        .collect();
    let store = MockContentStore::new(vec![])
        .with_objects("episodes", episodes)
        .with_failing_type("episodes", 1)
        .with_objects("posts", vec![object("post-1", "posts", json!("m0001.jpg"))]);

    let outcome = scan_references(&store, &media_set(2), &profile, 100).await;

    assert_eq!(outcome.stats.objects_scanned["episodes"], 100);
    assert_eq!(outcome.stats.page_errors.len(), 1);
    assert!(outcome.stats.page_errors[0].starts_with("episodes: "));
    assert_eq!(outcome.index.references("m0001").len(), 1);
    let pages = store.calls().object_pages;
    assert!(pages.contains(&("posts".to_string(), 0)));
}

#[tokio::test]
async fn test_not_found_after_first_page_ends_listing() {
    let profile = MigrationProfile::media();
    let mut episodes: Vec<_> = (0..150)
        .map(|i| object(&format!("ep-{}", i), "episodes", json!("unrelated.png")))
        .collect();
    episodes[20] = object("ep-20", "episodes", json!("m0001.jpg"));
    let store = MockContentStore::new(vec![])
        .with_objects("episodes", episodes)
        .with_vanishing_type("episodes", 1);

    let outcome = scan_references(&store, &media_set(2), &profile, 100).await;

    assert_eq!(outcome.stats.objects_scanned["episodes"], 100);
    assert!(!outcome.stats.missing_types.contains(&"episodes".to_string()));
    assert!(outcome.stats.page_errors.is_empty());
    assert_eq!(outcome.index.references("m0001").len(), 1);
}

#[tokio::test]
async fn test_external_url_is_captured() {
    let profile = MigrationProfile::media();
    let episode = object_with_metadata(
        "ep-9",
        "episodes",
        json!({
            "image": "m0000.jpg",
            "external_image_url": "https://x.public.blob.vercel-storage.com/a.jpg",
        }),
    );
    let store = MockContentStore::new(vec![]).with_objects("episodes", vec![episode]);

    let outcome = scan_references(&store, &media_set(1), &profile, 100).await;

    let refs = outcome.index.references("m0000");
    assert_eq!(
        refs[0].external_url.as_deref(),
        Some("https://x.public.blob.vercel-storage.com/a.jpg")
    );
    assert_eq!(refs[0].slug, "ep-9-slug");
    assert_eq!(refs[0].field, "image");
}

#[tokio::test]
async fn test_thumbnail_reference_reads_its_own_external_url() {
    let profile = MigrationProfile::media();
    let episode = object_with_metadata(
        "ep-9",
        "episodes",
        json!({
            "thumbnail": "m0000.jpg",
            "external_image_url": "https://x.public.blob.vercel-storage.com/other.jpg",
        }),
    );
    let store = MockContentStore::new(vec![]).with_objects("episodes", vec![episode]);

    let outcome = scan_references(&store, &media_set(1), &profile, 100).await;

    let refs = outcome.index.references("m0000");
    assert_eq!(refs[0].field, "thumbnail");
    assert_eq!(refs[0].external_url, None);
}

#[tokio::test]
async fn test_media_outside_candidates_is_ignored() {
    let profile = MigrationProfile::media();
    let episode = object("ep-1", "episodes", json!("m0000.jpg"));
    let store = MockContentStore::new(vec![]).with_objects("episodes", vec![episode]);

    // m0000 is hot; only m0001 is a candidate
    let outcome = scan_references(&store, &[media(1)], &profile, 100).await;

    assert!(outcome.index.is_empty());
    assert_eq!(outcome.stats.objects_scanned["episodes"], 1);
}

#[tokio::test]
async fn test_no_candidates_skips_scan() {
    let profile = MigrationProfile::media();
    let store = MockContentStore::new(vec![]);

    let outcome = scan_references(&store, &[], &profile, 100).await;

    assert!(store.calls().object_pages.is_empty());
    assert_eq!(outcome.stats.total_objects(), 0);
}
