//! Tests for the bucket REST API client.

use coldcut_content::{ContentCredentials, ContentStore, HttpContentStore};
use coldcut_core::PageRequest;
use coldcut_error::{ColdcutErrorKind, ContentErrorKind};
use httpmock::prelude::*;
use serde_json::json;

fn credentials() -> ContentCredentials {
    ContentCredentials {
        bucket_slug: "radio".to_string(),
        read_key: "read-key".to_string(),
        write_key: "write-key".to_string(),
    }
}

#[tokio::test]
async fn test_list_media_maps_records() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/buckets/radio/media")
                .query_param("read_key", "read-key")
                .query_param("limit", "2")
                .query_param("skip", "0")
                .query_param("sort", "-created_at");
            then.status(200).json_body(json!({
                "media": [
                    {
                        "id": "m2",
                        "name": "abc-late-night.jpg",
                        "url": "https://cdn.example.com/radio/abc-late-night.jpg",
                        "imgix_url": "https://imgix.example.com/abc-late-night.jpg",
                        "size": 4096,
                        "created_at": "2024-05-02T10:00:00.000Z",
                        "folder": "episodes",
                        "type": "image/jpeg"
                    },
                    {
                        "id": "m1",
                        "name": "abc-morning.png",
                        "url": "https://cdn.example.com/radio/abc-morning.png",
                        "created_at": "2024-05-01T10:00:00Z"
                    }
                ],
                "total": 7
            }));
        })
        .await;

    let store = HttpContentStore::with_api_url(server.base_url(), credentials());
    let page = store.list_media(PageRequest::first(2)).await.unwrap();

    assert_eq!(page.total, Some(7));
    assert_eq!(page.items.len(), 2);
    let first = &page.items[0];
    assert_eq!(first.id(), "m2");
    assert_eq!(first.display_name(), "abc-late-night.jpg");
    assert_eq!(
        first.alternate_url().as_deref(),
        Some("https://imgix.example.com/abc-late-night.jpg")
    );
    assert_eq!(*first.size_bytes(), 4096);
    assert_eq!(first.folder().as_deref(), Some("episodes"));
    assert_eq!(*page.items[1].size_bytes(), 0);
    assert!(page.items[1].alternate_url().is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_media_empty_bucket_is_empty_page() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/buckets/radio/media");
            then.status(404).body("No media found");
        })
        .await;

    let store = HttpContentStore::with_api_url(server.base_url(), credentials());
    let page = store.list_media(PageRequest::first(100)).await.unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_list_objects_filters_by_type() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/buckets/radio/objects")
                .query_param("query", r#"{"type":"episodes"}"#)
                .query_param("skip", "100");
            then.status(200).json_body(json!({
                "objects": [{
                    "id": "o1",
                    "slug": "late-night-0524",
                    "title": "Late Night 05/24",
                    "metadata": { "image": { "name": "abc-late-night.jpg" } }
                }],
                "total": 101
            }));
        })
        .await;

    let store = HttpContentStore::with_api_url(server.base_url(), credentials());
    let page = store
        .list_objects("episodes", PageRequest { limit: 100, skip: 100 })
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].object_type(), "episodes");
    assert_eq!(page.items[0].slug(), "late-night-0524");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_objects_missing_type_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/buckets/radio/objects");
            then.status(404).body("No objects found");
        })
        .await;

    let store = HttpContentStore::with_api_url(server.base_url(), credentials());
    let err = store
        .list_objects("shows", PageRequest::first(100))
        .await
        .expect_err("404 should surface");

    match err.kind() {
        ColdcutErrorKind::Content(e) => assert!(e.is_not_found()),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_update_metadata_patches_single_field() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/buckets/radio/objects/o1")
                .header("authorization", "Bearer write-key")
                .json_body(json!({
                    "metadata": { "external_image_url": "https://blobs.example.com/a.jpg" }
                }));
            then.status(200).json_body(json!({ "object": { "id": "o1" } }));
        })
        .await;

    let store = HttpContentStore::with_api_url(server.base_url(), credentials());
    store
        .update_metadata("o1", "external_image_url", "https://blobs.example.com/a.jpg")
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_delete_media_reports_server_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/buckets/radio/media/m1");
            then.status(503).body("try later");
        })
        .await;

    let store = HttpContentStore::with_api_url(server.base_url(), credentials());
    let err = store.delete_media("m1").await.expect_err("503 should fail");

    match err.kind() {
        ColdcutErrorKind::Content(e) => {
            assert_eq!(
                e.kind,
                ContentErrorKind::Api {
                    status: 503,
                    message: "try later".to_string()
                }
            );
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_download_returns_body_and_content_type() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/radio/cover.png");
            then.status(200)
                .header("content-type", "image/png; charset=binary")
                .body("png-bytes");
        })
        .await;

    let store = HttpContentStore::with_api_url(server.base_url(), credentials());
    let download = store
        .download(&server.url("/radio/cover.png"))
        .await
        .unwrap();

    assert_eq!(download.data, b"png-bytes");
    assert_eq!(download.len(), 9);
    assert_eq!(download.content_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn test_download_failure_names_url() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/gone.jpg");
            then.status(410);
        })
        .await;

    let store = HttpContentStore::with_api_url(server.base_url(), credentials());
    let url = server.url("/gone.jpg");
    let err = store.download(&url).await.expect_err("410 should fail");

    match err.kind() {
        ColdcutErrorKind::Content(e) => match &e.kind {
            ContentErrorKind::Download { url: failed, .. } => assert_eq!(failed, &url),
            other => panic!("unexpected kind: {}", other),
        },
        other => panic!("unexpected error: {}", other),
    }
}
