use clap::Parser;
use coldcut::{Cli, build_stores};
use coldcut_migrate::{Credentials, Settings};
use coldcut_storage::BlobStore;
use std::path::Path;

fn credentials(blob_token: Option<&str>) -> Credentials {
    Credentials {
        bucket_slug: "radio".to_string(),
        read_key: "read".to_string(),
        write_key: "write".to_string(),
        blob_token: blob_token.map(str::to_string),
    }
}

#[test]
fn test_defaults() {
    let cli = Cli::try_parse_from(["coldcut"]).unwrap();

    assert_eq!(cli.profile, "media");
    assert_eq!(cli.config, None);
    assert!(!cli.verbose);
    assert!(!cli.json_logs);
}

#[test]
fn test_profile_and_config() {
    let cli = Cli::try_parse_from([
        "coldcut",
        "--profile",
        "episode-images",
        "--config",
        "ops/coldcut.toml",
        "-v",
    ])
    .unwrap();

    assert_eq!(cli.profile, "episode-images");
    assert_eq!(cli.config.as_deref(), Some(Path::new("ops/coldcut.toml")));
    assert!(cli.verbose);
}

#[test]
fn test_rejects_unknown_flags() {
    assert!(Cli::try_parse_from(["coldcut", "--live"]).is_err());
}

#[test]
fn test_local_directory_backs_blobs() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        blob_local_dir: Some(dir.path().join("blobs")),
        ..Settings::default()
    };

    let stores = build_stores(&settings, credentials(Some("token"))).unwrap();

    let blobs = stores.blobs.expect("Local blob store");
    assert_eq!(blobs.backend_name(), "filesystem");
    assert!(dir.path().join("blobs").is_dir());
}

#[test]
fn test_token_selects_blob_api() {
    let stores = build_stores(&Settings::default(), credentials(Some("token"))).unwrap();

    assert_eq!(stores.blobs.unwrap().backend_name(), "http");
}

#[test]
fn test_no_token_means_no_blob_store() {
    let stores = build_stores(&Settings::default(), credentials(None)).unwrap();

    assert!(stores.blobs.is_none());
}
