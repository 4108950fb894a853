//! Run settings and credentials.
//!
//! Settings are layered with the `config` crate, later sources winning:
//!
//! 1. Bundled defaults (`coldcut.toml` shipped with the crate)
//! 2. `~/.config/coldcut/coldcut.toml`
//! 3. `./coldcut.toml`, or the file given with `--config`
//! 4. Environment variables (`DRY_RUN`, `HOT_STORAGE_LIMIT`, ...)
//!
//! Credentials never come from files. They are read from the environment
//! separately so that every missing variable is reported in one error.

use crate::MigrationProfile;
use coldcut_content::RetryPolicy;
use coldcut_error::{ColdcutResult, ConfigError, ConfigErrorKind};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../coldcut.toml");

/// Non-secret run settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Preview without mutating any store
    pub dry_run: bool,
    /// Delete originals after migration
    pub delete_media: bool,
    /// Skip scanning and migration, only delete cold originals
    pub delete_only: bool,
    /// Hot tier size, overriding the profile default
    #[serde(default)]
    pub hot_storage_limit: Option<usize>,
    /// Page size for listings
    pub batch_size: usize,
    /// Cap on cold items processed in one run
    #[serde(default)]
    pub migration_limit: Option<usize>,
    /// Pause after each download
    pub download_delay_ms: u64,
    /// Pause after each upload
    pub upload_delay_ms: u64,
    /// Retries per media listing page
    pub list_retries: usize,
    /// Base backoff for media listing retries
    pub list_backoff_ms: u64,
    /// Where the run state is written
    #[serde(default)]
    pub state_file: Option<PathBuf>,
    /// Where the final report is written
    #[serde(default)]
    pub report_file: Option<PathBuf>,
    /// Processed items between state writes
    pub state_every: usize,
    /// Content platform endpoint
    pub content_api_url: String,
    /// Blob API endpoint
    pub blob_api_url: String,
    /// Hosts whose URLs count as already migrated
    #[serde(default)]
    pub blob_public_hosts: Vec<String>,
    /// Local directory used as blob storage instead of the blob API
    #[serde(default)]
    pub blob_local_dir: Option<PathBuf>,
    /// Public base URL of the local blob directory
    pub blob_local_url: String,
    /// Profiles declared in configuration files
    #[serde(default)]
    pub profiles: HashMap<String, MigrationProfile>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dry_run: true,
            delete_media: false,
            delete_only: false,
            hot_storage_limit: None,
            batch_size: 100,
            migration_limit: None,
            download_delay_ms: 200,
            upload_delay_ms: 500,
            list_retries: 4,
            list_backoff_ms: 1000,
            state_file: Some(PathBuf::from("migration-state.json")),
            report_file: Some(PathBuf::from("migration-report.json")),
            state_every: 50,
            content_api_url: coldcut_content::DEFAULT_CONTENT_API_URL.to_string(),
            blob_api_url: coldcut_storage::DEFAULT_BLOB_API_URL.to_string(),
            blob_public_hosts: vec!["public.blob.vercel-storage.com".to_string()],
            blob_local_dir: None,
            blob_local_url: "http://localhost:3000/blobs".to_string(),
            profiles: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from every source, reading the process environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a source cannot be parsed or a
    /// value is out of range.
    pub fn load(config_file: Option<&Path>) -> ColdcutResult<Self> {
        Self::load_with_env(config_file, None)
    }

    /// Load settings, taking environment variables from `env` when given.
    #[instrument(skip(env))]
    pub fn load_with_env(
        config_file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> ColdcutResult<Self> {
        debug!("Loading settings: environment > config file > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/coldcut/coldcut.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("coldcut").required(false)),
        };

        builder = builder.add_source(
            Environment::default()
                .try_parsing(true)
                .ignore_empty(true)
                .list_separator(",")
                .with_list_parse_key("blob_public_hosts")
                .source(env),
        );

        let settings: Self = builder
            .build()
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::Load(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::Load(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> ColdcutResult<()> {
        let invalid = |key: &str, reason: &str| {
            ConfigError::new(ConfigErrorKind::InvalidValue {
                key: key.to_string(),
                reason: reason.to_string(),
            })
        };

        if self.batch_size == 0 {
            return Err(invalid("BATCH_SIZE", "must be at least 1").into());
        }
        if self.state_every == 0 {
            return Err(invalid("STATE_EVERY", "must be at least 1").into());
        }
        if self.list_retries > 20 {
            return Err(invalid("LIST_RETRIES", "must be at most 20").into());
        }
        Ok(())
    }

    /// Resolve a profile, preferring ones declared in configuration.
    ///
    /// # Errors
    ///
    /// Returns `MigrationErrorKind::UnknownProfile` when the name is neither
    /// configured nor built in.
    pub fn profile(&self, name: &str) -> ColdcutResult<MigrationProfile> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None => MigrationProfile::builtin(name),
        }
    }

    /// Hot tier size for a profile.
    pub fn hot_limit(&self, profile: &MigrationProfile) -> usize {
        self.hot_storage_limit.unwrap_or(*profile.default_hot_limit())
    }

    /// Backoff used for media listing pages.
    pub fn list_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_backoff_ms: self.list_backoff_ms,
            max_retries: self.list_retries,
            ..RetryPolicy::default()
        }
    }

    /// Pause after each download.
    pub fn download_delay(&self) -> Duration {
        Duration::from_millis(self.download_delay_ms)
    }

    /// Pause after each upload.
    pub fn upload_delay(&self) -> Duration {
        Duration::from_millis(self.upload_delay_ms)
    }
}

/// Secrets for both stores.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Content bucket slug
    pub bucket_slug: String,
    /// Content read key
    pub read_key: String,
    /// Content write key
    pub write_key: String,
    /// Blob store token, absent in dry runs
    pub blob_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("bucket_slug", &self.bucket_slug)
            .field("read_key", &"<redacted>")
            .field("write_key", &"<redacted>")
            .field("blob_token", &self.blob_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    ///
    /// # Errors
    ///
    /// Lists every missing variable in a single configuration error.
    pub fn from_env(require_blob_token: bool) -> ColdcutResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), require_blob_token)
    }

    /// Read credentials through an arbitrary lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use coldcut_migrate::Credentials;
    ///
    /// let err = Credentials::from_lookup(
    ///     |key| (key == "CONTENT_BUCKET_SLUG").then(|| "radio".to_string()),
    ///     true,
    /// )
    /// .unwrap_err();
    ///
    /// let message = err.to_string();
    /// assert!(message.contains("CONTENT_READ_KEY, CONTENT_WRITE_KEY, BLOB_READ_WRITE_TOKEN"));
    /// ```
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        require_blob_token: bool,
    ) -> ColdcutResult<Self> {
        let mut missing = Vec::new();
        let mut required = |key: &str| {
            let value = lookup(key).filter(|v| !v.trim().is_empty());
            if value.is_none() {
                missing.push(key.to_string());
            }
            value.unwrap_or_default()
        };

        let bucket_slug = required("CONTENT_BUCKET_SLUG");
        let read_key = required("CONTENT_READ_KEY");
        let write_key = required("CONTENT_WRITE_KEY");
        let blob_token = if require_blob_token {
            Some(required("BLOB_READ_WRITE_TOKEN"))
        } else {
            lookup("BLOB_READ_WRITE_TOKEN").filter(|v| !v.trim().is_empty())
        };

        if !missing.is_empty() {
            return Err(ConfigError::new(ConfigErrorKind::MissingVariables(missing)).into());
        }

        Ok(Self {
            bucket_slug,
            read_key,
            write_key,
            blob_token,
        })
    }
}
