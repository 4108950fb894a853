use crate::{Cli, build_stores};
use coldcut_error::ColdcutResult;
use coldcut_migrate::{Credentials, MigrationReport, Pipeline, Settings};
use tracing::{info, instrument};

/// Load settings and credentials, then run the selected profile.
///
/// # Errors
///
/// Returns configuration errors before any network call, and whatever
/// fatal error ends the pipeline.
#[instrument(skip_all, fields(profile = %cli.profile))]
pub async fn run(cli: &Cli) -> ColdcutResult<MigrationReport> {
    let settings = Settings::load(cli.config.as_deref())?;
    let profile = settings.profile(&cli.profile)?;
    let needs_blob_token = !settings.dry_run && settings.blob_local_dir.is_none();
    let credentials = Credentials::from_env(needs_blob_token)?;
    info!(?credentials, "Loaded credentials");

    let stores = build_stores(&settings, credentials)?;
    Pipeline::new(stores.content, stores.blobs, profile, settings)
        .run()
        .await
}
