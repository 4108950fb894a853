//! Migration profiles.
//!
//! A profile names the content types to scan, where their image references
//! live, which metadata field receives the new URL for each of them and
//! how destination paths are laid out in blob storage.

use coldcut_core::MediaItem;
use coldcut_error::{ColdcutResult, MigrationError, MigrationErrorKind};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Layout of destination paths inside blob storage.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PathStrategy {
    /// `{prefix}/{id}/{name}`, stable across renames and name collisions
    #[default]
    IdAndName,
    /// `{prefix}/{name}`, the legacy episode-image layout
    Name,
}

/// Parameter set for one migration.
///
/// # Examples
///
/// ```
/// use coldcut_migrate::MigrationProfile;
///
/// let profile = MigrationProfile::builder()
///     .name("host-portraits")
///     .object_types(vec!["hosts".to_string()])
///     .image_fields(vec!["image".to_string(), "portrait".to_string()])
///     .destination_prefix("hosts")
///     .default_hot_limit(200usize)
///     .build()
///     .unwrap();
///
/// assert_eq!(profile.destination_prefix(), "hosts");
/// assert_eq!(profile.external_url_field("portrait"), "external_portrait_url");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct MigrationProfile {
    /// Profile name, as selected on the command line
    name: String,
    /// Content types scanned for references
    object_types: Vec<String>,
    /// Metadata fields holding image references
    image_fields: Vec<String>,
    /// Image field to the metadata field that receives its blob URL.
    /// Unlisted fields use `external_{field}_url`.
    #[serde(default)]
    #[builder(default)]
    external_url_fields: BTreeMap<String, String>,
    /// Folder inside blob storage
    destination_prefix: String,
    /// Destination path layout
    #[serde(default)]
    #[builder(default)]
    path_strategy: PathStrategy,
    /// Hot tier size when `HOT_STORAGE_LIMIT` is unset
    default_hot_limit: usize,
    /// Only media in this content store folder take part
    #[serde(default)]
    #[builder(default, setter(into, strip_option))]
    media_folder: Option<String>,
}

impl MigrationProfile {
    /// Creates a new profile builder.
    pub fn builder() -> MigrationProfileBuilder {
        MigrationProfileBuilder::default()
    }

    /// All media referenced from the site's content types.
    pub fn media() -> Self {
        Self {
            name: "media".to_string(),
            object_types: ["episodes", "hosts", "posts", "takeovers", "genres", "pages"]
                .map(String::from)
                .to_vec(),
            image_fields: vec!["image".to_string(), "thumbnail".to_string()],
            external_url_fields: [
                ("image", "external_image_url"),
                ("thumbnail", "external_thumbnail_url"),
            ]
            .into_iter()
            .map(|(image, external)| (image.to_string(), external.to_string()))
            .collect(),
            destination_prefix: "cold-storage/media".to_string(),
            path_strategy: PathStrategy::IdAndName,
            default_hot_limit: 1000,
            media_folder: None,
        }
    }

    /// Episode artwork only.
    pub fn episode_images() -> Self {
        Self {
            name: "episode-images".to_string(),
            object_types: vec!["episodes".to_string()],
            image_fields: vec!["image".to_string()],
            external_url_fields: BTreeMap::from([(
                "image".to_string(),
                "external_image_url".to_string(),
            )]),
            destination_prefix: "episodes".to_string(),
            path_strategy: PathStrategy::IdAndName,
            default_hot_limit: 500,
            media_folder: None,
        }
    }

    /// Look up a built-in profile by name.
    ///
    /// # Errors
    ///
    /// Returns `MigrationErrorKind::UnknownProfile` for any other name.
    pub fn builtin(name: &str) -> ColdcutResult<Self> {
        match name {
            "media" => Ok(Self::media()),
            "episode-images" => Ok(Self::episode_images()),
            other => Err(MigrationError::new(MigrationErrorKind::UnknownProfile(
                other.to_string(),
            ))
            .into()),
        }
    }

    /// Metadata field that receives the blob URL for a reference found in
    /// `image_field`.
    pub fn external_url_field(&self, image_field: &str) -> String {
        self.external_url_fields
            .get(image_field)
            .cloned()
            .unwrap_or_else(|| format!("external_{}_url", image_field))
    }

    /// Whether the media item belongs to this profile's folder filter.
    pub fn accepts(&self, item: &MediaItem) -> bool {
        match &self.media_folder {
            Some(folder) => item.folder().as_deref() == Some(folder.as_str()),
            None => true,
        }
    }

    /// Blob path for a media item.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use coldcut_core::MediaItem;
    /// use coldcut_migrate::MigrationProfile;
    ///
    /// let item = MediaItem::builder()
    ///     .id("65a1")
    ///     .display_name("late night/show 1.jpg")
    ///     .uploaded_at(Utc::now())
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(
    ///     MigrationProfile::media().destination_path(&item),
    ///     "cold-storage/media/65a1/late-night-show-1.jpg"
    /// );
    /// ```
    pub fn destination_path(&self, item: &MediaItem) -> String {
        let name = sanitize_name(item.display_name());
        let name = if name.is_empty() {
            sanitize_name(item.id())
        } else {
            name
        };
        let prefix = self.destination_prefix.trim_matches('/');

        match self.path_strategy {
            PathStrategy::IdAndName => format!("{}/{}/{}", prefix, sanitize_name(item.id()), name),
            PathStrategy::Name => format!("{}/{}", prefix, name),
        }
    }
}

/// Replace path separators and whitespace with `-`.
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_whitespace() {
                '-'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(id: &str, name: &str) -> MediaItem {
        MediaItem::builder()
            .id(id)
            .display_name(name)
            .uploaded_at(Utc::now())
            .build()
            .unwrap()
    }

    #[test]
    fn test_name_strategy_omits_id() {
        let profile = MigrationProfile {
            path_strategy: PathStrategy::Name,
            ..MigrationProfile::episode_images()
        };
        assert_eq!(
            profile.destination_path(&item("m1", "cover art.png")),
            "episodes/cover-art.png"
        );
    }

    #[test]
    fn test_empty_name_falls_back_to_id() {
        let profile = MigrationProfile::media();
        assert_eq!(
            profile.destination_path(&item("m1", "   ")),
            "cold-storage/media/m1/m1"
        );
    }

    #[test]
    fn test_unknown_builtin_is_an_error() {
        assert!(MigrationProfile::builtin("podcasts").is_err());
        assert_eq!(
            MigrationProfile::builtin("episode-images").unwrap(),
            MigrationProfile::episode_images()
        );
    }

    #[test]
    fn test_each_image_field_has_its_own_target() {
        let profile = MigrationProfile::media();
        assert_eq!(profile.external_url_field("image"), "external_image_url");
        assert_eq!(
            profile.external_url_field("thumbnail"),
            "external_thumbnail_url"
        );
        assert_eq!(profile.external_url_field("banner"), "external_banner_url");
    }

    #[test]
    fn test_folder_filter() {
        let profile = MigrationProfile {
            media_folder: Some("episodes".to_string()),
            ..MigrationProfile::media()
        };
        let mut builder = MediaItem::builder();
        builder
            .id("m1")
            .display_name("a.jpg")
            .uploaded_at(Utc::now())
            .folder("episodes");
        assert!(profile.accepts(&builder.build().unwrap()));
        assert!(!profile.accepts(&item("m2", "b.jpg")));
    }
}
