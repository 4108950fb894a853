//! Wire formats of the bucket REST API.

use chrono::{DateTime, Utc};
use coldcut_core::{ContentObject, MediaItem};
use coldcut_error::{ContentError, ContentErrorKind};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub(crate) struct MediaListResponse {
    #[serde(default)]
    pub media: Vec<MediaDto>,
    #[serde(default)]
    pub total: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MediaDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub imgix_url: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default, rename = "type")]
    pub mime_type: Option<String>,
}

impl TryFrom<MediaDto> for MediaItem {
    type Error = ContentError;

    fn try_from(dto: MediaDto) -> Result<Self, Self::Error> {
        let mut builder = MediaItem::builder();
        builder
            .id(dto.id)
            .display_name(dto.name)
            .size_bytes(dto.size.unwrap_or_default())
            .uploaded_at(dto.created_at);
        if let Some(url) = dto.url.filter(|u| !u.is_empty()) {
            builder.primary_url(url);
        }
        if let Some(url) = dto.imgix_url.filter(|u| !u.is_empty()) {
            builder.alternate_url(url);
        }
        if let Some(folder) = dto.folder {
            builder.folder(folder);
        }
        if let Some(mime_type) = dto.mime_type {
            builder.mime_type(mime_type);
        }
        builder
            .build()
            .map_err(|e| ContentError::new(ContentErrorKind::Decode(e.to_string())))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ObjectListResponse {
    #[serde(default)]
    pub objects: Vec<ObjectDto>,
    #[serde(default)]
    pub total: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ObjectDto {
    pub id: String,
    #[serde(default, rename = "type")]
    pub object_type: Option<String>,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl ObjectDto {
    pub(crate) fn into_object(self, requested_type: &str) -> Result<ContentObject, ContentError> {
        ContentObject::builder()
            .id(self.id)
            .object_type(self.object_type.unwrap_or_else(|| requested_type.to_string()))
            .slug(self.slug)
            .title(self.title)
            .metadata(self.metadata.unwrap_or_default())
            .build()
            .map_err(|e| ContentError::new(ContentErrorKind::Decode(e.to_string())))
    }
}
