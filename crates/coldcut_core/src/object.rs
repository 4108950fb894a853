//! Content objects that may reference media.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A typed content record (episode, host, post, ...) whose metadata may
/// embed a reference to a [`MediaItem`](crate::MediaItem).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct ContentObject {
    /// Object identifier
    id: String,
    /// Type tag, e.g. "episodes"
    object_type: String,
    /// URL slug
    #[builder(default)]
    slug: String,
    /// Human-readable title
    #[builder(default)]
    title: String,
    /// Free-form metadata map
    #[builder(default)]
    metadata: Map<String, Value>,
}

/// Candidate reference strings read from one metadata field.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ImageRef {
    field: String,
    candidates: Vec<String>,
}

impl ContentObject {
    /// Creates a new content object builder.
    pub fn builder() -> ContentObjectBuilder {
        ContentObjectBuilder::default()
    }

    /// Read the image references stored under the given metadata fields.
    ///
    /// A field may hold a plain string or an object carrying `url`,
    /// `imgix_url` and/or `name`. Fields that are absent or empty are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use coldcut_core::ContentObject;
    /// use serde_json::json;
    ///
    /// let metadata = json!({
    ///     "image": { "url": "https://cdn.example.com/a.jpg", "imgix_url": "https://imgix.example.com/a.jpg" },
    ///     "thumbnail": "a-thumb.jpg"
    /// });
    /// let object = ContentObject::builder()
    ///     .id("obj-1")
    ///     .object_type("episodes")
    ///     .metadata(metadata.as_object().unwrap().clone())
    ///     .build()
    ///     .unwrap();
    ///
    /// let refs = object.image_refs(&["image".to_string(), "thumbnail".to_string()]);
    /// assert_eq!(refs.len(), 2);
    /// assert_eq!(refs[0].candidates().len(), 2);
    /// ```
    pub fn image_refs(&self, fields: &[String]) -> Vec<ImageRef> {
        fields
            .iter()
            .filter_map(|field| {
                let candidates = match self.metadata.get(field)? {
                    Value::String(s) => vec![s.trim().to_string()],
                    Value::Object(map) => ["name", "url", "imgix_url"]
                        .iter()
                        .filter_map(|key| map.get(*key).and_then(Value::as_str))
                        .map(|s| s.trim().to_string())
                        .collect(),
                    _ => Vec::new(),
                };
                let candidates: Vec<String> =
                    candidates.into_iter().filter(|s| !s.is_empty()).collect();
                (!candidates.is_empty()).then(|| ImageRef {
                    field: field.clone(),
                    candidates,
                })
            })
            .collect()
    }

    /// String value of a metadata field, if it holds one.
    pub fn metadata_str(&self, field: &str) -> Option<&str> {
        self.metadata
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Lightweight reference for the index and the report, for a media
    /// reference found in `field`.
    pub fn to_ref(&self, field: &str) -> ObjectRef {
        ObjectRef {
            id: self.id.clone(),
            slug: self.slug.clone(),
            title: self.title.clone(),
            object_type: self.object_type.clone(),
            field: field.to_string(),
            external_url: None,
        }
    }
}

/// Identity of a content object as recorded in the reference index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Object identifier
    pub id: String,
    /// URL slug
    pub slug: String,
    /// Human-readable title
    pub title: String,
    /// Type tag
    pub object_type: String,
    /// Metadata field holding the media reference
    #[serde(default)]
    pub field: String,
    /// Value of that field's external-URL field when the object was scanned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
}
